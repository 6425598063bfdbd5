// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out routing, working-hours acknowledgment selection, and the staff
//! status control for the Ombud routing bot.

pub mod header;
pub mod hours;
pub mod router;
pub mod status;

pub use hours::WorkingHours;
pub use router::Router;
pub use status::StatusControl;
