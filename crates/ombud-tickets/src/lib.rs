// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket registry for the Ombud routing bot.
//!
//! Tickets are created once per routed submission, mutated only through
//! status updates, and never deleted.

pub mod registry;
pub mod ticket;

pub use registry::{TicketRegistry, TicketReport};
pub use ticket::{Ticket, TicketStatus};
