// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference data for the Ombud routing bot: categories, staff, groups,
//! and info texts, backed by the runtime key-value store.

pub mod directory;
pub mod model;

pub use directory::Directory;
pub use model::{Category, GroupTarget, InfoTexts, StaffMember};
