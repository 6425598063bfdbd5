// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-document persistence layer for the Ombud routing bot.
//!
//! Implements [`ombud_core::StorageAdapter`] over a single JSON file with
//! narrow sub-key read-modify-write semantics.

pub mod store;

pub use store::JsonStore;
