// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ombud integration tests.
//!
//! Mock implementations of the channel, storage, and audit adapter traits
//! with injectable inputs and captured outputs.

pub mod memory_store;
pub mod mock_audit;
pub mod mock_channel;

pub use memory_store::MemoryStore;
pub use mock_audit::MockAudit;
pub use mock_channel::{CallbackAnswer, CopiedMessage, MockChannel};
