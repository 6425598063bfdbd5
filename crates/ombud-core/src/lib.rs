// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ombud routing bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Ombud workspace. The chat platform,
//! the key-value store, and the external event log are all consumed through
//! adapter traits defined here.

pub mod callback;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OmbudError;
pub use types::{AdapterType, HealthStatus, MessageId};

// Re-export all adapter traits at crate root.
pub use traits::{AuditAdapter, ChannelAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ombud_error_has_all_variants() {
        let _config = OmbudError::Config("test".into());
        let _storage = OmbudError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = OmbudError::Channel {
            message: "test".into(),
            source: None,
        };
        let _not_found = OmbudError::TicketNotFound { id: "A1B2C3".into() };
        let _internal = OmbudError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage, AdapterType::Audit] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn error_messages_are_stable() {
        let err = OmbudError::TicketNotFound { id: "XYZ".into() };
        assert_eq!(err.to_string(), "ticket not found: XYZ");
    }
}
