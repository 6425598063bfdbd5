// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit adapter trait for the external append-only event log.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::AuditEvent;

/// Adapter for the external append-only event log (spreadsheet or similar).
///
/// `record` is deliberately infallible at the trait boundary: a logging
/// collaborator must never take the bot down, so implementations swallow
/// and log their own failures instead of returning them.
#[async_trait]
pub trait AuditAdapter: PluginAdapter {
    /// Appends one event to the external log.
    async fn record(&self, event: AuditEvent);
}
