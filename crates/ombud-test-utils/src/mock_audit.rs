// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing audit adapter for tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ombud_core::traits::adapter::PluginAdapter;
use ombud_core::traits::audit::AuditAdapter;
use ombud_core::types::{AdapterType, AuditEvent, HealthStatus};
use ombud_core::OmbudError;

/// Audit adapter that captures every recorded event for assertions.
pub struct MockAudit {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MockAudit {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All events recorded so far.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

impl Default for MockAudit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockAudit {
    fn name(&self) -> &str {
        "mock-audit"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        Ok(())
    }
}

#[async_trait]
impl AuditAdapter for MockAudit {
    async fn record(&self, event: AuditEvent) {
        self.events.lock().await.push(event);
    }
}
