// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spreadsheet audit logger for the Ombud routing bot.
//!
//! Appends one flat JSON row per event to a configured webhook (an Apps
//! Script endpoint or any append-to-sheet bridge). This collaborator must
//! never take the bot down: every failure is logged and swallowed, and an
//! unconfigured logger is simply inert.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use ombud_config::model::AuditConfig;
use ombud_core::types::{AdapterType, AuditEvent, HealthStatus};
use ombud_core::{AuditAdapter, OmbudError, PluginAdapter};

const APPEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Audit adapter that POSTs event rows to a spreadsheet webhook.
pub struct SheetsLogger {
    client: reqwest::Client,
    webhook_url: Option<String>,
    auth_token: Option<String>,
}

impl SheetsLogger {
    /// Build from configuration. With no webhook URL the logger is inert.
    pub fn new(config: &AuditConfig) -> Result<Self, OmbudError> {
        let client = reqwest::Client::builder()
            .timeout(APPEND_TIMEOUT)
            .build()
            .map_err(|e| OmbudError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Whether a webhook is configured.
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn append(&self, event: &AuditEvent) -> Result<(), OmbudError> {
        let Some(ref url) = self.webhook_url else {
            return Ok(());
        };

        let mut request = self.client.post(url).json(event);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| OmbudError::Channel {
            message: format!("audit webhook unreachable: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !response.status().is_success() {
            return Err(OmbudError::Channel {
                message: format!("audit webhook returned {}", response.status()),
                source: None,
            });
        }

        debug!(event = %event.event, ticket_id = %event.ticket_id, "audit row appended");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SheetsLogger {
    fn name(&self) -> &str {
        "sheets"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        if self.webhook_url.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("no webhook configured".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        Ok(())
    }
}

#[async_trait]
impl AuditAdapter for SheetsLogger {
    async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.append(&event).await {
            warn!(error = %e, ticket_id = %event.ticket_id, "audit append failed (non-fatal)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombud_core::types::AuditKind;

    fn event() -> AuditEvent {
        AuditEvent {
            event: AuditKind::TicketCreated,
            timestamp: "2026-08-03T10:00:00Z".into(),
            ticket_id: "A1B2C3".into(),
            anonymous: false,
            category_key: "psy".into(),
            category_label: "Psychological support".into(),
            message_type: "text".into(),
            text: Some("need help".into()),
            user_id: Some(42),
            username: Some("jane".into()),
            full_name: Some("Jane Doe".into()),
            status: Some("new".into()),
            actor: None,
        }
    }

    #[tokio::test]
    async fn unconfigured_logger_is_inert() {
        let logger = SheetsLogger::new(&AuditConfig::default()).unwrap();
        assert!(!logger.is_enabled());
        // Must not panic or error.
        logger.record(event()).await;
    }

    #[tokio::test]
    async fn unreachable_webhook_is_swallowed() {
        // Port 9 (discard) is not listening; the send fails fast.
        let logger = SheetsLogger::new(&AuditConfig {
            webhook_url: Some("http://127.0.0.1:9/append".into()),
            auth_token: Some("secret".into()),
        })
        .unwrap();
        assert!(logger.is_enabled());
        // record() has no way to return the failure; it must simply not blow up.
        logger.record(event()).await;
    }

    #[tokio::test]
    async fn health_reflects_configuration() {
        let inert = SheetsLogger::new(&AuditConfig::default()).unwrap();
        assert!(matches!(
            inert.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));

        let configured = SheetsLogger::new(&AuditConfig {
            webhook_url: Some("https://example.com/hook".into()),
            auth_token: None,
        })
        .unwrap();
        assert_eq!(configured.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(configured.name(), "sheets");
        assert_eq!(configured.adapter_type(), AdapterType::Audit);
    }
}
