// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket registry: creation, status updates, and reporting over the
//! key-value store.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

use ombud_core::{OmbudError, StorageAdapter};

use crate::ticket::{Ticket, TicketStatus};

const TICKETS_KEY: &str = "tickets";
const COUNTERS_KEY: &str = "counters";

/// Alphabet for ticket ids: uppercase alphanumerics, 36^6 possible ids.
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_LEN: usize = 6;

/// Collision retries before giving up. Unreachable at expected volume; the
/// bound exists so exhaustion is an explicit internal error, not a hang.
const MAX_ID_ATTEMPTS: usize = 32;

/// Aggregate counts returned by [`TicketRegistry::report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketReport {
    pub total: usize,
    pub anonymous: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

/// Creates and mutates tickets in the key-value store.
pub struct TicketRegistry {
    store: Arc<dyn StorageAdapter>,
}

impl TicketRegistry {
    pub fn new(store: Arc<dyn StorageAdapter>) -> Self {
        Self { store }
    }

    fn generate_id() -> String {
        let mut rng = rand::thread_rng();
        (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    /// Create a ticket for a routed submission.
    ///
    /// Generates a short id, retrying on collision against existing ids, and
    /// persists the new record with status `new`. A failure to bump the
    /// creation counter is logged but does not fail the creation.
    pub async fn create_ticket(
        &self,
        user_id: i64,
        anonymous: bool,
        category: &str,
    ) -> Result<Ticket, OmbudError> {
        let mut id = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = Self::generate_id();
            if self
                .store
                .get(&format!("{TICKETS_KEY}/{candidate}"))
                .await?
                .is_none()
            {
                id = Some(candidate);
                break;
            }
        }
        let id = id.ok_or_else(|| {
            OmbudError::Internal(format!(
                "ticket id space exhausted after {MAX_ID_ATTEMPTS} attempts"
            ))
        })?;

        let now = Utc::now();
        let ticket = Ticket {
            id: id.clone(),
            created_at: now,
            user_id,
            anonymous,
            category: category.to_string(),
            status: TicketStatus::New,
            assignee: None,
            updated_at: now,
        };

        let value = serde_json::to_value(&ticket).map_err(|e| OmbudError::Storage {
            source: Box::new(e),
        })?;
        self.store.put(&format!("{TICKETS_KEY}/{id}"), value).await?;

        if let Err(e) = self.bump_created_counter().await {
            warn!(error = %e, "failed to bump ticket counter");
        }

        debug!(ticket_id = %ticket.id, category = %ticket.category, "ticket created");
        Ok(ticket)
    }

    async fn bump_created_counter(&self) -> Result<(), OmbudError> {
        let created = self
            .store
            .get(COUNTERS_KEY)
            .await?
            .as_ref()
            .and_then(|c| c.get("tickets_created"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        self.store
            .put(
                &format!("{COUNTERS_KEY}/tickets_created"),
                Value::from(created + 1),
            )
            .await
    }

    /// Fetch a ticket by id.
    pub async fn get(&self, ticket_id: &str) -> Result<Option<Ticket>, OmbudError> {
        let Some(value) = self.store.get(&format!("{TICKETS_KEY}/{ticket_id}")).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(e) => {
                warn!(ticket_id = %ticket_id, error = %e, "stored ticket is malformed");
                Ok(None)
            }
        }
    }

    /// Overwrite status and assignee on a ticket.
    ///
    /// Returns `false` when the id is unknown, leaving the store unchanged.
    /// Otherwise the write is unconditional: no transition table, any status
    /// reachable from any status, last writer wins under concurrent clicks.
    pub async fn set_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
        assignee: Option<&str>,
    ) -> Result<bool, OmbudError> {
        let Some(mut ticket) = self.get(ticket_id).await? else {
            return Ok(false);
        };

        ticket.status = status;
        ticket.assignee = assignee.map(str::to_string);
        ticket.updated_at = Utc::now();

        let value = serde_json::to_value(&ticket).map_err(|e| OmbudError::Storage {
            source: Box::new(e),
        })?;
        self.store
            .put(&format!("{TICKETS_KEY}/{ticket_id}"), value)
            .await?;
        debug!(ticket_id = %ticket_id, status = %status, "ticket status updated");
        Ok(true)
    }

    /// Aggregate counts over tickets created within the trailing window.
    pub async fn report(&self, since_days: i64) -> Result<TicketReport, OmbudError> {
        let cutoff = Utc::now() - Duration::days(since_days);
        let mut report = TicketReport::default();

        for (id, value) in self.store.list(TICKETS_KEY).await? {
            let ticket: Ticket = match serde_json::from_value(value) {
                Ok(t) => t,
                Err(e) => {
                    warn!(ticket_id = %id, error = %e, "skipping malformed ticket in report");
                    continue;
                }
            };
            if ticket.created_at < cutoff {
                continue;
            }
            report.total += 1;
            if ticket.anonymous {
                report.anonymous += 1;
            }
            *report.by_category.entry(ticket.category).or_default() += 1;
            *report.by_status.entry(ticket.status.to_string()).or_default() += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombud_test_utils::MemoryStore;
    use serde_json::json;
    use std::collections::HashSet;

    fn registry() -> (TicketRegistry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TicketRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn created_ids_are_unique_and_well_formed() {
        let (registry, _) = registry();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let ticket = registry.create_ticket(1, false, "psy").await.unwrap();
            assert_eq!(ticket.id.len(), 6);
            assert!(ticket.id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert!(seen.insert(ticket.id), "duplicate ticket id");
        }
    }

    #[tokio::test]
    async fn create_sets_initial_fields_and_counter() {
        let (registry, store) = registry();
        let ticket = registry.create_ticket(42, true, "legal").await.unwrap();

        assert_eq!(ticket.status, TicketStatus::New);
        assert_eq!(ticket.user_id, 42, "true originator retained even when anonymous");
        assert!(ticket.anonymous);
        assert!(ticket.assignee.is_none());

        let stored = registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(stored, ticket);

        let counters = store.get("counters").await.unwrap().unwrap();
        assert_eq!(counters["tickets_created"], json!(1));
    }

    #[tokio::test]
    async fn set_status_on_unknown_id_fails_without_changes() {
        let (registry, store) = registry();
        let before = store.snapshot().await;

        let ok = registry
            .set_status("NOSUCH", TicketStatus::Done, Some("Jane"))
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(store.snapshot().await, before, "registry must be unchanged");
    }

    #[tokio::test]
    async fn set_status_overwrites_from_any_state() {
        let (registry, _) = registry();
        let ticket = registry.create_ticket(1, false, "psy").await.unwrap();

        // done -> waiting is allowed: no transition table.
        assert!(registry.set_status(&ticket.id, TicketStatus::Done, Some("A")).await.unwrap());
        assert!(registry.set_status(&ticket.id, TicketStatus::Waiting, Some("B")).await.unwrap());

        let current = registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(current.status, TicketStatus::Waiting);
        assert_eq!(current.assignee.as_deref(), Some("B"));
        assert!(current.updated_at >= ticket.updated_at);
    }

    #[tokio::test]
    async fn report_counts_by_category_status_and_anonymity() {
        let (registry, _) = registry();
        registry.create_ticket(1, false, "psy").await.unwrap();
        registry.create_ticket(2, true, "psy").await.unwrap();
        let done = registry.create_ticket(3, false, "legal").await.unwrap();
        registry.set_status(&done.id, TicketStatus::Done, Some("Jane")).await.unwrap();

        let report = registry.report(7).await.unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.anonymous, 1);
        assert_eq!(report.by_category["psy"], 2);
        assert_eq!(report.by_category["legal"], 1);
        assert_eq!(report.by_status["new"], 2);
        assert_eq!(report.by_status["done"], 1);
    }

    #[tokio::test]
    async fn report_excludes_tickets_outside_window() {
        let (registry, store) = registry();
        let ticket = registry.create_ticket(1, false, "psy").await.unwrap();

        // Age the ticket beyond the window by rewriting its creation time.
        let mut value = serde_json::to_value(&ticket).unwrap();
        value["created_at"] = json!("2020-01-01T00:00:00Z");
        store.put(&format!("tickets/{}", ticket.id), value).await.unwrap();

        let report = registry.report(7).await.unwrap();
        assert_eq!(report.total, 0);
    }

    #[tokio::test]
    async fn report_skips_malformed_entries() {
        let (registry, store) = registry();
        registry.create_ticket(1, false, "psy").await.unwrap();
        store.put("tickets/JUNK", json!({"not": "a ticket"})).await.unwrap();

        let report = registry.report(7).await.unwrap();
        assert_eq!(report.total, 1);
    }
}
