// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The status control: inline actions staff use to advance a ticket.
//!
//! Only the owner or an active staff member may invoke it; anyone else is
//! silently ignored so the control never leaks who is on staff. The original
//! header is never edited; confirmations go out as separate messages.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use ombud_core::callback::StatusAction;
use ombud_core::types::{AuditEvent, AuditKind, CallbackPress, OutboundMessage};
use ombud_core::{AuditAdapter, ChannelAdapter, OmbudError};
use ombud_directory::Directory;
use ombud_tickets::{TicketRegistry, TicketStatus};

/// Maps a control action to the status it sets.
fn status_of(action: StatusAction) -> TicketStatus {
    match action {
        StatusAction::Taken => TicketStatus::InProgress,
        StatusAction::Waiting => TicketStatus::Waiting,
        StatusAction::Done => TicketStatus::Done,
    }
}

/// Handles status-control button presses.
pub struct StatusControl {
    channel: Arc<dyn ChannelAdapter>,
    directory: Arc<Directory>,
    registry: Arc<TicketRegistry>,
    audit: Arc<dyn AuditAdapter>,
    owner_id: i64,
}

impl StatusControl {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        directory: Arc<Directory>,
        registry: Arc<TicketRegistry>,
        audit: Arc<dyn AuditAdapter>,
        owner_id: i64,
    ) -> Self {
        Self {
            channel,
            directory,
            registry,
            audit,
            owner_id,
        }
    }

    async fn is_authorized(&self, user_id: i64) -> bool {
        user_id == self.owner_id || self.directory.is_active_staff(user_id).await
    }

    /// Handle one status button press.
    ///
    /// Unauthorized presses are acknowledged without text and otherwise
    /// ignored. An unknown ticket id raises an alert visible only to the
    /// pressing actor.
    pub async fn handle(
        &self,
        press: &CallbackPress,
        action: StatusAction,
        ticket_id: &str,
    ) -> Result<(), OmbudError> {
        if !self.is_authorized(press.sender.user_id).await {
            debug!(
                user_id = press.sender.user_id,
                ticket_id, "ignoring status press from non-staff"
            );
            // Ack without text: the spinner stops, nothing is revealed.
            return self.channel.answer_callback(&press.id, None, false).await;
        }

        let status = status_of(action);
        let actor = press.sender.display_name().to_string();

        let found = self
            .registry
            .set_status(ticket_id, status, Some(&actor))
            .await?;
        if !found {
            warn!(ticket_id, "status press for unknown ticket");
            return self
                .channel
                .answer_callback(&press.id, Some("Ticket not found."), true)
                .await;
        }

        self.channel.answer_callback(&press.id, None, false).await?;

        // A separate confirmation, never an edit of the original header.
        let confirmation = format!("Ticket #{ticket_id} is now {} ({actor})", status.human());
        if let Err(e) = self
            .channel
            .send(OutboundMessage::text(press.chat_id, confirmation))
            .await
        {
            warn!(error = %e, "status confirmation delivery failed");
        }

        info!(ticket_id, status = %status, actor = %actor, "ticket status changed");

        self.audit
            .record(status_changed_event(ticket_id, status, &actor, &self.registry).await)
            .await;

        Ok(())
    }
}

/// Build the audit record for a status change.
async fn status_changed_event(
    ticket_id: &str,
    status: TicketStatus,
    actor: &str,
    registry: &TicketRegistry,
) -> AuditEvent {
    let ticket = registry.get(ticket_id).await.ok().flatten();
    let anonymous = ticket.as_ref().map(|t| t.anonymous).unwrap_or(true);
    AuditEvent {
        event: AuditKind::StatusChanged,
        timestamp: Utc::now().to_rfc3339(),
        ticket_id: ticket_id.to_string(),
        anonymous,
        category_key: ticket.as_ref().map(|t| t.category.clone()).unwrap_or_default(),
        category_label: String::new(),
        message_type: "status".to_string(),
        text: None,
        user_id: ticket
            .as_ref()
            .filter(|t| !t.anonymous)
            .map(|t| t.user_id),
        username: None,
        full_name: None,
        status: Some(status.to_string()),
        actor: Some(actor.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombud_core::types::{MessageId, Sender};
    use ombud_test_utils::{MemoryStore, MockAudit, MockChannel};
    use serde_json::json;

    const OWNER: i64 = 1;
    const GROUP: i64 = -100;

    struct Fixture {
        control: StatusControl,
        channel: Arc<MockChannel>,
        audit: Arc<MockAudit>,
        registry: Arc<TicketRegistry>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(json!({
                "staff": {
                    "501": {"name": "Ada", "active": true},
                    "502": {"active": false}
                }
            }))
            .await;
        let channel = Arc::new(MockChannel::new());
        let audit = Arc::new(MockAudit::new());
        let directory = Arc::new(Directory::load(store.clone()).await);
        let registry = Arc::new(TicketRegistry::new(store));
        let control = StatusControl::new(
            channel.clone(),
            directory,
            registry.clone(),
            audit.clone(),
            OWNER,
        );
        Fixture {
            control,
            channel,
            audit,
            registry,
        }
    }

    fn press_from(user_id: i64, name: &str) -> CallbackPress {
        CallbackPress {
            id: "cb-1".into(),
            chat_id: GROUP,
            message_id: Some(MessageId("55".into())),
            sender: Sender {
                user_id,
                username: None,
                full_name: name.into(),
            },
            data: String::new(),
        }
    }

    #[tokio::test]
    async fn staff_press_sets_status_and_confirms() {
        let f = fixture().await;
        let ticket = f.registry.create_ticket(42, false, "psy").await.unwrap();

        f.control
            .handle(&press_from(501, "Ada"), StatusAction::Taken, &ticket.id)
            .await
            .unwrap();

        let updated = f.registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(updated.assignee.as_deref(), Some("Ada"));

        // Separate confirmation message in the pressing chat.
        let sends = f.channel.sent_to(GROUP).await;
        assert_eq!(sends.len(), 1);
        assert!(sends[0].text.contains("in progress"));
        assert!(sends[0].text.contains("Ada"));

        // Plain (non-alert) callback ack.
        let answers = f.channel.callback_answers().await;
        assert_eq!(answers.len(), 1);
        assert!(answers[0].text.is_none());

        // Audit trail.
        let events = f.audit.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, AuditKind::StatusChanged);
        assert_eq!(events[0].actor.as_deref(), Some("Ada"));
        assert_eq!(events[0].status.as_deref(), Some("in_progress"));
    }

    #[tokio::test]
    async fn owner_is_always_authorized() {
        let f = fixture().await;
        let ticket = f.registry.create_ticket(42, false, "psy").await.unwrap();

        f.control
            .handle(&press_from(OWNER, "Boss"), StatusAction::Done, &ticket.id)
            .await
            .unwrap();

        let updated = f.registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(updated.status, TicketStatus::Done);
    }

    #[tokio::test]
    async fn outsider_press_is_silently_ignored() {
        let f = fixture().await;
        let ticket = f.registry.create_ticket(42, false, "psy").await.unwrap();

        // 999 is nobody; 502 is deactivated staff.
        for intruder in [999, 502] {
            f.control
                .handle(&press_from(intruder, "Eve"), StatusAction::Done, &ticket.id)
                .await
                .unwrap();
        }

        let untouched = f.registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, TicketStatus::New);
        assert!(f.channel.sent_messages().await.is_empty(), "no visible reaction");
        assert!(f.audit.events().await.is_empty());

        // The presses were still acked, textlessly, so nothing leaks.
        let answers = f.channel.callback_answers().await;
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.text.is_none() && !a.alert));
    }

    #[tokio::test]
    async fn unknown_ticket_alerts_only_the_actor() {
        let f = fixture().await;

        f.control
            .handle(&press_from(501, "Ada"), StatusAction::Taken, "NOSUCH")
            .await
            .unwrap();

        assert!(f.channel.sent_messages().await.is_empty(), "no chat message");
        let answers = f.channel.callback_answers().await;
        assert_eq!(answers.len(), 1);
        assert!(answers[0].alert);
        assert_eq!(answers[0].text.as_deref(), Some("Ticket not found."));
    }

    #[tokio::test]
    async fn repeated_presses_overwrite_last_writer_wins() {
        let f = fixture().await;
        let ticket = f.registry.create_ticket(42, false, "psy").await.unwrap();

        f.control
            .handle(&press_from(501, "Ada"), StatusAction::Done, &ticket.id)
            .await
            .unwrap();
        f.control
            .handle(&press_from(OWNER, "Boss"), StatusAction::Waiting, &ticket.id)
            .await
            .unwrap();

        let current = f.registry.get(&ticket.id).await.unwrap().unwrap();
        assert_eq!(current.status, TicketStatus::Waiting);
        assert_eq!(current.assignee.as_deref(), Some("Boss"));
    }
}
