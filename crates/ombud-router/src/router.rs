// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out routing of completed submissions.
//!
//! Delivery is best-effort per destination: one unreachable recipient never
//! aborts the rest of the fan-out and is never surfaced to the submitter.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use ombud_config::model::MessagesConfig;
use ombud_core::callback::{CallbackData, StatusAction};
use ombud_core::types::{
    AuditEvent, AuditKind, InboundMessage, InlineButton, InlineKeyboard, OutboundMessage,
};
use ombud_core::{AuditAdapter, ChannelAdapter, OmbudError};
use ombud_directory::Directory;
use ombud_tickets::{Ticket, TicketRegistry};

use crate::header::build_header;
use crate::hours::WorkingHours;

/// Routes completed submissions to every active destination.
pub struct Router {
    channel: Arc<dyn ChannelAdapter>,
    directory: Arc<Directory>,
    registry: Arc<TicketRegistry>,
    audit: Arc<dyn AuditAdapter>,
    hours: WorkingHours,
    messages: MessagesConfig,
}

impl Router {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        directory: Arc<Directory>,
        registry: Arc<TicketRegistry>,
        audit: Arc<dyn AuditAdapter>,
        hours: WorkingHours,
        messages: MessagesConfig,
    ) -> Self {
        Self {
            channel,
            directory,
            registry,
            audit,
            hours,
            messages,
        }
    }

    /// The status-control keyboard attached to group headers.
    fn status_keyboard(ticket_id: &str) -> InlineKeyboard {
        let button = |label: &str, action: StatusAction| {
            InlineButton::new(
                label,
                CallbackData::Status {
                    action,
                    ticket_id: ticket_id.to_string(),
                }
                .encode(),
            )
        };
        InlineKeyboard::new(vec![vec![
            button("🛠 Taken", StatusAction::Taken),
            button("⏳ Waiting", StatusAction::Waiting),
            button("✅ Done", StatusAction::Done),
        ]])
    }

    /// Deliver header + verbatim copy to one destination. Failures are
    /// logged and reported as a boolean so the fan-out loop can carry on.
    async fn deliver_to(
        &self,
        chat_id: i64,
        header: &str,
        keyboard: Option<InlineKeyboard>,
        msg: &InboundMessage,
    ) -> bool {
        let outbound = match keyboard {
            Some(kb) => OutboundMessage::with_keyboard(chat_id, header, kb),
            None => OutboundMessage::text(chat_id, header),
        };
        if let Err(e) = self.channel.send(outbound).await {
            warn!(chat_id, error = %e, "header delivery failed, skipping destination");
            return false;
        }
        if let Err(e) = self.channel.copy_message(chat_id, msg.chat_id, &msg.id).await {
            warn!(chat_id, error = %e, "message copy failed");
            return false;
        }
        true
    }

    /// Route one completed submission.
    ///
    /// Creates the ticket, fans out to all active groups (header with status
    /// controls, then the copied message) and all active staff DMs (header
    /// without controls), sends exactly one acknowledgment to the submitter
    /// chosen by the working-hours predicate, and records one audit event.
    pub async fn route_submission(
        &self,
        msg: &InboundMessage,
        anonymous: bool,
        category_key: &str,
    ) -> Result<Ticket, OmbudError> {
        let ticket = self
            .registry
            .create_ticket(msg.sender.user_id, anonymous, category_key)
            .await?;

        let category_label = self
            .directory
            .category_label(category_key)
            .unwrap_or(category_key)
            .to_string();
        let header = build_header(&ticket, &category_label, &msg.sender, self.hours.offset());

        let mut delivered = 0usize;
        let mut failed = 0usize;

        for group in self.directory.active_groups().await {
            let keyboard = Some(Self::status_keyboard(&ticket.id));
            if self.deliver_to(group.chat_id, &header, keyboard, msg).await {
                delivered += 1;
            } else {
                failed += 1;
            }
        }

        for member in self.directory.active_staff().await {
            // Staff DMs get the header without controls.
            if self.deliver_to(member.user_id, &header, None, msg).await {
                delivered += 1;
            } else {
                failed += 1;
            }
        }

        info!(
            ticket_id = %ticket.id,
            category = %category_key,
            delivered,
            failed,
            "submission routed"
        );

        // Exactly one acknowledgment, regardless of fan-out outcome.
        let ack = if self.hours.is_working(Utc::now()) {
            &self.messages.ack_working
        } else {
            &self.messages.ack_after_hours
        };
        if let Err(e) = self.channel.send(OutboundMessage::text(msg.chat_id, ack)).await {
            warn!(error = %e, "acknowledgment delivery failed");
        }

        self.audit
            .record(ticket_created_event(&ticket, &category_label, msg))
            .await;

        Ok(ticket)
    }
}

/// Build the audit record for a freshly routed ticket.
///
/// Message text and sender identity are included only for non-anonymous
/// tickets: the external log never sees what staff never see.
fn ticket_created_event(ticket: &Ticket, category_label: &str, msg: &InboundMessage) -> AuditEvent {
    AuditEvent {
        event: AuditKind::TicketCreated,
        timestamp: Utc::now().to_rfc3339(),
        ticket_id: ticket.id.clone(),
        anonymous: ticket.anonymous,
        category_key: ticket.category.clone(),
        category_label: category_label.to_string(),
        message_type: msg.content.kind_name(),
        text: if ticket.anonymous {
            None
        } else {
            msg.content.text().map(str::to_string)
        },
        user_id: (!ticket.anonymous).then_some(msg.sender.user_id),
        username: if ticket.anonymous {
            None
        } else {
            msg.sender.username.clone()
        },
        full_name: if ticket.anonymous {
            None
        } else {
            Some(msg.sender.full_name.clone())
        },
        status: Some(ticket.status.to_string()),
        actor: None,
    }
}
