// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Ombud workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a message on the originating chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Audit,
}

/// Identity of the person behind an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Platform user id. Always retained internally, even for anonymous tickets.
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: String,
}

impl Sender {
    /// Name shown to staff when this person acts on a ticket.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            self.username.as_deref().unwrap_or("unknown")
        } else {
            &self.full_name
        }
    }
}

/// Classification of non-text payloads, used for audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Document,
    Voice,
    Video,
    Other,
}

/// Content of an inbound message.
///
/// Media payloads are never downloaded; the router forwards the original
/// message verbatim via [`ChannelAdapter::copy_message`], so only the kind
/// and caption are carried here.
///
/// [`ChannelAdapter::copy_message`]: crate::traits::ChannelAdapter::copy_message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Media {
        kind: MediaKind,
        caption: Option<String>,
    },
}

impl MessageContent {
    /// Stable name for audit records ("text", "photo", ...).
    pub fn kind_name(&self) -> String {
        match self {
            MessageContent::Text(_) => "text".to_string(),
            MessageContent::Media { kind, .. } => kind.to_string(),
        }
    }

    /// The textual part of the content, if any (text body or media caption).
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(t) => Some(t),
            MessageContent::Media { caption, .. } => caption.as_deref(),
        }
    }
}

/// An inbound chat message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: MessageId,
    /// Chat the message arrived in. For direct messages this equals the
    /// sender's user id.
    pub chat_id: i64,
    pub sender: Sender,
    pub content: MessageContent,
    /// RFC 3339 arrival timestamp.
    pub timestamp: String,
}

/// An inline-button press received from a channel adapter.
#[derive(Debug, Clone)]
pub struct CallbackPress {
    /// Platform callback id, needed to acknowledge the press.
    pub id: String,
    /// Chat holding the message the button was attached to.
    pub chat_id: i64,
    /// The message the button was attached to, when still reachable.
    pub message_id: Option<MessageId>,
    pub sender: Sender,
    /// Raw callback payload; see [`crate::callback::CallbackData`].
    pub data: String,
}

/// Any event the core reacts to.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(InboundMessage),
    Callback(CallbackPress),
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// An inline keyboard attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Keyboard with one button per row, the common layout for menus.
    pub fn column(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

impl OutboundMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat_id: i64, text: impl Into<String>, keyboard: InlineKeyboard) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Kind of event recorded in the external audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    TicketCreated,
    StatusChanged,
}

/// A flat event record appended to the external audit log.
///
/// Field order matches the spreadsheet column order. Sender identity and
/// message text must be left empty by the producer when the ticket is
/// anonymous -- the log never sees what staff never see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event: AuditKind,
    pub timestamp: String,
    pub ticket_id: String,
    pub anonymous: bool,
    pub category_key: String,
    pub category_label: String,
    pub message_type: String,
    pub text: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub status: Option<String>,
    pub actor: Option<String>,
}
