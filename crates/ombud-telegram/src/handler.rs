// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound conversion: Telegram messages and callback queries into
//! channel-agnostic events.
//!
//! Only private-chat messages feed the intake flow (the bot sits in the
//! work groups it routes to, so group chatter must not loop back in), but
//! callback presses are accepted from any chat -- the status control lives
//! on group messages.

use teloxide::prelude::*;
use teloxide::types::{ChatKind, User};
use tracing::debug;

use ombud_core::types::{
    CallbackPress, InboundMessage, MediaKind, MessageContent, MessageId, Sender,
};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Map a Telegram user to the channel-agnostic sender identity.
pub fn sender_of(user: &User) -> Sender {
    Sender {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        full_name: user.full_name(),
    }
}

/// Extracts content from a Telegram message.
///
/// Text is carried verbatim; media is classified by kind with its caption
/// (the payload itself travels via `copy_message`, never through the core).
/// Returns `None` for unsupported message types (stickers, locations, etc.).
pub fn extract_content(msg: &Message) -> Option<MessageContent> {
    if let Some(text) = msg.text() {
        return Some(MessageContent::Text(text.to_string()));
    }

    let caption = msg.caption().map(str::to_string);
    let kind = if msg.photo().is_some() {
        MediaKind::Photo
    } else if msg.document().is_some() {
        MediaKind::Document
    } else if msg.voice().is_some() {
        MediaKind::Voice
    } else if msg.video().is_some() {
        MediaKind::Video
    } else {
        debug!(msg_id = msg.id.0, "ignoring unsupported message type");
        return None;
    };

    Some(MessageContent::Media { kind, caption })
}

/// Converts a Telegram message into an [`InboundMessage`].
///
/// Returns `None` for messages without a sender (channel posts) or with
/// unsupported content.
pub fn to_inbound_message(msg: &Message) -> Option<InboundMessage> {
    let user = msg.from.as_ref()?;
    let content = extract_content(msg)?;

    Some(InboundMessage {
        id: MessageId(msg.id.0.to_string()),
        chat_id: msg.chat.id.0,
        sender: sender_of(user),
        content,
        timestamp: msg.date.to_rfc3339(),
    })
}

/// Converts a Telegram callback query into a [`CallbackPress`].
///
/// Presses without a payload or whose message is no longer reachable are
/// dropped: there is nothing to act on and nowhere to confirm.
pub fn to_callback_press(query: &CallbackQuery) -> Option<CallbackPress> {
    let data = query.data.clone()?;
    let message = query.message.as_ref()?;

    Some(CallbackPress {
        id: query.id.to_string(),
        chat_id: message.chat().id.0,
        message_id: Some(MessageId(message.id().0.to_string())),
        sender: sender_of(&query.from),
        data,
    })
}
