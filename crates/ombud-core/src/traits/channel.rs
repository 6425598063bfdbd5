// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging platform integration.

use async_trait::async_trait;

use crate::error::OmbudError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, MessageId, OutboundMessage};

/// Adapter for the bidirectional messaging channel.
///
/// The core consumes the chat platform through exactly three concerns:
/// sending text (optionally with inline controls), forwarding an arbitrary
/// message verbatim, and receiving inbound events. Every call is
/// reliable-but-fallible; the caller decides per call site whether a
/// failure is ignored, logged, or surfaced.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), OmbudError>;

    /// Sends a text message, with optional inline keyboard.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudError>;

    /// Forwards a message verbatim (text, media, formatting) from one chat
    /// to another without revealing a "forwarded from" origin.
    async fn copy_message(
        &self,
        to_chat: i64,
        from_chat: i64,
        message: &MessageId,
    ) -> Result<MessageId, OmbudError>;

    /// Acknowledges an inline-button press. `text` is shown to the pressing
    /// user only; `alert` escalates it to a modal popup.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), OmbudError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, OmbudError>;
}
