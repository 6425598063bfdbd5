// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events,
//! captured outbound traffic, and per-chat failure injection for exercising
//! best-effort fan-out.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use ombud_core::traits::adapter::PluginAdapter;
use ombud_core::traits::channel::ChannelAdapter;
use ombud_core::types::{AdapterType, HealthStatus, InboundEvent, MessageId, OutboundMessage};
use ombud_core::OmbudError;

/// A recorded `copy_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedMessage {
    pub to_chat: i64,
    pub from_chat: i64,
    pub message: MessageId,
}

/// A recorded `answer_callback` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub callback_id: String,
    pub text: Option<String>,
    pub alert: bool,
}

/// A mock messaging channel for testing.
///
/// Provides queues for injected inbound events and captured outbound sends,
/// copies, and callback answers. Chats registered via [`fail_chat`] reject
/// sends and copies, simulating a recipient the bot cannot message.
///
/// [`fail_chat`]: MockChannel::fail_chat
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    copied: Arc<Mutex<Vec<CopiedMessage>>>,
    answers: Arc<Mutex<Vec<CallbackAnswer>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            copied: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(HashSet::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Make every send/copy to `chat_id` fail from now on.
    pub async fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().await.insert(chat_id);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get all sends addressed to one chat.
    pub async fn sent_to(&self, chat_id: i64) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }

    /// Get all recorded `copy_message` calls.
    pub async fn copied_messages(&self) -> Vec<CopiedMessage> {
        self.copied.lock().await.clone()
    }

    /// Get all recorded callback answers.
    pub async fn callback_answers(&self) -> Vec<CallbackAnswer> {
        self.answers.lock().await.clone()
    }

    /// Clear all captured outbound traffic.
    pub async fn clear_captured(&self) {
        self.sent.lock().await.clear();
        self.copied.lock().await.clear();
        self.answers.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), OmbudError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudError> {
        if self.failing_chats.lock().await.contains(&msg.chat_id) {
            return Err(OmbudError::Channel {
                message: format!("mock: chat {} rejects messages", msg.chat_id),
                source: None,
            });
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn copy_message(
        &self,
        to_chat: i64,
        from_chat: i64,
        message: &MessageId,
    ) -> Result<MessageId, OmbudError> {
        if self.failing_chats.lock().await.contains(&to_chat) {
            return Err(OmbudError::Channel {
                message: format!("mock: chat {to_chat} rejects copies"),
                source: None,
            });
        }
        self.copied.lock().await.push(CopiedMessage {
            to_chat,
            from_chat,
            message: message.clone(),
        });
        Ok(MessageId(format!("mock-copy-{}", uuid::Uuid::new_v4())))
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), OmbudError> {
        self.answers.lock().await.push(CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            alert,
        });
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, OmbudError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            self.notify.notified().await;
        }
    }
}
