// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Ombud routing bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for messages and callback queries, plain-text sends with
//! inline keyboards, verbatim message copies, and callback answers.

pub mod handler;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ombud_core::error::OmbudError;
use ombud_core::traits::{ChannelAdapter, PluginAdapter};
use ombud_core::types::{
    AdapterType, HealthStatus, InboundEvent, InlineKeyboard, MessageId, OutboundMessage,
};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling; private-chat messages and callback presses
/// are converted to channel-agnostic events and queued for `receive()`.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    pub fn new(token: &str) -> Result<Self, OmbudError> {
        if token.is_empty() {
            return Err(OmbudError::Config(
                "bot.token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Convert the channel-agnostic keyboard into Telegram markup.
fn to_markup(keyboard: InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.into_iter().map(|row| {
        row.into_iter()
            .map(|b| InlineKeyboardButton::callback(b.label, b.data))
            .collect::<Vec<_>>()
    }))
}

fn channel_err(context: &str, e: impl std::error::Error + Send + Sync + 'static) -> OmbudError {
    OmbudError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        debug!("Telegram channel shutting down");
        // The polling handle is aborted when TelegramChannel is dropped.
        // For graceful shutdown, the event loop stops calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), OmbudError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let msg_tx = self.inbound_tx.clone();
        let cb_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_branch = Update::filter_message().endpoint(move |msg: Message| {
                let tx = msg_tx.clone();
                async move {
                    // Only DMs feed the intake flow; the bot is a member of
                    // the groups it routes to and must not ingest them.
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    if let Some(inbound) = handler::to_inbound_message(&msg)
                        && tx.send(InboundEvent::Message(inbound)).await.is_err()
                    {
                        warn!("inbound channel closed, dropping message");
                    }

                    respond(())
                }
            });

            let callback_branch =
                Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                    let tx = cb_tx.clone();
                    async move {
                        if let Some(press) = handler::to_callback_press(&query)
                            && tx.send(InboundEvent::Callback(press)).await.is_err()
                        {
                            warn!("inbound channel closed, dropping callback");
                        }
                        respond(())
                    }
                });

            let tree = dptree::entry()
                .branch(message_branch)
                .branch(callback_branch);

            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudError> {
        let mut request = self
            .bot
            .send_message(Recipient::Id(ChatId(msg.chat_id)), &msg.text);
        if let Some(keyboard) = msg.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }

        let sent = request
            .await
            .map_err(|e| channel_err("failed to send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn copy_message(
        &self,
        to_chat: i64,
        from_chat: i64,
        message: &MessageId,
    ) -> Result<MessageId, OmbudError> {
        let msg_id = message
            .0
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|_| OmbudError::Channel {
                message: format!("invalid message id `{}`", message.0),
                source: None,
            })?;

        let copied = self
            .bot
            .copy_message(
                Recipient::Id(ChatId(to_chat)),
                Recipient::Id(ChatId(from_chat)),
                msg_id,
            )
            .await
            .map_err(|e| channel_err("failed to copy message", e))?;
        Ok(MessageId(copied.0.to_string()))
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), OmbudError> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        if alert {
            request = request.show_alert(true);
        }

        request
            .await
            .map_err(|e| channel_err("failed to answer callback", e))?;
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, OmbudError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| OmbudError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombud_core::types::InlineButton;

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new("").is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let channel = TelegramChannel::new("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11");
        assert!(channel.is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new("test:token").unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn keyboard_conversion_preserves_shape() {
        let keyboard = InlineKeyboard::new(vec![
            vec![
                InlineButton::new("Yes", "anon:yes"),
                InlineButton::new("No", "anon:no"),
            ],
            vec![InlineButton::new("Menu", "menu:home")],
        ]);
        let markup = to_markup(keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "Yes");
    }
}
