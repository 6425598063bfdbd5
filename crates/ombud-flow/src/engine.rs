// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake wizard: decides, for every inbound event, what to say next
//! and when a submission is ready for the router.
//!
//! The engine never talks to the channel itself; it returns prompts and
//! dispositions so the dispatch layer stays in charge of delivery and the
//! whole machine is testable without a network.

use std::sync::Arc;

use tracing::debug;

use ombud_core::callback::{CallbackData, MenuAction};
use ombud_core::types::{InlineButton, InlineKeyboard};
use ombud_directory::Directory;

use crate::session::{ConversationState, SessionStore, Stage};

/// A message the wizard wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

/// What to do with a free-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDisposition {
    /// The flow is ready: hand the message to the router.
    Submit { anonymous: bool, category: String },
    /// Not ready; show this prompt instead. The bot never silently drops a
    /// message -- it always re-offers the entry point.
    Reprompt(Prompt),
}

/// The conversation flow engine.
pub struct IntakeFlow {
    sessions: SessionStore,
    directory: Arc<Directory>,
}

impl IntakeFlow {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self {
            sessions: SessionStore::new(),
            directory,
        }
    }

    /// The injected session store (exposed for diagnostics).
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn home_button() -> InlineButton {
        InlineButton::new("🏠 Menu", CallbackData::Menu(MenuAction::Home).encode())
    }

    /// The home menu prompt.
    pub fn menu_prompt(&self) -> Prompt {
        Prompt {
            text: self.directory.texts().menu.clone(),
            keyboard: Some(InlineKeyboard::column(vec![
                InlineButton::new(
                    "✍️ New request",
                    CallbackData::Menu(MenuAction::Start).encode(),
                ),
                InlineButton::new(
                    "📂 Categories",
                    CallbackData::Menu(MenuAction::Categories).encode(),
                ),
            ])),
        }
    }

    fn anonymity_prompt(&self) -> Prompt {
        Prompt {
            text: self.directory.texts().anonymity_prompt.clone(),
            keyboard: Some(InlineKeyboard::new(vec![
                vec![
                    InlineButton::new("🙈 Yes", CallbackData::Anonymity(true).encode()),
                    InlineButton::new("🙋 No", CallbackData::Anonymity(false).encode()),
                ],
                vec![Self::home_button()],
            ])),
        }
    }

    fn category_prompt(&self) -> Prompt {
        let mut buttons: Vec<InlineButton> = self
            .directory
            .categories()
            .iter()
            .map(|c| InlineButton::new(&c.label, CallbackData::Category(c.key.clone()).encode()))
            .collect();
        buttons.push(Self::home_button());
        Prompt {
            text: self.directory.texts().category_prompt.clone(),
            keyboard: Some(InlineKeyboard::column(buttons)),
        }
    }

    fn message_prompt(&self) -> Prompt {
        Prompt {
            text: self.directory.texts().message_prompt.clone(),
            keyboard: Some(InlineKeyboard::column(vec![Self::home_button()])),
        }
    }

    fn prompt_for(&self, stage: Stage) -> Prompt {
        match stage {
            Stage::Menu => self.menu_prompt(),
            Stage::Anonymity => self.anonymity_prompt(),
            Stage::Category => self.category_prompt(),
            Stage::AwaitMessage => self.message_prompt(),
        }
    }

    /// `/start` (and `/menu`): back to the home menu.
    pub async fn on_start(&self, user_id: i64) -> Prompt {
        self.sessions.reset(user_id).await;
        self.menu_prompt()
    }

    /// Handle an inline-button selection belonging to the wizard.
    ///
    /// A selection that does not match the current stage (a stale button on
    /// an old message) re-sends the prompt for the current stage and leaves
    /// the state unchanged.
    pub async fn on_selection(&self, user_id: i64, data: &CallbackData) -> Prompt {
        let mut state = self.sessions.get(user_id).await;

        let prompt = match (state.stage, data) {
            (_, CallbackData::Menu(MenuAction::Home)) => {
                self.sessions.reset(user_id).await;
                return self.menu_prompt();
            }
            (Stage::Menu, CallbackData::Menu(MenuAction::Start)) => {
                state.stage = Stage::Anonymity;
                self.anonymity_prompt()
            }
            (Stage::Menu, CallbackData::Menu(MenuAction::Categories)) => {
                // Shortcut: skip the anonymity question when it was already
                // answered in a prior cycle.
                if state.anonymous.is_some() {
                    state.stage = Stage::Category;
                    self.category_prompt()
                } else {
                    state.stage = Stage::Anonymity;
                    self.anonymity_prompt()
                }
            }
            (Stage::Anonymity, CallbackData::Anonymity(flag)) => {
                state.anonymous = Some(*flag);
                state.stage = Stage::Category;
                self.category_prompt()
            }
            (Stage::Category, CallbackData::Category(key)) => {
                if self.directory.category_label(key).is_some() {
                    state.category = Some(key.clone());
                    state.stage = Stage::AwaitMessage;
                    self.message_prompt()
                } else {
                    debug!(user_id, category = %key, "unknown category selected");
                    return self.category_prompt();
                }
            }
            (stage, _) => {
                debug!(user_id, stage = %stage, "selection does not match stage");
                return self.prompt_for(stage);
            }
        };

        self.sessions.set(user_id, state).await;
        prompt
    }

    /// Handle a free-text (or media) message from the user.
    ///
    /// Guard invariant: a submission is produced only when the state is
    /// exactly `AwaitMessage` with a category present. Any other non-menu
    /// state resets to the menu with the start-over text, so an orphaned
    /// ticket without a category can never be created.
    pub async fn on_text(&self, user_id: i64) -> TextDisposition {
        let state = self.sessions.get(user_id).await;

        match (state.stage, state.anonymous, &state.category) {
            (Stage::AwaitMessage, Some(anonymous), Some(category)) => TextDisposition::Submit {
                anonymous,
                category: category.clone(),
            },
            (Stage::Menu, _, _) => TextDisposition::Reprompt(self.menu_prompt()),
            _ => {
                debug!(user_id, stage = %state.stage, "text outside await_message, resetting");
                self.sessions.reset(user_id).await;
                let menu = self.menu_prompt();
                TextDisposition::Reprompt(Prompt {
                    text: format!("{}\n\n{}", self.directory.texts().start_over, menu.text),
                    keyboard: menu.keyboard,
                })
            }
        }
    }

    /// Mark a submission as routed: the wizard returns to the menu.
    pub async fn complete(&self, user_id: i64) {
        self.sessions.reset(user_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombud_core::callback::StatusAction;
    use ombud_test_utils::MemoryStore;

    async fn flow() -> IntakeFlow {
        let store = Arc::new(MemoryStore::new());
        IntakeFlow::new(Arc::new(Directory::load(store).await))
    }

    async fn walk_to_await_message(flow: &IntakeFlow, user: i64, anonymous: bool) {
        flow.on_start(user).await;
        flow.on_selection(user, &CallbackData::Menu(MenuAction::Start)).await;
        flow.on_selection(user, &CallbackData::Anonymity(anonymous)).await;
        flow.on_selection(user, &CallbackData::Category("psy".into())).await;
    }

    #[tokio::test]
    async fn text_in_menu_never_submits() {
        let flow = flow().await;
        match flow.on_text(7).await {
            TextDisposition::Reprompt(prompt) => {
                assert!(prompt.keyboard.is_some(), "menu must be re-offered");
            }
            TextDisposition::Submit { .. } => panic!("submission from menu state"),
        }
    }

    #[tokio::test]
    async fn full_walk_reaches_submission() {
        let flow = flow().await;
        walk_to_await_message(&flow, 7, false).await;

        match flow.on_text(7).await {
            TextDisposition::Submit { anonymous, category } => {
                assert!(!anonymous);
                assert_eq!(category, "psy");
            }
            other => panic!("expected submission, got {other:?}"),
        }

        // After completion the wizard is back at the menu.
        flow.complete(7).await;
        assert!(matches!(flow.on_text(7).await, TextDisposition::Reprompt(_)));
    }

    #[tokio::test]
    async fn await_message_unreachable_without_category() {
        let flow = flow().await;
        flow.on_start(7).await;
        flow.on_selection(7, &CallbackData::Menu(MenuAction::Start)).await;
        flow.on_selection(7, &CallbackData::Anonymity(true)).await;

        // Text while still choosing a category resets to menu, no submission.
        match flow.on_text(7).await {
            TextDisposition::Reprompt(prompt) => {
                assert!(prompt.text.contains("start over"));
            }
            TextDisposition::Submit { .. } => panic!("guard must refuse submission"),
        }
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Menu);
    }

    #[tokio::test]
    async fn skipping_stages_with_stale_buttons_is_rejected() {
        let flow = flow().await;
        flow.on_start(7).await;

        // Category button pressed while still at the menu: no stage change.
        flow.on_selection(7, &CallbackData::Category("psy".into())).await;
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Menu);
        assert!(flow.sessions().get(7).await.category.is_none());

        // Anonymity button in menu state likewise.
        flow.on_selection(7, &CallbackData::Anonymity(true)).await;
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Menu);
    }

    #[tokio::test]
    async fn categories_shortcut_requires_cached_anonymity() {
        let flow = flow().await;

        // First cycle: no cached choice, shortcut goes to the anonymity stage.
        flow.on_start(7).await;
        flow.on_selection(7, &CallbackData::Menu(MenuAction::Categories)).await;
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Anonymity);

        // Complete one full cycle, then the shortcut skips straight to category.
        flow.on_selection(7, &CallbackData::Anonymity(false)).await;
        flow.on_selection(7, &CallbackData::Category("psy".into())).await;
        flow.complete(7).await;

        flow.on_selection(7, &CallbackData::Menu(MenuAction::Categories)).await;
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Category);
    }

    #[tokio::test]
    async fn home_cancels_from_any_stage() {
        let flow = flow().await;
        walk_to_await_message(&flow, 7, true).await;

        flow.on_selection(7, &CallbackData::Menu(MenuAction::Home)).await;
        let state = flow.sessions().get(7).await;
        assert_eq!(state.stage, Stage::Menu);
        assert!(state.category.is_none());
        // Nothing was created; text now re-prompts instead of submitting.
        assert!(matches!(flow.on_text(7).await, TextDisposition::Reprompt(_)));
    }

    #[tokio::test]
    async fn unknown_category_reprompts_without_advancing() {
        let flow = flow().await;
        flow.on_start(7).await;
        flow.on_selection(7, &CallbackData::Menu(MenuAction::Start)).await;
        flow.on_selection(7, &CallbackData::Anonymity(false)).await;

        let prompt = flow.on_selection(7, &CallbackData::Category("bogus".into())).await;
        assert_eq!(flow.sessions().get(7).await.stage, Stage::Category);
        assert!(prompt.keyboard.is_some());
    }

    #[tokio::test]
    async fn status_callbacks_do_not_touch_the_wizard() {
        let flow = flow().await;
        walk_to_await_message(&flow, 7, false).await;

        let data = CallbackData::Status {
            action: StatusAction::Taken,
            ticket_id: "A1B2C3".into(),
        };
        flow.on_selection(7, &data).await;
        // Stage unchanged; the status control is a different component.
        assert_eq!(flow.sessions().get(7).await.stage, Stage::AwaitMessage);
    }

    #[tokio::test]
    async fn menu_prompt_lists_categories_and_start() {
        let flow = flow().await;
        let prompt = flow.menu_prompt();
        let keyboard = prompt.keyboard.unwrap();
        let data: Vec<&str> = keyboard
            .rows
            .iter()
            .flatten()
            .map(|b| b.data.as_str())
            .collect();
        assert!(data.contains(&"menu:start"));
        assert!(data.contains(&"menu:cats"));
    }
}
