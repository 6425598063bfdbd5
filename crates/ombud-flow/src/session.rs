// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state, held only in process memory.
//!
//! The session store is injected into the flow engine rather than accessed
//! as ambient global state. Sessions are created on first touch, cleared on
//! completion or cancellation, and have no expiry: a user who starts the
//! wizard and walks away stays parked until they act again.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Stages of the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Home menu; initial state and the state after completion/cancellation.
    #[default]
    Menu,
    /// Awaiting the anonymity yes/no choice.
    Anonymity,
    /// Awaiting a category selection.
    Category,
    /// Awaiting the free-text submission.
    AwaitMessage,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Menu => write!(f, "menu"),
            Stage::Anonymity => write!(f, "anonymity"),
            Stage::Category => write!(f, "category"),
            Stage::AwaitMessage => write!(f, "await_message"),
        }
    }
}

/// Ephemeral per-user wizard state.
///
/// Invariant: `AwaitMessage` is only ever entered with `category` set, and
/// `Category` only with `anonymous` set; the flow engine enforces both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub stage: Stage,
    pub anonymous: Option<bool>,
    pub category: Option<String>,
}

/// In-memory session store keyed by user id.
pub struct SessionStore {
    inner: Mutex<HashMap<i64, ConversationState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Current state for a user, defaulting to a fresh menu session.
    pub async fn get(&self, user_id: i64) -> ConversationState {
        self.inner
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a user's state.
    pub async fn set(&self, user_id: i64, state: ConversationState) {
        self.inner.lock().await.insert(user_id, state);
    }

    /// Reset to the menu, keeping the remembered anonymity choice so the
    /// "categories" shortcut works on the next cycle.
    pub async fn reset(&self, user_id: i64) {
        let mut sessions = self.inner.lock().await;
        let anonymous = sessions.get(&user_id).and_then(|s| s.anonymous);
        sessions.insert(
            user_id,
            ConversationState {
                stage: Stage::Menu,
                anonymous,
                category: None,
            },
        );
    }

    /// Number of live sessions (for diagnostics).
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
