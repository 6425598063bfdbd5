// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake conversation flow for the Ombud routing bot.
//!
//! A per-user wizard (anonymity choice, category selection, message
//! collection) with an injected in-memory session store. The engine decides
//! what to say; the dispatch layer decides how to deliver it.

pub mod engine;
pub mod session;

pub use engine::{IntakeFlow, Prompt, TextDisposition};
pub use session::{ConversationState, SessionStore, Stage};
