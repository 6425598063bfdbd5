// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ombud: intake-and-routing bot for a nonprofit team.
//!
//! The binary wires the adapter implementations together; the actual
//! behavior lives in the component crates (flow, router, tickets,
//! directory). This library surface exists so integration tests can drive
//! the dispatch path with mock adapters.

pub mod commands;
pub mod context;
pub mod dispatch;
pub mod serve;

pub use context::BotContext;
