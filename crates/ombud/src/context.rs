// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared handles every event handler works against.

use std::sync::Arc;

use ombud_core::ChannelAdapter;
use ombud_directory::Directory;
use ombud_flow::IntakeFlow;
use ombud_router::{Router, StatusControl};
use ombud_tickets::TicketRegistry;

/// Wiring for one running bot instance.
///
/// Everything is behind `Arc` so each inbound event can be handled in its
/// own spawned task.
pub struct BotContext {
    pub channel: Arc<dyn ChannelAdapter>,
    pub directory: Arc<Directory>,
    pub registry: Arc<TicketRegistry>,
    pub flow: Arc<IntakeFlow>,
    pub router: Arc<Router>,
    pub status: Arc<StatusControl>,
    pub owner_id: i64,
}
