// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ombud serve` command implementation.
//!
//! Wires the JSON store, directory, ticket registry, intake flow, router,
//! status control, audit logger, and the Telegram channel, then runs the
//! event loop: one spawned task per inbound event, graceful shutdown on
//! SIGINT/SIGTERM.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use ombud_config::OmbudConfig;
use ombud_core::{AuditAdapter, ChannelAdapter, OmbudError, PluginAdapter, StorageAdapter};
use ombud_directory::Directory;
use ombud_flow::IntakeFlow;
use ombud_router::{Router, StatusControl, WorkingHours};
use ombud_sheets::SheetsLogger;
use ombud_storage::JsonStore;
use ombud_telegram::TelegramChannel;
use ombud_tickets::TicketRegistry;

use crate::context::BotContext;
use crate::dispatch;

/// Runs the `ombud serve` command.
pub async fn run_serve(config: OmbudConfig) -> Result<(), OmbudError> {
    init_tracing(&config.bot.log_level);

    info!("starting ombud serve");

    // Bootstrap-fatal checks: these are the only fatal conditions, and only
    // at startup.
    let token = config
        .bot
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| OmbudError::Config("bot.token is required for serve".into()))?;
    if config.bot.owner_id == 0 {
        return Err(OmbudError::Config("bot.owner_id is required for serve".into()));
    }

    // Storage.
    let store: Arc<dyn StorageAdapter> = Arc::new(JsonStore::new(&config.storage.data_path));
    store.initialize().await?;
    info!(path = %config.storage.data_path, "json store initialized");

    // Directory (categories and texts load once; staff/groups read live).
    let directory = Arc::new(Directory::load(store.clone()).await);

    // Ticket registry.
    let registry = Arc::new(TicketRegistry::new(store.clone()));

    // Audit logger.
    let audit: Arc<dyn AuditAdapter> = Arc::new(SheetsLogger::new(&config.audit)?);
    if config.audit.webhook_url.is_some() {
        info!("audit webhook enabled");
    } else {
        info!("audit webhook not configured, events will not be logged externally");
    }

    // Working hours.
    let hours = WorkingHours::from_config(&config.hours)?;

    // Telegram channel.
    let mut telegram = TelegramChannel::new(token)?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);
    info!("telegram channel connected");

    // Flow, router, status control.
    let flow = Arc::new(IntakeFlow::new(directory.clone()));
    let router = Arc::new(Router::new(
        channel.clone(),
        directory.clone(),
        registry.clone(),
        audit.clone(),
        hours,
        config.messages.clone(),
    ));
    let status = Arc::new(StatusControl::new(
        channel.clone(),
        directory.clone(),
        registry.clone(),
        audit.clone(),
        config.bot.owner_id,
    ));

    let ctx = Arc::new(BotContext {
        channel: channel.clone(),
        directory,
        registry,
        flow,
        router,
        status,
        owner_id: config.bot.owner_id,
    });

    let cancel = install_signal_handler();

    info!("ombud is ready, entering event loop");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("shutdown requested, leaving event loop");
                break;
            }
            event = channel.receive() => {
                match event {
                    Ok(event) => {
                        let ctx = ctx.clone();
                        tokio::spawn(async move {
                            dispatch::handle_event(&ctx, event).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "inbound channel failed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    channel.shutdown().await?;
    store.close().await?;
    info!("ombud stopped");
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ombud={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
