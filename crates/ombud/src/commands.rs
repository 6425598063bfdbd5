// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command surface: public entry points plus the owner-only admin CRUD over
//! the directory and registry.

use tracing::info;

use ombud_core::types::{InboundMessage, OutboundMessage};
use ombud_core::{ChannelAdapter, OmbudError};
use ombud_directory::StaffMember;

use crate::context::BotContext;

const DEFAULT_REPORT_DAYS: i64 = 7;

/// Split `/cmd@BotName arg1 arg2` into the bare command and its arguments.
fn parse_command(text: &str) -> (String, Vec<&str>) {
    let mut parts = text.split_whitespace();
    let head = parts.next().unwrap_or("");
    let command = head
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    (command, parts.collect())
}

async fn reply(ctx: &BotContext, msg: &InboundMessage, text: impl Into<String>) -> Result<(), OmbudError> {
    ctx.channel
        .send(OutboundMessage::text(msg.chat_id, text))
        .await?;
    Ok(())
}

/// Handle a slash command.
pub async fn handle_command(
    ctx: &BotContext,
    msg: &InboundMessage,
    text: &str,
) -> Result<(), OmbudError> {
    let (command, args) = parse_command(text);
    let is_owner = msg.sender.user_id == ctx.owner_id;

    match command.as_str() {
        "start" | "menu" => {
            let prompt = ctx.flow.on_start(msg.sender.user_id).await;
            let greeting = &ctx.directory.texts().greeting;
            let outbound = OutboundMessage {
                chat_id: msg.chat_id,
                text: format!("{greeting}\n\n{}", prompt.text),
                keyboard: prompt.keyboard,
            };
            ctx.channel.send(outbound).await?;
            Ok(())
        }
        "help" => reply(ctx, msg, ctx.directory.texts().help.clone()).await,

        "staff" | "addstaff" | "removestaff" | "setgroup" | "groups" | "report" if !is_owner => {
            reply(ctx, msg, "⛔ Access denied.").await
        }

        "staff" => {
            let staff = ctx.directory.staff().await;
            if staff.is_empty() {
                return reply(ctx, msg, "Staff list is empty.").await;
            }
            let lines: Vec<String> = staff.iter().map(StaffMember::describe).collect();
            reply(ctx, msg, format!("👥 Staff:\n{}", lines.join("\n"))).await
        }
        "addstaff" => {
            let Some(user_id) = args.first().and_then(|a| a.parse::<i64>().ok()) else {
                return reply(ctx, msg, "Usage: /addstaff <user_id> [@username] [Name]").await;
            };
            let username = args
                .get(1)
                .map(|u| u.trim_start_matches('@').to_string())
                .filter(|u| !u.is_empty());
            let name = if args.len() > 2 {
                Some(args[2..].join(" "))
            } else {
                None
            };

            ctx.directory
                .upsert_staff(StaffMember {
                    user_id,
                    username,
                    name,
                    active: true,
                })
                .await?;
            info!(user_id, "staff member added");
            reply(ctx, msg, format!("✅ Added staff member {user_id}.")).await
        }
        "removestaff" => {
            let Some(user_id) = args.first().and_then(|a| a.parse::<i64>().ok()) else {
                return reply(ctx, msg, "Usage: /removestaff <user_id>").await;
            };
            if ctx.directory.deactivate_staff(user_id).await? {
                info!(user_id, "staff member deactivated");
                reply(ctx, msg, format!("🗑 Deactivated staff member {user_id}.")).await
            } else {
                reply(ctx, msg, "No such staff member.").await
            }
        }
        "setgroup" => {
            let Some(chat_id) = args.first().and_then(|a| a.parse::<i64>().ok()) else {
                return reply(
                    ctx,
                    msg,
                    "Usage: /setgroup <group_id>\nExample: -1001234567890",
                )
                .await;
            };
            ctx.directory.set_primary_group(chat_id).await?;
            info!(chat_id, "routing group set");
            reply(ctx, msg, format!("✅ Routing group set to {chat_id}.")).await
        }
        "groups" => {
            let groups = ctx.directory.groups().await;
            if groups.is_empty() {
                return reply(ctx, msg, "No routing groups configured.").await;
            }
            let lines: Vec<String> = groups
                .iter()
                .map(|g| {
                    let name = g.name.as_deref().unwrap_or("");
                    let state = if g.active { "active" } else { "inactive" };
                    format!("- {} {name} ({state})", g.chat_id)
                })
                .collect();
            reply(ctx, msg, format!("💬 Groups:\n{}", lines.join("\n"))).await
        }
        "report" => {
            let days = args
                .first()
                .and_then(|a| a.parse::<i64>().ok())
                .unwrap_or(DEFAULT_REPORT_DAYS);
            let report = ctx.registry.report(days).await?;

            let mut out = format!(
                "📊 Last {days} days: {} tickets ({} anonymous)\n",
                report.total, report.anonymous
            );
            if !report.by_category.is_empty() {
                out.push_str("\nBy category:\n");
                for (category, count) in &report.by_category {
                    let label = ctx.directory.category_label(category).unwrap_or(category.as_str());
                    out.push_str(&format!("- {label}: {count}\n"));
                }
            }
            if !report.by_status.is_empty() {
                out.push_str("\nBy status:\n");
                for (status, count) in &report.by_status {
                    out.push_str(&format!("- {status}: {count}\n"));
                }
            }
            reply(ctx, msg, out.trim_end().to_string()).await
        }
        _ => reply(ctx, msg, ctx.directory.texts().help.clone()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ombud_config::model::MessagesConfig;
    use ombud_core::StorageAdapter;
    use ombud_core::types::{MessageContent, MessageId, Sender};
    use ombud_directory::Directory;
    use ombud_flow::IntakeFlow;
    use ombud_router::{Router, StatusControl, WorkingHours};
    use ombud_tickets::TicketRegistry;
    use ombud_test_utils::{MemoryStore, MockAudit, MockChannel};
    use serde_json::json;

    const OWNER: i64 = 1;

    async fn context(doc: serde_json::Value) -> (Arc<BotContext>, Arc<MockChannel>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.seed(doc).await;
        let channel = Arc::new(MockChannel::new());
        let audit = Arc::new(MockAudit::new());
        let directory = Arc::new(Directory::load(store.clone()).await);
        let registry = Arc::new(TicketRegistry::new(store.clone()));
        let flow = Arc::new(IntakeFlow::new(directory.clone()));
        let hours = WorkingHours::from_config(&Default::default()).unwrap();
        let router = Arc::new(Router::new(
            channel.clone(),
            directory.clone(),
            registry.clone(),
            audit.clone(),
            hours,
            MessagesConfig::default(),
        ));
        let status = Arc::new(StatusControl::new(
            channel.clone(),
            directory.clone(),
            registry.clone(),
            audit,
            OWNER,
        ));
        let ctx = Arc::new(BotContext {
            channel: channel.clone(),
            directory,
            registry,
            flow,
            router,
            status,
            owner_id: OWNER,
        });
        (ctx, channel, store)
    }

    fn message(user_id: i64, text: &str) -> InboundMessage {
        InboundMessage {
            id: MessageId("1".into()),
            chat_id: user_id,
            sender: Sender {
                user_id,
                username: None,
                full_name: "Test".into(),
            },
            content: MessageContent::Text(text.into()),
            timestamp: "2026-08-03T10:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn start_sends_greeting_with_menu_keyboard() {
        let (ctx, channel, _) = context(json!({})).await;
        handle_command(&ctx, &message(9, "/start"), "/start").await.unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].keyboard.is_some());
        assert!(sent[0].text.contains("intake bot"));
    }

    #[tokio::test]
    async fn command_with_bot_suffix_still_parses() {
        let (ctx, channel, _) = context(json!({})).await;
        handle_command(&ctx, &message(9, "/help@OmbudBot"), "/help@OmbudBot")
            .await
            .unwrap();
        assert_eq!(channel.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn admin_commands_denied_for_non_owner() {
        let (ctx, channel, store) = context(json!({})).await;
        handle_command(&ctx, &message(9, "/addstaff 77"), "/addstaff 77")
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Access denied"));
        assert!(store.get("staff").await.unwrap().is_none(), "no state change");
    }

    #[tokio::test]
    async fn addstaff_rejects_non_numeric_id_without_mutation() {
        let (ctx, channel, store) = context(json!({})).await;
        handle_command(&ctx, &message(OWNER, "/addstaff abc"), "/addstaff abc")
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert!(sent[0].text.starts_with("Usage:"));
        assert!(store.get("staff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn addstaff_and_staff_listing() {
        let (ctx, channel, _) = context(json!({})).await;
        handle_command(
            &ctx,
            &message(OWNER, "/addstaff 501 @ada Ada Lovelace"),
            "/addstaff 501 @ada Ada Lovelace",
        )
        .await
        .unwrap();

        assert!(ctx.directory.is_active_staff(501).await);

        channel.clear_captured().await;
        handle_command(&ctx, &message(OWNER, "/staff"), "/staff").await.unwrap();
        let sent = channel.sent_messages().await;
        assert!(sent[0].text.contains("501"));
        assert!(sent[0].text.contains("@ada"));
        assert!(sent[0].text.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn removestaff_soft_deletes() {
        let (ctx, channel, _) = context(json!({
            "staff": {"501": {"active": true}}
        }))
        .await;

        handle_command(&ctx, &message(OWNER, "/removestaff 501"), "/removestaff 501")
            .await
            .unwrap();
        assert!(!ctx.directory.is_active_staff(501).await);
        assert_eq!(ctx.directory.staff().await.len(), 1, "entry kept, inactive");

        channel.clear_captured().await;
        handle_command(&ctx, &message(OWNER, "/removestaff 999"), "/removestaff 999")
            .await
            .unwrap();
        let sent = channel.sent_messages().await;
        assert!(sent[0].text.contains("No such staff member"));
    }

    #[tokio::test]
    async fn setgroup_replaces_routing_group() {
        let (ctx, _, _) = context(json!({})).await;
        handle_command(
            &ctx,
            &message(OWNER, "/setgroup -1001234567890"),
            "/setgroup -1001234567890",
        )
        .await
        .unwrap();

        let groups = ctx.directory.active_groups().await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].chat_id, -1001234567890);
    }

    #[tokio::test]
    async fn report_summarizes_tickets() {
        let (ctx, channel, _) = context(json!({})).await;
        ctx.registry.create_ticket(11, false, "psy").await.unwrap();
        ctx.registry.create_ticket(12, true, "legal").await.unwrap();

        handle_command(&ctx, &message(OWNER, "/report"), "/report").await.unwrap();
        let sent = channel.sent_messages().await;
        assert!(sent[0].text.contains("2 tickets"));
        assert!(sent[0].text.contains("1 anonymous"));
        assert!(sent[0].text.contains("Psychological support: 1"));
        assert!(sent[0].text.contains("new: 2"));
    }
}
