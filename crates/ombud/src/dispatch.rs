// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event dispatch: decides whether an inbound event is a command, a
//! wizard step, a submission, or a status-control press, and drives the
//! right component.
//!
//! Nothing here is fatal: every failure is logged and the loop moves on.

use tracing::{debug, error};

use ombud_core::ChannelAdapter;
use ombud_core::callback::CallbackData;
use ombud_core::types::{
    CallbackPress, InboundEvent, InboundMessage, MessageContent, OutboundMessage,
};
use ombud_flow::{Prompt, TextDisposition};

use crate::commands;
use crate::context::BotContext;

/// Handle one inbound event. Called from a spawned task per event.
pub async fn handle_event(ctx: &BotContext, event: InboundEvent) {
    match event {
        InboundEvent::Message(msg) => handle_message(ctx, msg).await,
        InboundEvent::Callback(press) => handle_callback(ctx, press).await,
    }
}

async fn send_prompt(ctx: &BotContext, chat_id: i64, prompt: Prompt) {
    let outbound = match prompt.keyboard {
        Some(keyboard) => OutboundMessage::with_keyboard(chat_id, prompt.text, keyboard),
        None => OutboundMessage::text(chat_id, prompt.text),
    };
    if let Err(e) = ctx.channel.send(outbound).await {
        error!(chat_id, error = %e, "prompt delivery failed");
    }
}

async fn handle_message(ctx: &BotContext, msg: InboundMessage) {
    if let MessageContent::Text(ref text) = msg.content
        && text.starts_with('/')
    {
        if let Err(e) = commands::handle_command(ctx, &msg, text).await {
            error!(user_id = msg.sender.user_id, error = %e, "command handling failed");
        }
        return;
    }

    match ctx.flow.on_text(msg.sender.user_id).await {
        TextDisposition::Submit {
            anonymous,
            category,
        } => {
            match ctx.router.route_submission(&msg, anonymous, &category).await {
                Ok(ticket) => {
                    ctx.flow.complete(msg.sender.user_id).await;
                    debug!(ticket_id = %ticket.id, "submission completed");
                }
                Err(e) => {
                    // The flow state is kept so the user can simply resend.
                    error!(user_id = msg.sender.user_id, error = %e, "routing failed");
                }
            }
        }
        TextDisposition::Reprompt(prompt) => {
            send_prompt(ctx, msg.chat_id, prompt).await;
        }
    }
}

async fn handle_callback(ctx: &BotContext, press: CallbackPress) {
    match CallbackData::parse(&press.data) {
        Some(CallbackData::Status { action, ticket_id }) => {
            if let Err(e) = ctx.status.handle(&press, action, &ticket_id).await {
                error!(ticket_id = %ticket_id, error = %e, "status control failed");
            }
        }
        Some(data) => {
            let prompt = ctx.flow.on_selection(press.sender.user_id, &data).await;
            if let Err(e) = ctx.channel.answer_callback(&press.id, None, false).await {
                debug!(error = %e, "callback answer failed");
            }
            send_prompt(ctx, press.chat_id, prompt).await;
        }
        None => {
            debug!(data = %press.data, "unrecognized callback payload");
            // Still stop the spinner on stale buttons.
            let _ = ctx.channel.answer_callback(&press.id, None, false).await;
        }
    }
}
