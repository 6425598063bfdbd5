// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket header construction.
//!
//! One textual header summarizes the ticket for staff; the original message
//! is forwarded verbatim right after it. Sender identity appears only when
//! the submitter chose not to be anonymous.

use chrono::FixedOffset;

use ombud_core::types::Sender;
use ombud_tickets::Ticket;

/// Build the header delivered ahead of the forwarded message.
pub fn build_header(
    ticket: &Ticket,
    category_label: &str,
    sender: &Sender,
    offset: &FixedOffset,
) -> String {
    let local = ticket.created_at.with_timezone(offset);
    let mut header = format!(
        "🟦 New request #{}\nCategory: {}\nReceived: {}",
        ticket.id,
        category_label,
        local.format("%Y-%m-%d %H:%M (%:z)"),
    );

    if ticket.anonymous {
        header.push_str("\nFrom: anonymous");
    } else {
        header.push_str(&format!(
            "\nFrom: {} (id {})",
            sender.display_name(),
            sender.user_id
        ));
        if let Some(ref username) = sender.username {
            header.push_str(&format!(" @{username}"));
        }
    }

    header
}
