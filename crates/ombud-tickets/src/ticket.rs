// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket record and status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ticket lifecycle status.
///
/// Any status is reachable from any status: staff coordinate out of band
/// and the control is deliberately last-writer-wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    InProgress,
    Waiting,
    Done,
}

impl TicketStatus {
    /// Human wording for confirmation messages.
    pub fn human(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Waiting => "waiting",
            TicketStatus::Done => "done",
        }
    }
}

/// A single routed user submission, tracked by id and status.
///
/// `user_id` always holds the true originator, even for anonymous tickets;
/// anonymity only affects what downstream surfaces display. Tickets are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub anonymous: bool,
    pub category: String,
    pub status: TicketStatus,
    pub assignee: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        use std::str::FromStr;
        for status in [
            TicketStatus::New,
            TicketStatus::InProgress,
            TicketStatus::Waiting,
            TicketStatus::Done,
        ] {
            let s = status.to_string();
            assert_eq!(TicketStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn ticket_serializes_status_snake_case() {
        let ticket = Ticket {
            id: "A1B2C3".into(),
            created_at: Utc::now(),
            user_id: 42,
            anonymous: false,
            category: "psy".into(),
            status: TicketStatus::InProgress,
            assignee: Some("Jane".into()),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["user_id"], 42);
    }
}
