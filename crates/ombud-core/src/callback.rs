// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback-data wire format for inline buttons.
//!
//! Payloads are short prefixed strings (`menu:start`, `anon:yes`,
//! `cat:<key>`, `st:<action>:<ticket>`) so they stay well under the chat
//! platform's 64-byte callback-data limit.

use strum::{Display, EnumString};

/// Navigation selections available from the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Begin the intake wizard from the anonymity question.
    Start,
    /// Jump to category selection (skips anonymity when already answered).
    Categories,
    /// Cancel whatever is in progress and return to the menu.
    Home,
}

/// Staff actions exposed on group ticket headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatusAction {
    Taken,
    Waiting,
    Done,
}

/// Decoded callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
    Menu(MenuAction),
    Anonymity(bool),
    Category(String),
    Status {
        action: StatusAction,
        ticket_id: String,
    },
}

impl CallbackData {
    /// Encode into the wire string carried in the inline button.
    pub fn encode(&self) -> String {
        match self {
            CallbackData::Menu(MenuAction::Start) => "menu:start".to_string(),
            CallbackData::Menu(MenuAction::Categories) => "menu:cats".to_string(),
            CallbackData::Menu(MenuAction::Home) => "menu:home".to_string(),
            CallbackData::Anonymity(true) => "anon:yes".to_string(),
            CallbackData::Anonymity(false) => "anon:no".to_string(),
            CallbackData::Category(key) => format!("cat:{key}"),
            CallbackData::Status { action, ticket_id } => format!("st:{action}:{ticket_id}"),
        }
    }

    /// Parse a wire string. Returns `None` for anything unrecognized --
    /// stale buttons from older bot versions are ignored, not errors.
    pub fn parse(data: &str) -> Option<Self> {
        let (prefix, rest) = data.split_once(':')?;
        match prefix {
            "menu" => match rest {
                "start" => Some(CallbackData::Menu(MenuAction::Start)),
                "cats" => Some(CallbackData::Menu(MenuAction::Categories)),
                "home" => Some(CallbackData::Menu(MenuAction::Home)),
                _ => None,
            },
            "anon" => match rest {
                "yes" => Some(CallbackData::Anonymity(true)),
                "no" => Some(CallbackData::Anonymity(false)),
                _ => None,
            },
            "cat" if !rest.is_empty() => Some(CallbackData::Category(rest.to_string())),
            "st" => {
                let (action, ticket_id) = rest.split_once(':')?;
                if ticket_id.is_empty() {
                    return None;
                }
                Some(CallbackData::Status {
                    action: action.parse().ok()?,
                    ticket_id: ticket_id.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_variants() {
        let samples = vec![
            CallbackData::Menu(MenuAction::Start),
            CallbackData::Menu(MenuAction::Categories),
            CallbackData::Menu(MenuAction::Home),
            CallbackData::Anonymity(true),
            CallbackData::Anonymity(false),
            CallbackData::Category("psy".into()),
            CallbackData::Status {
                action: StatusAction::Taken,
                ticket_id: "A1B2C3".into(),
            },
            CallbackData::Status {
                action: StatusAction::Done,
                ticket_id: "ZZZZZZ".into(),
            },
        ];
        for sample in samples {
            let wire = sample.encode();
            assert_eq!(CallbackData::parse(&wire), Some(sample), "wire: {wire}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "menu", "menu:", "anon:maybe", "cat:", "st:taken", "st:taken:", "st:eaten:A1", "xx:yy"] {
            assert_eq!(CallbackData::parse(bad), None, "accepted: {bad}");
        }
    }

    #[test]
    fn status_wire_format_is_compact() {
        let data = CallbackData::Status {
            action: StatusAction::Waiting,
            ticket_id: "ABC123".into(),
        };
        assert_eq!(data.encode(), "st:waiting:ABC123");
        assert!(data.encode().len() <= 64);
    }
}
