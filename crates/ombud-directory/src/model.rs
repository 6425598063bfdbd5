// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated data-transfer types for directory documents.
//!
//! External JSON is loosely shaped; each entry is deserialized into a typed
//! record with explicit defaulting, and entries that fail validation are
//! dropped with a logged warning rather than failing the whole load.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A staff member permitted to receive routed submissions and operate the
/// status control. Only the `active` flag is ever mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl StaffMember {
    /// One line for the `/staff` admin listing.
    pub fn describe(&self) -> String {
        let mut line = format!("- {}", self.user_id);
        if let Some(ref username) = self.username {
            line.push_str(&format!(" @{username}"));
        }
        if let Some(ref name) = self.name {
            line.push(' ');
            line.push_str(name);
        }
        if !self.active {
            line.push_str(" (inactive)");
        }
        line
    }
}

/// A group chat destination for routed submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTarget {
    pub chat_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// An intake category. Static reference data, immutable during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

/// Compiled fallback categories, used when the store has none.
pub fn default_categories() -> Vec<Category> {
    [
        ("psy", "Psychological support"),
        ("legal", "Legal aid"),
        ("human", "Humanitarian aid"),
        ("other", "Other"),
    ]
    .into_iter()
    .map(|(key, label)| Category {
        key: key.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// User-facing wizard texts, overridable per field from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoTexts {
    pub greeting: String,
    pub menu: String,
    pub anonymity_prompt: String,
    pub category_prompt: String,
    pub message_prompt: String,
    pub start_over: String,
    pub help: String,
}

impl Default for InfoTexts {
    fn default() -> Self {
        Self {
            greeting: "Hello! I am the team's intake bot. \
                       I will pass your message on to the right people."
                .to_string(),
            menu: "What would you like to do?".to_string(),
            anonymity_prompt: "Would you like to stay anonymous? \
                               Staff will not see your name if you do."
                .to_string(),
            category_prompt: "What is your request about?".to_string(),
            message_prompt: "Please write your message now. \
                             You can also attach a photo or document."
                .to_string(),
            start_over: "Something went wrong with your request. \
                         Let's start over from the menu."
                .to_string(),
            help: "Press Start and I will guide you through a few questions, \
                   then pass your message to the team."
                .to_string(),
        }
    }
}

/// Parse the `staff` document: a map of user-id string to staff record.
///
/// Entries with a non-numeric key or an unparsable value are dropped with a
/// warning; valid siblings survive.
pub fn parse_staff(doc: &Value) -> Vec<StaffMember> {
    let Some(map) = doc.as_object() else {
        warn!("staff document is not an object, treating as empty");
        return Vec::new();
    };

    let mut staff = Vec::new();
    for (key, value) in map {
        let Ok(user_id) = key.parse::<i64>() else {
            warn!(key = %key, "dropping staff entry with non-numeric id");
            continue;
        };

        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            username: Option<String>,
            #[serde(default)]
            name: Option<String>,
            #[serde(default = "default_active")]
            active: bool,
        }

        match serde_json::from_value::<Record>(value.clone()) {
            Ok(record) => staff.push(StaffMember {
                user_id,
                username: record.username,
                name: record.name,
                active: record.active,
            }),
            Err(e) => {
                warn!(key = %key, error = %e, "dropping malformed staff entry");
            }
        }
    }
    staff.sort_by_key(|m| m.user_id);
    staff
}

/// Parse the `groups` document: a map of chat-id string to group record.
pub fn parse_groups(doc: &Value) -> Vec<GroupTarget> {
    let Some(map) = doc.as_object() else {
        warn!("groups document is not an object, treating as empty");
        return Vec::new();
    };

    let mut groups = Vec::new();
    for (key, value) in map {
        let Ok(chat_id) = key.parse::<i64>() else {
            warn!(key = %key, "dropping group entry with non-numeric chat id");
            continue;
        };

        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            name: Option<String>,
            #[serde(default = "default_active")]
            active: bool,
        }

        match serde_json::from_value::<Record>(value.clone()) {
            Ok(record) => groups.push(GroupTarget {
                chat_id,
                name: record.name,
                active: record.active,
            }),
            Err(e) => {
                warn!(key = %key, error = %e, "dropping malformed group entry");
            }
        }
    }
    groups.sort_by_key(|g| g.chat_id);
    groups
}

/// Parse the `categories` document: an ordered list of `{key, label}`.
///
/// Entries missing either field are dropped; an empty or missing document
/// falls back to the compiled defaults.
pub fn parse_categories(doc: Option<&Value>) -> Vec<Category> {
    let Some(Value::Array(items)) = doc else {
        return default_categories();
    };

    let mut categories = Vec::new();
    for item in items {
        match serde_json::from_value::<Category>(item.clone()) {
            Ok(cat) if !cat.key.is_empty() && !cat.label.is_empty() => categories.push(cat),
            Ok(_) => warn!("dropping category with empty key or label"),
            Err(e) => warn!(error = %e, "dropping malformed category entry"),
        }
    }

    if categories.is_empty() {
        default_categories()
    } else {
        categories
    }
}

/// Parse the `texts` document, overriding defaults field by field.
pub fn parse_texts(doc: Option<&Value>) -> InfoTexts {
    let mut texts = InfoTexts::default();
    let Some(Value::Object(map)) = doc else {
        return texts;
    };

    for (key, value) in map {
        let Some(text) = value.as_str() else {
            warn!(key = %key, "dropping non-string info text");
            continue;
        };
        match key.as_str() {
            "greeting" => texts.greeting = text.to_string(),
            "menu" => texts.menu = text.to_string(),
            "anonymity_prompt" => texts.anonymity_prompt = text.to_string(),
            "category_prompt" => texts.category_prompt = text.to_string(),
            "message_prompt" => texts.message_prompt = text.to_string(),
            "start_over" => texts.start_over = text.to_string(),
            "help" => texts.help = text.to_string(),
            other => warn!(key = %other, "ignoring unknown info text section"),
        }
    }
    texts
}
