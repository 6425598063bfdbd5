// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ombud routing bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Ombud configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values; only
/// `bot.token` and `bot.owner_id` must be supplied before `serve` will start.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OmbudConfig {
    /// Bot identity and credential settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Runtime data store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Working-hours schedule used to pick the acknowledgment text.
    #[serde(default)]
    pub hours: HoursConfig,

    /// User-facing acknowledgment texts.
    #[serde(default)]
    pub messages: MessagesConfig,

    /// External audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Bot identity and credential configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Chat platform bot token. `None` is fatal at `serve` startup only.
    #[serde(default)]
    pub token: Option<String>,

    /// Numeric user id of the bot owner. Zero is fatal at `serve` startup.
    #[serde(default)]
    pub owner_id: i64,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            owner_id: 0,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Runtime data store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the JSON data document.
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ombud").join("ombud_data.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("ombud_data.json"))
        .to_string_lossy()
        .into_owned()
}

/// Working-hours schedule configuration.
///
/// `weekly` maps lowercase three-letter weekday names (`mon`..`sun`) to
/// lists of `["HH:MM", "HH:MM"]` intervals, inclusive on both bounds.
/// A weekday with no entry is always outside working hours.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HoursConfig {
    /// Fixed UTC offset the schedule is expressed in, e.g. `"+03:00"`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Per-weekday working intervals.
    #[serde(default)]
    pub weekly: BTreeMap<String, Vec<[String; 2]>>,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            weekly: BTreeMap::new(),
        }
    }
}

fn default_timezone() -> String {
    "+00:00".to_string()
}

/// User-facing acknowledgment texts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesConfig {
    /// Sent to the submitter when the current time is within working hours.
    #[serde(default = "default_ack_working")]
    pub ack_working: String,

    /// Sent to the submitter outside working hours.
    #[serde(default = "default_ack_after_hours")]
    pub ack_after_hours: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            ack_working: default_ack_working(),
            ack_after_hours: default_ack_after_hours(),
        }
    }
}

fn default_ack_working() -> String {
    "Thank you! Your message has been passed to the team.".to_string()
}

fn default_ack_after_hours() -> String {
    "Thank you! Your message has been passed to the team. \
     We are currently outside working hours and will reply as soon as we are back."
        .to_string()
}

/// External audit log configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Webhook URL that accepts one JSON row per event. `None` disables
    /// audit logging entirely.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Optional bearer token sent with every append.
    #[serde(default)]
    pub auth_token: Option<String>,
}
