// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: weekday names, interval formats, timezone offsets, URLs.

use crate::diagnostic::ConfigError;
use crate::model::OmbudConfig;

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &OmbudConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.owner_id < 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.owner_id must be a positive user id, got {}",
                config.bot.owner_id
            ),
        });
    }

    if config.storage.data_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_path must not be empty".to_string(),
        });
    }

    if parse_utc_offset(&config.hours.timezone).is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "hours.timezone `{}` is not a valid UTC offset (expected e.g. \"+03:00\")",
                config.hours.timezone
            ),
        });
    }

    for (day, intervals) in &config.hours.weekly {
        if !WEEKDAYS.contains(&day.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "hours.weekly key `{day}` is not a weekday (expected one of {})",
                    WEEKDAYS.join(", ")
                ),
            });
        }
        for [start, end] in intervals {
            match (parse_hhmm(start), parse_hhmm(end)) {
                (Some(s), Some(e)) if s <= e => {}
                (Some(_), Some(_)) => errors.push(ConfigError::Validation {
                    message: format!(
                        "hours.weekly.{day} interval [{start}, {end}] ends before it starts"
                    ),
                }),
                _ => errors.push(ConfigError::Validation {
                    message: format!(
                        "hours.weekly.{day} interval [{start}, {end}] is not HH:MM format"
                    ),
                }),
            }
        }
    }

    if let Some(ref url) = config.audit.webhook_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("audit.webhook_url `{url}` must be an http(s) URL"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Parse a `±HH:MM` UTC offset into signed seconds east of UTC.
pub fn parse_utc_offset(s: &str) -> Option<i32> {
    let (sign, rest) = match s.chars().next()? {
        '+' => (1, &s[1..]),
        '-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hh, mm) = rest.split_once(':')?;
    let hours: i32 = hh.parse().ok()?;
    let minutes: i32 = mm.parse().ok()?;
    if hh.len() != 2 || mm.len() != 2 || hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Parse an `HH:MM` wall-clock time into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (hh, mm) = s.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    let hours: u32 = hh.parse().ok()?;
    let minutes: u32 = mm.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}
