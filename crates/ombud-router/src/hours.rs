// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Working-hours predicate.
//!
//! Configuration supplies, per weekday, zero or more inclusive
//! `[start, end]` intervals in a fixed UTC-offset timezone. "Working time"
//! holds iff the current local time falls within at least one interval for
//! the current weekday; a weekday with no intervals is always non-working.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use ombud_config::model::HoursConfig;
use ombud_config::validation::{parse_hhmm, parse_utc_offset};
use ombud_core::OmbudError;

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Compiled working-hours schedule.
#[derive(Debug, Clone)]
pub struct WorkingHours {
    offset: FixedOffset,
    /// Minutes-since-midnight intervals, indexed Monday = 0.
    weekly: [Vec<(u32, u32)>; 7],
}

impl WorkingHours {
    /// Compile a schedule from configuration.
    ///
    /// The config is expected to have passed validation already; this
    /// re-checks anyway so a schedule can never be half-built.
    pub fn from_config(config: &HoursConfig) -> Result<Self, OmbudError> {
        let seconds = parse_utc_offset(&config.timezone).ok_or_else(|| {
            OmbudError::Config(format!("invalid hours.timezone `{}`", config.timezone))
        })?;
        let offset = FixedOffset::east_opt(seconds)
            .ok_or_else(|| OmbudError::Config("timezone offset out of range".to_string()))?;

        let mut weekly: [Vec<(u32, u32)>; 7] = Default::default();
        for (day, intervals) in &config.weekly {
            let index = WEEKDAYS
                .iter()
                .position(|d| d == day)
                .ok_or_else(|| OmbudError::Config(format!("unknown weekday `{day}`")))?;
            for [start, end] in intervals {
                let (start, end) = match (parse_hhmm(start), parse_hhmm(end)) {
                    (Some(s), Some(e)) if s <= e => (s, e),
                    _ => {
                        return Err(OmbudError::Config(format!(
                            "invalid interval [{start}, {end}] for `{day}`"
                        )));
                    }
                };
                weekly[index].push((start, end));
            }
        }

        Ok(Self { offset, weekly })
    }

    /// The schedule's timezone, for rendering local timestamps.
    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    /// Whether `now` falls inside a configured working interval.
    ///
    /// Bounds are inclusive at minute granularity: an 18:00 end still counts
    /// anywhere within the 18:00 minute.
    pub fn is_working(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.offset);
        let day = chrono::Datelike::weekday(&local).num_days_from_monday() as usize;
        let minute = local.hour() * 60 + local.minute();
        self.weekly[day]
            .iter()
            .any(|&(start, end)| minute >= start && minute <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn schedule(timezone: &str, weekly: &[(&str, &[(&str, &str)])]) -> WorkingHours {
        let mut map = BTreeMap::new();
        for (day, intervals) in weekly {
            map.insert(
                day.to_string(),
                intervals
                    .iter()
                    .map(|(s, e)| [s.to_string(), e.to_string()])
                    .collect(),
            );
        }
        WorkingHours::from_config(&HoursConfig {
            timezone: timezone.to_string(),
            weekly: map,
        })
        .expect("schedule should compile")
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("test timestamp")
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let hours = schedule("+00:00", &[("mon", &[("09:00", "18:00")])]);

        // 2026-08-03 is a Monday.
        assert!(hours.is_working(utc("2026-08-03T09:00:00Z")));
        assert!(hours.is_working(utc("2026-08-03T18:00:00Z")));
        assert!(!hours.is_working(utc("2026-08-03T08:59:00Z")));
        assert!(!hours.is_working(utc("2026-08-03T18:01:00Z")));
    }

    #[test]
    fn day_without_intervals_is_never_working() {
        let hours = schedule("+00:00", &[("mon", &[("09:00", "18:00")])]);
        // 2026-08-08 is a Saturday.
        assert!(!hours.is_working(utc("2026-08-08T12:00:00Z")));
    }

    #[test]
    fn offset_shifts_the_local_clock() {
        let hours = schedule("+03:00", &[("mon", &[("09:00", "18:00")])]);
        // 06:00 UTC on Monday is 09:00 local in +03:00.
        assert!(hours.is_working(utc("2026-08-03T06:00:00Z")));
        assert!(!hours.is_working(utc("2026-08-03T05:59:00Z")));
        // 15:00 UTC is 18:00 local, still inside; 15:01 is out.
        assert!(hours.is_working(utc("2026-08-03T15:00:00Z")));
        assert!(!hours.is_working(utc("2026-08-03T15:01:00Z")));
    }

    #[test]
    fn offset_can_shift_across_weekday_boundary() {
        // 23:00 UTC Sunday is 02:00 Monday local in +03:00.
        let hours = schedule("+03:00", &[("mon", &[("00:00", "23:59")])]);
        assert!(hours.is_working(utc("2026-08-02T23:00:00Z")));
    }

    #[test]
    fn multiple_intervals_per_day() {
        let hours = schedule(
            "+00:00",
            &[("tue", &[("09:00", "12:00"), ("14:00", "18:00")])],
        );
        // 2026-08-04 is a Tuesday.
        assert!(hours.is_working(utc("2026-08-04T10:00:00Z")));
        assert!(!hours.is_working(utc("2026-08-04T13:00:00Z")));
        assert!(hours.is_working(utc("2026-08-04T14:00:00Z")));
    }

    #[test]
    fn empty_schedule_is_always_off() {
        let hours = schedule("+00:00", &[]);
        assert!(!hours.is_working(utc("2026-08-03T12:00:00Z")));
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = HoursConfig {
            timezone: "Kyiv".to_string(),
            weekly: BTreeMap::new(),
        };
        assert!(WorkingHours::from_config(&config).is_err());
    }
}
