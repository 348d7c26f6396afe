//! Reporting windows and lenient date parsing for query strings.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dashboard range toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePreset {
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl RangePreset {
    pub fn days(&self) -> i64 {
        match self {
            Self::Last30Days => 30,
            Self::Last90Days => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
        }
    }

    /// Anything other than `"90d"` selects the 30 day window.
    pub fn lenient(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30d" => Ok(Self::Last30Days),
            "90d" => Ok(Self::Last90Days),
            other => Err(format!("Unknown range preset: {}", other)),
        }
    }
}

/// Half-open reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// UTC midnight of the day containing `at`.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&at.date_naive().and_time(chrono::NaiveTime::MIN))
}

/// Window for a preset, anchored on today's UTC midnight.
///
/// `to` is today's midnight and `from` lies `days - 1` days before it, so the
/// window covers exactly `days` calendar days including today.
pub fn range_for(preset: RangePreset, now: DateTime<Utc>) -> DateRange {
    let to = start_of_day(now);
    let from = to - Duration::days(preset.days() - 1);
    DateRange { from, to }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (UTC midnight).
///
/// Returns `None` for anything unparseable so callers can ignore bad filters.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(chrono::NaiveTime::MIN)))
}

/// Optional `from` / `to` pair as sent by the list pages.
pub fn parse_from_to(
    from: Option<&str>,
    to: Option<&str>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (from.and_then(parse_date), to.and_then(parse_date))
}

/// Whole days elapsed between two instants (floored).
pub fn days_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_seconds().div_euclid(86_400)
}

#[cfg(test)]
#[path = "date_range_tests.rs"]
mod date_range_tests;
