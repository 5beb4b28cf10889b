//! Period keying: timestamps to coarse, chronologically ordered buckets.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use brandex_core::PeriodMode;

/// A coarse period identifier: `YYYY-Www` (ISO week) or `YYYY-MM`.
///
/// Keys are zero-padded, so within one period mode the derived `Ord` matches
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key a raw timestamp into its period bucket.
///
/// Returns `None` when the timestamp cannot be parsed; the caller drops the
/// record and counts the skip. Week keys use the ISO 8601 rule (the week
/// containing the year's first Thursday is week 1), so the key year can
/// differ from the calendar year near year boundaries.
#[must_use]
pub fn period_key(created_time: &str, mode: PeriodMode) -> Option<PeriodKey> {
    let date = parse_timestamp(created_time)?;
    let key = match mode {
        PeriodMode::Week => {
            let iso = date.iso_week();
            format!("{:04}-W{:02}", iso.year(), iso.week())
        }
        PeriodMode::Month => format!("{:04}-{:02}", date.year(), date.month()),
    };
    Some(PeriodKey(key))
}

/// Accepted timestamp layouts, tried in order: RFC 3339, `T`-separated and
/// space-separated date-times, bare dates. Offsets are folded into UTC
/// before bucketing.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Deduplicated, chronologically sorted copy of the given period keys.
///
/// The reusable ordering operation: aggregation windows and trend views both
/// need period lists in chronological order.
#[must_use]
pub fn sorted_periods<I>(keys: I) -> Vec<PeriodKey>
where
    I: IntoIterator<Item = PeriodKey>,
{
    let mut sorted: Vec<PeriodKey> = keys.into_iter().collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(ts: &str) -> Option<String> {
        period_key(ts, PeriodMode::Week).map(|k| k.as_str().to_string())
    }

    fn month(ts: &str) -> Option<String> {
        period_key(ts, PeriodMode::Month).map(|k| k.as_str().to_string())
    }

    #[test]
    fn week_key_mid_year() {
        assert_eq!(week("2024-03-04T10:00:00Z").as_deref(), Some("2024-W10"));
    }

    #[test]
    fn week_key_uses_iso_year_at_january_boundary() {
        // 2021-01-01 is a Friday in the last ISO week of 2020.
        assert_eq!(week("2021-01-01").as_deref(), Some("2020-W53"));
    }

    #[test]
    fn week_key_uses_iso_year_at_december_boundary() {
        // 2024-12-30 is a Monday in the first ISO week of 2025.
        assert_eq!(week("2024-12-30T08:30:00").as_deref(), Some("2025-W01"));
    }

    #[test]
    fn month_key_is_calendar_month() {
        assert_eq!(month("2024-12-30 08:30:00").as_deref(), Some("2024-12"));
    }

    #[test]
    fn rfc3339_offset_is_folded_into_utc() {
        // 23:30 at +06:00 is 17:30 UTC the same day.
        assert_eq!(month("2024-05-31T23:30:00+06:00").as_deref(), Some("2024-05"));
    }

    #[test]
    fn unparseable_timestamp_yields_none() {
        assert!(week("not a date").is_none());
        assert!(week("").is_none());
        assert!(week("31/05/2024").is_none());
    }

    #[test]
    fn keys_order_chronologically() {
        let a = period_key("2024-01-08", PeriodMode::Week).unwrap();
        let b = period_key("2024-03-04", PeriodMode::Week).unwrap();
        let c = period_key("2024-11-04", PeriodMode::Week).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn sorted_periods_dedups_and_orders() {
        let keys = ["2024-06-03", "2024-01-08", "2024-06-04", "2024-01-10"]
            .iter()
            .map(|ts| period_key(ts, PeriodMode::Week).unwrap());
        let sorted = sorted_periods(keys);
        let strs: Vec<&str> = sorted.iter().map(PeriodKey::as_str).collect();
        assert_eq!(strs, vec!["2024-W02", "2024-W23"]);
    }
}
