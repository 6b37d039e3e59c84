//! Calendar-date parsing and labels.
//!
//! Days are keyed by `NaiveDate`. Persisted records may carry a bare date or a
//! full timestamp; a timestamp is reduced to the calendar date in the local
//! zone, so equality is by year/month/day only.

use chrono::{Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer};

/// Parse a stored date.
///
/// Accepts:
/// - YYYY-MM-DD
/// - RFC3339 datetime (date in the local zone)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS, optionally with fractional seconds
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    parse_calendar_date_in(s, &chrono::Local)
}

/// Same as [`parse_calendar_date`], with RFC3339 timestamps read in `zone`.
pub fn parse_calendar_date_in<Tz: TimeZone>(s: &str, zone: &Tz) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(zone).date_naive());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.date());
    }
    None
}

/// Short chart label such as `Jan 5`.
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// The seven calendar days ending at `anchor`, oldest first.
pub fn week_ending(anchor: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| anchor - Duration::days(6 - i as i64))
}

pub(crate) fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| D::Error::custom(format!("expected a calendar date, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_accepts_date_only() {
        assert_eq!(parse_calendar_date("2025-12-15"), Some(d(2025, 12, 15)));
    }

    #[test]
    fn parse_reads_rfc3339_in_given_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        // Local midnight in Tokyo, as written by a UTC serializer.
        assert_eq!(
            parse_calendar_date_in("2026-03-01T15:00:00.000Z", &tokyo),
            Some(d(2026, 3, 2))
        );
        assert_eq!(
            parse_calendar_date_in("2026-03-01T15:00:00.000Z", &Utc),
            Some(d(2026, 3, 1))
        );
        assert_eq!(
            parse_calendar_date_in("2025-12-15T23:30:00-05:00", &new_york),
            Some(d(2025, 12, 15))
        );
        assert_eq!(
            parse_calendar_date_in("2025-12-15T23:30:00-05:00", &tokyo),
            Some(d(2025, 12, 16))
        );
    }

    #[test]
    fn parse_date_only_ignores_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(parse_calendar_date_in("2026-03-02", &tokyo), Some(d(2026, 3, 2)));
        assert_eq!(
            parse_calendar_date_in("2026-03-02T00:00:00", &tokyo),
            Some(d(2026, 3, 2))
        );
    }

    #[test]
    fn parse_accepts_naive_datetime() {
        assert_eq!(parse_calendar_date("2025-12-15T10:30:00"), Some(d(2025, 12, 15)));
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!(parse_calendar_date("not-a-date").is_none());
        assert!(parse_calendar_date("").is_none());
    }

    #[test]
    fn short_label_has_no_padding() {
        assert_eq!(short_label(d(2026, 1, 5)), "Jan 5");
        assert_eq!(short_label(d(2026, 10, 17)), "Oct 17");
    }

    #[test]
    fn week_ending_spans_month_boundary() {
        let week = week_ending(d(2026, 3, 3));
        assert_eq!(week[0], d(2026, 2, 25));
        assert_eq!(week[6], d(2026, 3, 3));
    }
}
