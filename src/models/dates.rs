//! Lenient date parsing
//!
//! Dates reach the ledger as free-form text from forms, files and the remote
//! store. Anything that does not parse yields `None` and callers keep their
//! previous value (or fall back to "now").
//!
//! Accepted inputs, in order:
//! - RFC 3339 with an explicit offset (`2024-01-05T10:00:00Z`)
//! - RFC 2822 (`Fri, 05 Jan 2024 10:00:00 +0000`)
//! - a local date-time without offset (`2024-01-05T10:00[:00]`, `2024-01-05 10:00:00`)
//! - a bare local date (`2024-01-05`), taken as local midnight

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date-like string into a UTC instant
pub fn parse_date_like(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(local_to_utc(naive));
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(local_to_utc);
        }
    }

    None
}

/// Interpret a wall-clock time in the local timezone
///
/// Times that fall in a DST gap do not exist locally; they are read as UTC.
fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// Convert epoch milliseconds to an instant
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Format an instant as a human-readable local date-time
pub fn format_local(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_date_like("2024-01-05T10:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_with_fraction() {
        let dt = parse_date_like("2025-11-07T08:00:00.000Z").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 0);
        assert_eq!(dt.day(), 7);
    }

    #[test]
    fn test_parse_bare_date_is_local_midnight() {
        let dt = parse_date_like("2024-01-05").unwrap();
        let local = dt.with_timezone(&Local);
        assert_eq!(local.year(), 2024);
        assert_eq!(local.month(), 1);
        assert_eq!(local.day(), 5);
        assert_eq!(local.hour(), 0);
    }

    #[test]
    fn test_parse_naive_date_time() {
        let dt = parse_date_like("2024-03-02 14:15").unwrap();
        let local = dt.with_timezone(&Local);
        assert_eq!(local.day(), 2);
        assert_eq!(local.hour(), 14);
    }

    #[test]
    fn test_unparseable_inputs() {
        assert!(parse_date_like("").is_none());
        assert!(parse_date_like("   ").is_none());
        assert!(parse_date_like("not a date").is_none());
        assert!(parse_date_like("2024-13-45").is_none());
    }

    #[test]
    fn test_epoch_millis() {
        let dt = from_epoch_millis(0).unwrap();
        assert_eq!(dt.year(), 1970);
        assert_eq!(dt.timestamp_millis(), 0);
    }
}
