//! Date/time parsing for date-typed fields and the `oldest-date` filter.
//!
//! Source metadata carries dates in wildly mixed precision; parsing tries
//! RFC 3339 first, then calendar date, then bare year. Everything normalizes
//! to UTC so comparisons are by instant, not by lexical form.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a source date string into a UTC instant.
///
/// Accepted forms, tried in order:
/// 1. RFC 3339 (`2019-07-16T09:30:00Z`, offset forms included)
/// 2. Calendar date (`2019-07-16`), taken as midnight UTC
/// 3. Bare year (`2019`), taken as January 1st midnight UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    if let Ok(year) = value.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1)?
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc());
    }

    None
}

/// Normalize a source date string to RFC 3339, if it parses at all.
pub fn normalize(value: &str) -> Option<String> {
    parse_timestamp(value).map(|dt| dt.to_rfc3339())
}
