//! Timestamp helpers.
//!
//! The web API formats dates as `2024-03-01T10:15:00+0100` (no colon in the
//! offset), which chrono's default RFC 3339 deserializer rejects.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::CoreError;

const SONAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a server timestamp, accepting both the API format and RFC 3339.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] when neither format matches.
pub fn parse(value: &str) -> Result<DateTime<Utc>, CoreError> {
    parse_with_offset(value).map(|date| date.with_timezone(&Utc))
}

/// Calendar day of a server timestamp in the server's own time zone.
///
/// Date filters such as `createdAfter` are read by the server in its time
/// zone, so they must be built from this day and not from the UTC one.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] when neither format matches.
pub fn server_day(value: &str) -> Result<NaiveDate, CoreError> {
    parse_with_offset(value).map(|date| date.date_naive())
}

fn parse_with_offset(value: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(value, SONAR_FORMAT))
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Whole days elapsed between `then` and `now`. A `then` in the future has
/// an age of 0.
#[must_use]
pub fn age_in_days(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_days().max(0)
}

/// Serde adapter for optional server timestamps.
///
/// Absent, `null` and empty values deserialize to `None`.
///
/// # Errors
///
/// Fails if a non-empty value cannot be parsed.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => parse(value).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_api_format() {
        let date = parse("2024-03-01T10:15:00+0100").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let date = parse("2024-03-01T10:15:00+00:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap());
    }

    #[test]
    fn rejects_unparseable() {
        assert!(matches!(parse("yesterday"), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn age_counts_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let then = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(age_in_days(now, then), 9);
    }

    #[test]
    fn future_timestamp_has_zero_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert_eq!(age_in_days(now, later), 0);
    }

    #[test]
    fn server_day_keeps_the_server_offset() {
        assert_eq!(
            server_day("2024-01-01T00:30:00+0100").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            server_day("2024-01-01T23:30:00-0500").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(server_day("soon").is_err());
    }

    #[test]
    fn optional_dates_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_opt")]
            at: Option<DateTime<Utc>>,
        }

        let missing: Holder = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());
        let empty: Holder = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(empty.at.is_none());
        let set: Holder = serde_json::from_str(r#"{"at": "2024-03-01T10:15:00+0000"}"#).unwrap();
        assert!(set.at.is_some());
    }
}
