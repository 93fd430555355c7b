//! RFC3339 timestamps as they appear in `<published>` elements.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid RFC3339 timestamp {value:?}: {reason}")]
pub struct TimestampError {
    pub value: String,
    pub reason: String,
}

/// A publish timestamp that keeps the offset it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let trimmed = value.trim();
        // chrono also accepts a space between date and time
        if let Some(&sep) = trimmed.as_bytes().get(10) {
            if sep != b'T' && sep != b't' {
                return Err(TimestampError {
                    value: value.to_string(),
                    reason: "expected 'T' between date and time".to_string(),
                });
            }
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(Timestamp)
            .map_err(|e| TimestampError {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// `0001-01-01T00:00:00Z`, used for posts without a `<published>` element.
    pub fn zero() -> Self {
        let naive = NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Timestamp(naive.and_utc().fixed_offset())
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Whole-second RFC3339 with `Z` for a zero offset.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Timestamp(value)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blogger_timestamp_with_millis() {
        let ts = Timestamp::parse("2007-04-17T15:09:01.730-07:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2007-04-17T15:09:01-07:00");
    }

    #[test]
    fn test_utc_formats_with_z() {
        let ts = Timestamp::parse("2020-01-02T03:04:05+00:00").unwrap();
        assert_eq!(ts.to_string(), "2020-01-02T03:04:05Z");
        let ts = Timestamp::parse("2020-01-02T03:04:05Z").unwrap();
        assert_eq!(ts.to_string(), "2020-01-02T03:04:05Z");
    }

    #[test]
    fn test_reject_non_rfc3339() {
        let err = Timestamp::parse("April 17, 2007").unwrap_err();
        assert_eq!(err.value, "April 17, 2007");
        assert!(err.to_string().contains("invalid RFC3339 timestamp"));

        assert!(Timestamp::parse("").is_err());
        assert!(Timestamp::parse("2007-04-17").is_err());
    }

    #[test]
    fn test_space_separator_rejected() {
        let err = Timestamp::parse("2020-01-01 00:00:00Z").unwrap_err();
        assert_eq!(err.value, "2020-01-01 00:00:00Z");
        assert!(err.reason.contains("'T'"));

        let ts = Timestamp::parse("2020-01-01t00:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_zero_timestamp() {
        assert_eq!(Timestamp::zero().to_string(), "0001-01-01T00:00:00Z");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let ts: Timestamp = "\n  2011-05-01T10:00:00.000+02:00\n".parse().unwrap();
        assert_eq!(ts.to_string(), "2011-05-01T10:00:00+02:00");
    }
}
