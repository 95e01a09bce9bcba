//! Canonicalizes caller-supplied date/time input into UTC instants.
//!
//! Two conventions, both anchored on calendar dates:
//! - a status check for a bare date means "as of the default check time
//!   that afternoon", not literal midnight;
//! - a stay endpoint for a bare date means midnight UTC of that date.
//!
//! Date-times that carry a clock time but no UTC offset are rejected rather
//! than interpreted against some guessed zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Hour of day (UTC) a date-only status check is evaluated at. Shared by the
/// single-room and list-room query paths.
pub const DEFAULT_CHECK_HOUR: u32 = 16;

fn default_check_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_CHECK_HOUR, 0, 0).expect("valid check time")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Carries a clock time but no UTC offset; ambiguous, never guessed at.
    Naive(String),
    Unparsable(String),
}

impl std::fmt::Display for TimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeError::Naive(raw) => {
                write!(f, "timestamp '{raw}' has no UTC offset; use RFC 3339 or a bare date")
            }
            TimeError::Unparsable(raw) => write!(f, "unparsable timestamp '{raw}'"),
        }
    }
}

impl std::error::Error for TimeError {}

/// Resolve the instant a status query is evaluated at.
///
/// Missing input means "right now". A bare `YYYY-MM-DD` gets the default
/// check time appended; a full timestamp must carry its offset and is used
/// as-is after conversion to UTC.
pub fn resolve_check_instant(
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TimeError> {
    match raw {
        None => Ok(now),
        Some(s) => {
            let s = s.trim();
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(date.and_time(default_check_time()).and_utc());
            }
            parse_zoned(s)
        }
    }
}

/// Parse a reservation start/end input. A bare date is midnight UTC of that
/// date; anything else must carry its offset.
pub fn parse_stay_instant(raw: &str) -> Result<DateTime<Utc>, TimeError> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    parse_zoned(s)
}

fn parse_zoned(s: &str) -> Result<DateTime<Utc>, TimeError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => {
            // Distinguish a missing offset from garbage so the caller can say which.
            const NAIVE_FORMATS: [&str; 3] =
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];
            for fmt in NAIVE_FORMATS {
                if NaiveDateTime::parse_from_str(s, fmt).is_ok() {
                    return Err(TimeError::Naive(s.to_string()));
                }
            }
            Err(TimeError::Unparsable(s.to_string()))
        }
    }
}

/// Wall-clock collaborator, injected so tests can pin "now".
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> DateTime<Utc> {
        s.parse().expect("test timestamp")
    }

    #[test]
    fn missing_input_is_now() {
        let now = dt("2025-04-26T09:30:00Z");
        assert_eq!(resolve_check_instant(None, now).unwrap(), now);
    }

    #[test]
    fn date_only_gets_default_check_time() {
        let now = dt("2025-01-01T00:00:00Z");
        let resolved = resolve_check_instant(Some("2025-04-26"), now).unwrap();
        assert_eq!(resolved, dt("2025-04-26T16:00:00Z"));
        // Equivalent to passing the default time explicitly.
        let explicit = resolve_check_instant(Some("2025-04-26T16:00:00Z"), now).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn explicit_time_used_as_is() {
        let now = dt("2025-01-01T00:00:00Z");
        let resolved = resolve_check_instant(Some("2025-04-26T09:15:00Z"), now).unwrap();
        assert_eq!(resolved, dt("2025-04-26T09:15:00Z"));
        // Explicit midnight stays midnight; only bare dates get the default.
        let midnight = resolve_check_instant(Some("2025-04-26T00:00:00Z"), now).unwrap();
        assert_eq!(midnight, dt("2025-04-26T00:00:00Z"));
    }

    #[test]
    fn offset_input_converts_to_utc() {
        let now = dt("2025-01-01T00:00:00Z");
        let resolved = resolve_check_instant(Some("2025-04-26T12:00:00+03:00"), now).unwrap();
        assert_eq!(resolved, dt("2025-04-26T09:00:00Z"));
    }

    #[test]
    fn naive_datetime_rejected() {
        let now = dt("2025-01-01T00:00:00Z");
        let err = resolve_check_instant(Some("2025-04-26T12:00:00"), now).unwrap_err();
        assert!(matches!(err, TimeError::Naive(_)));
        let err = parse_stay_instant("2025-04-26 12:00:00").unwrap_err();
        assert!(matches!(err, TimeError::Naive(_)));
    }

    #[test]
    fn garbage_rejected() {
        let now = dt("2025-01-01T00:00:00Z");
        let err = resolve_check_instant(Some("next tuesday"), now).unwrap_err();
        assert!(matches!(err, TimeError::Unparsable(_)));
    }

    #[test]
    fn stay_date_is_midnight_utc() {
        assert_eq!(
            parse_stay_instant("2025-06-01").unwrap(),
            dt("2025-06-01T00:00:00Z")
        );
        assert_eq!(
            parse_stay_instant("2025-06-01T14:00:00+02:00").unwrap(),
            dt("2025-06-01T12:00:00Z")
        );
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        let now = dt("2025-01-01T00:00:00Z");
        let resolved = resolve_check_instant(Some("  2025-04-26 "), now).unwrap();
        assert_eq!(resolved, dt("2025-04-26T16:00:00Z"));
    }
}
