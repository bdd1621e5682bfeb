use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use candlewick_core::OhlcvError;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a period boundary into a UTC instant.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS±HH:MM`, naive date-times (read as
/// UTC) and bare dates (midnight UTC). Offsets are honored.
///
/// # Errors
/// Returns `InvalidArg` when no accepted format matches.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, OhlcvError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| OhlcvError::InvalidArg(format!("unrecognized timestamp '{raw}'")))
}
