use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

pub const PLACEHOLDER: &str = "-";

const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationStatus {
    Lifetime,
    Expired,
    ActiveUntil(String),
}

impl fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirationStatus::Lifetime => f.write_str("Lifetime"),
            ExpirationStatus::Expired => f.write_str("EXPIRED"),
            ExpirationStatus::ActiveUntil(until) => f.write_str(until),
        }
    }
}

/// An expiration equal to `now` still counts as active.
pub fn classify_expiration(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ExpirationStatus {
    match expires_at {
        None => ExpirationStatus::Lifetime,
        Some(at) if now > at => ExpirationStatus::Expired,
        Some(at) => ExpirationStatus::ActiveUntil(format_instant(at)),
    }
}

pub fn format_optional_instant(at: Option<DateTime<Utc>>) -> String {
    at.map(format_instant)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_instant(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Parses operator-typed date/time text. A bare date is UTC midnight.
/// Naive date-times are read as local time; local times that do not exist
/// or are ambiguous yield `None`.
pub fn parse_local_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Some(at.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }

    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|at| at.with_timezone(&Utc))
}
