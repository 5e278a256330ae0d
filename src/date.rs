//! Frontmatter date coercion and human-readable date formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, ParseResult, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Coerces a frontmatter date into a UTC timestamp. Accepts RFC 3339
/// timestamps (`2024-03-01T09:30:00+02:00`), naive timestamps which are
/// taken as UTC (`2024-03-01T09:30:00` or the YAML-style
/// `2024-03-01 09:30:00`), and bare dates which are taken as
/// UTC midnight (`2024-03-01`).
pub fn parse(s: &str) -> ParseResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Ok(date_time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"].iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Formats a date the way the site prints it, e.g. `October 19, 2026`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Deserializes a date string via [`parse`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", s, e)))
}

/// Deserializes an optional date string via [`parse`].
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) => parse(&s)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", s, e))),
    }
}
