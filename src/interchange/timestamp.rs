//! ISO-8601 timestamps, as local wall-clock times

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS`, with a fractional part only when needed
pub fn format(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parse a timestamp.
///
/// RFC 3339 timestamps (with an offset, such as the ones browsers export) are converted to local time.
/// Timestamps without offset are taken as local times already. A bare date means midnight.
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Used to support serde
pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(dt))
}

/// Used to support serde
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", text)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn naive_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse("2024-03-15T09:30:00"), Some(expected));
        assert_eq!(parse("2024-03-15T09:30"), Some(expected));
        assert_eq!(parse("2024-03-15 09:30"), Some(expected));
        assert_eq!(parse("2024-03-15"), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0));
        assert_eq!(parse("yesterday"), None);
    }

    #[test]
    fn offsets_are_converted_to_local_time() {
        let parsed = parse("2024-03-15T09:30:00.000Z").unwrap();
        let utc = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        assert_eq!(parsed, utc.with_timezone(&Local).naive_local());
    }

    #[test]
    fn fractional_seconds_survive() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_milli_opt(9, 30, 5, 250).unwrap();
        assert_eq!(format(&dt), "2024-03-15T09:30:05.250");
        assert_eq!(parse(&format(&dt)), Some(dt));

        let whole = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 30, 5).unwrap();
        assert_eq!(format(&whole), "2024-03-15T09:30:05");
    }
}
