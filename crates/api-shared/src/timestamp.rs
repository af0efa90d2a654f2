//! Lenient timestamp deserialisation for request bodies.
//!
//! Browsers send dates either as ISO 8601 strings (`JSON.stringify(new Date())`) or as epoch
//! milliseconds (`Date.now()`). Both forms, and numeric strings, are accepted.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

fn to_datetime(raw: RawTimestamp) -> Result<DateTime<Utc>, String> {
    match raw {
        RawTimestamp::Millis(ms) => millis(ms),
        RawTimestamp::Text(text) => {
            let text = text.trim();
            if let Ok(ms) = text.parse::<i64>() {
                return millis(ms);
            }
            DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid timestamp '{text}': {e}"))
        }
    }
}

fn millis(ms: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| format!("timestamp out of range: {ms}"))
}

/// Deserialises an optional timestamp; `null` becomes `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTimestamp> = Option::deserialize(deserializer)?;
    raw.map(to_datetime).transpose().map_err(de::Error::custom)
}

/// Deserialises a timestamp whose presence matters.
///
/// Use together with `#[serde(default)]`: an absent key stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(_))`.
pub fn deserialize_present<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option(deserializer).map(Some)
}
