use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

// Older blobs stored `Date.now()` millis, newer ones ISO strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTimestamp::deserialize(deserializer)?;
    let parsed = match raw {
        RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
        RawTimestamp::FractionalMillis(ms) => Utc.timestamp_millis_opt(ms as i64).single(),
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("unrecognised timestamp"))
}
