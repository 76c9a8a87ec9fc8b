//! Lenient timestamp (de)serialization.
//!
//! The backend emits ISO-8601 datetimes that may or may not carry an offset.
//! Values without one are read as UTC.

use jiff::{civil::DateTime, tz::TimeZone, Timestamp};

/// Parses an RFC 3339 timestamp, falling back to a naive datetime in UTC.
pub fn parse(value: &str) -> Result<Timestamp, jiff::Error> {
    match value.parse::<Timestamp>() {
        Ok(ts) => Ok(ts),
        Err(_) => value
            .parse::<DateTime>()?
            .to_zoned(TimeZone::UTC)
            .map(|zoned| zoned.timestamp()),
    }
}

/// `#[serde(with = "timestamp::option")]` for `Option<Timestamp>` fields.
pub mod option {
    use jiff::Timestamp;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse(&raw).map_err(D::Error::custom))
            .transpose()
    }
}
