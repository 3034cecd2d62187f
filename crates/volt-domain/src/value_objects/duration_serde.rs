//! Serde helpers for human-readable durations
//!
//! Durations are written as humantime strings (`"30s"`, `"100ms"`, `"5m"`)
//! and read back from the same format. Use with
//! `#[serde(with = "volt_domain::value_objects::duration_serde")]`.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serialize a Duration as a humantime string
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

/// Deserialize a Duration from a humantime string
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}
