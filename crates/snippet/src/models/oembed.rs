//! The oEmbed document fetched from a discovered endpoint.
//!
//! Tolerant deserialization: providers disagree on whether dimensions and
//! cache ages are numbers or strings, so numeric fields accept either.

use serde::{Deserialize, Deserializer};

/// oEmbed `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OEmbedKind {
    Photo,
    Video,
    Rich,
    #[default]
    Link,
    #[serde(other)]
    Unknown,
}

/// An oEmbed response document. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OEmbedDocument {
    #[serde(rename = "type")]
    pub kind: OEmbedKind,
    pub version: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub provider_name: Option<String>,
    pub provider_url: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub cache_age: Option<u64>,
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub thumbnail_width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub thumbnail_height: Option<u32>,
    pub url: Option<String>,
    pub html: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::Number(number) => number.as_u64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_u64(deserializer)?.and_then(|value| u32::try_from(value).ok()))
}
