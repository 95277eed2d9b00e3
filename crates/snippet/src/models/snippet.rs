use serde::Serialize;
use time::OffsetDateTime;

use super::{Apps, AudioRecord, Entity, Icon, ImageRecord, Locale, PlayerRecord, TwitterIds};

/// The canonical, typed, fused metadata record returned for a URL.
///
/// A closed, tag-discriminated union. Instances are pure value objects
/// created once by the fusion engine (or the EXIF projection) per request
/// and never mutated afterwards. `Date`-typed fields serialize as ISO-8601.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Snippet {
    Html(Box<HtmlSnippet>),
    Image(MediaSnippet),
    Video(MediaSnippet),
    Audio(MediaSnippet),
    Document(MediaSnippet),
    Link(LinkSnippet),
}

impl Snippet {
    /// Minimal snippet carrying only the URL; what the innermost fallback
    /// extractor returns when no plugin claims the content.
    pub fn link(url: impl Into<String>) -> Self {
        Snippet::Link(LinkSnippet { url: url.into() })
    }

    pub fn url(&self) -> &str {
        match self {
            Snippet::Html(html) => &html.url,
            Snippet::Image(media) | Snippet::Video(media) | Snippet::Audio(media) | Snippet::Document(media) => {
                &media.url
            },
            Snippet::Link(link) => &link.url,
        }
    }
}

/// Bare fallback variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSnippet {
    pub url: String,
}

/// Snippet shape shared by image, video, audio, and document responses,
/// populated from binary (EXIF-style) metadata when available.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MediaSnippet {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none", default)]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none", default)]
    pub modified: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
}

/// The fused result for an HTML page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HtmlSnippet {
    /// Canonical URL (falls back to the request URL).
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none", default)]
    pub date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(rename = "image", skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRecord>,
    #[serde(rename = "video", skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<PlayerRecord>,
    #[serde(rename = "audio", skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<AudioRecord>,
    #[serde(skip_serializing_if = "Apps::is_empty")]
    pub apps: Apps,
    #[serde(skip_serializing_if = "Locale::is_empty")]
    pub locale: Locale,
    #[serde(skip_serializing_if = "TwitterIds::is_empty")]
    pub twitter: TwitterIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}
