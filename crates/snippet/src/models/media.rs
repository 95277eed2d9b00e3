use serde::Serialize;

/// One fused image candidate. URL-unique within its list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImageRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// One fused video/player candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlayerRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One fused audio candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AudioRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// The selected page icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub href: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

/// Page locale: primary plus declared alternates, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Locale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternate: Vec<String>,
}

impl Locale {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.alternate.is_empty()
    }
}

/// Twitter site/creator attribution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TwitterIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_handle: Option<String>,
}

impl TwitterIds {
    pub fn is_empty(&self) -> bool {
        self.site_id.is_none() && self.site_handle.is_none() && self.creator_id.is_none() && self.creator_handle.is_none()
    }
}
