use serde::Serialize;

/// One platform's app deep link. All three fields are mandatory together;
/// a partial triple is never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl AppEntry {
    /// Builds an entry only when every field is present and non-empty.
    pub fn complete(id: Option<&str>, name: Option<&str>, url: Option<&str>) -> Option<Self> {
        match (id, name, url) {
            (Some(id), Some(name), Some(url)) if !id.is_empty() && !name.is_empty() && !url.is_empty() => {
                Some(Self { id: id.to_string(), name: name.to_string(), url: url.to_string() })
            },
            _ => None,
        }
    }
}

/// Per-platform app deep links. A platform without a complete triple is
/// simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Apps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iphone: Option<AppEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipad: Option<AppEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AppEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<AppEntry>,
    #[serde(rename = "windowsPhone", skip_serializing_if = "Option::is_none")]
    pub windows_phone: Option<AppEntry>,
}

impl Apps {
    pub fn is_empty(&self) -> bool {
        self.iphone.is_none()
            && self.ipad.is_none()
            && self.android.is_none()
            && self.windows.is_none()
            && self.windows_phone.is_none()
    }
}
