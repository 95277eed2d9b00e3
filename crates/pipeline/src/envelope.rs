//! The per-fetch content envelope handed down the extractor chain.

use std::collections::BTreeMap;
use std::fmt;

use unfurl_streams::media_type;
use url::Url;

use crate::capability::{AbortHandle, BodyStream, FetchedResource};

/// Response headers as a lower-cased multimap. Repeated header lines
/// accumulate in arrival order; the first value is authoritative where a
/// single value is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.entry(name.to_ascii_lowercase()).or_default().push(value.into());
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_ascii_lowercase()).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn all(&self, name: &str) -> &[String] {
        self.entries.get(&name.to_ascii_lowercase()).map(Vec::as_slice).unwrap_or_default()
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// One fetched resource, normalized for dispatch and owned exclusively by
/// whichever extractor branch currently holds it.
pub struct ContentEnvelope {
    pub url: Url,
    pub http_status: u16,
    pub headers: Headers,
    /// MIME essence of the first `content-type` header: lower-cased,
    /// parameters stripped. `None` when the header is missing or mangled.
    pub encoding_format: Option<String>,
    pub body: BodyStream,
}

impl ContentEnvelope {
    pub fn new(url: Url, http_status: u16, headers: Headers, body: BodyStream) -> Self {
        let encoding_format = headers.first("content-type").and_then(media_type::essence);
        Self { url, http_status, headers, encoding_format, body }
    }

    /// Splits a transport resource into the envelope the chain consumes and
    /// the abort handle the coordinator keeps.
    pub fn from_resource(resource: FetchedResource) -> (Self, AbortHandle) {
        let FetchedResource { url, status, headers, body, abort } = resource;
        (Self::new(url, status, headers, body), abort)
    }

    /// Replaces the body, keeping every other field. Used when a branch
    /// forks the stream and sends one handle down the chain.
    pub fn with_body(self, body: BodyStream) -> Self {
        Self { body, ..self }
    }
}

impl fmt::Debug for ContentEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ContentEnvelope")
            .field("url", &self.url.as_str())
            .field("http_status", &self.http_status)
            .field("encoding_format", &self.encoding_format)
            .finish_non_exhaustive()
    }
}
