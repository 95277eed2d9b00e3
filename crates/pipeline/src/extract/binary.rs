//! Media and document plugins: content types whose snippet comes from the
//! binary-metadata capability (or from the type alone when none is wired).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use unfurl_snippet::{BinaryKind, Snippet, project};

use crate::capability::BinaryMetadata;
use crate::chain::{Extractor, Next};
use crate::envelope::ContentEnvelope;
use crate::error::Result;

/// Claims `image/*`, `video/*`, and `audio/*` responses.
pub struct MediaExtractor {
    binary: Option<Arc<dyn BinaryMetadata>>,
}

impl MediaExtractor {
    pub fn new(binary: Option<Arc<dyn BinaryMetadata>>) -> Self {
        Self { binary }
    }
}

#[async_trait(?Send)]
impl Extractor for MediaExtractor {
    async fn extract(&self, envelope: ContentEnvelope, next: Next<'_>) -> Result<Snippet> {
        match envelope.encoding_format.as_deref().and_then(media_kind) {
            Some(kind) => project_binary(self.binary.as_ref(), kind, envelope).await,
            None => next.dispatch(envelope).await,
        }
    }
}

/// Claims `application/pdf` responses.
pub struct DocumentExtractor {
    binary: Option<Arc<dyn BinaryMetadata>>,
}

impl DocumentExtractor {
    pub fn new(binary: Option<Arc<dyn BinaryMetadata>>) -> Self {
        Self { binary }
    }
}

#[async_trait(?Send)]
impl Extractor for DocumentExtractor {
    async fn extract(&self, envelope: ContentEnvelope, next: Next<'_>) -> Result<Snippet> {
        if envelope.encoding_format.as_deref() == Some("application/pdf") {
            project_binary(self.binary.as_ref(), BinaryKind::Document, envelope).await
        } else {
            next.dispatch(envelope).await
        }
    }
}

fn media_kind(essence: &str) -> Option<BinaryKind> {
    match essence.split_once('/')?.0 {
        "image" => Some(BinaryKind::Image),
        "video" => Some(BinaryKind::Video),
        "audio" => Some(BinaryKind::Audio),
        _ => None,
    }
}


/// Streams the body into the capability and projects its tag map. Any
/// extraction failure degrades to the type-only snippet.
async fn project_binary(
    binary: Option<&Arc<dyn BinaryMetadata>>,
    kind: BinaryKind,
    envelope: ContentEnvelope,
) -> Result<Snippet> {
    let ContentEnvelope { url, mut body, .. } = envelope;
    let tags = match binary {
        Some(capability) => match capability.extract(body).await {
            Ok(tags) => tags,
            Err(error) => {
                tracing::debug!(url = %url, %error, "binary metadata extraction failed");
                BTreeMap::new()
            },
        },
        None => {
            let _ = unfurl_streams::drain(&mut body).await;
            BTreeMap::new()
        },
    };
    Ok(project(&tags, kind, &url))
}
