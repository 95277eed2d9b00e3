//! HTML handling: the streaming tokenizer pass, auxiliary lookups, and
//! fusion into the rich snippet.

use std::sync::Arc;

use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;
use unfurl_snippet::{FuseOptions, Snippet, fuse};
use unfurl_streams::{media_type, tee};
use unfurl_tokenize::{MetadataBag, tokenize};
use url::Url;

use crate::aux::AuxResolver;
use crate::capability::{GraphExpander, Transport};
use crate::chain::{Extractor, Next};
use crate::envelope::ContentEnvelope;
use crate::error::{ErrorKind, Result};

/// Claims `text/html` and `application/xhtml+xml` outright. For responses
/// without a usable content type it instead forks the body: one handle
/// feeds the tokenizer as enrichment while the rest of the chain consumes
/// the other, and the enriched snippet is preferred only when the chain
/// produced nothing better than a bare link.
pub struct HtmlExtractor {
    aux: AuxResolver,
    options: FuseOptions,
}

impl HtmlExtractor {
    pub fn new(
        transport: Option<Arc<dyn Transport>>,
        expander: Option<Arc<dyn GraphExpander>>,
        options: FuseOptions,
    ) -> Self {
        Self { aux: AuxResolver { transport, expander }, options }
    }

    async fn fuse_bag(&self, mut bag: MetadataBag, url: &Url) -> Snippet {
        let aux = self.aux.resolve(&bag, url).await;
        if bag.icons.is_empty() {
            if let Some(icon) = self.aux.favicon(url).await {
                bag.icons.push(icon);
            }
        }
        fuse(&bag, &aux, url, &self.options)
    }
}

#[async_trait(?Send)]
impl Extractor for HtmlExtractor {
    #[instrument(skip_all, fields(url = %envelope.url, format = ?envelope.encoding_format))]
    async fn extract(&self, envelope: ContentEnvelope, next: Next<'_>) -> Result<Snippet> {
        match envelope.encoding_format.as_deref() {
            Some(essence) if media_type::is_html(essence) => {
                // Sole consumer of a declared HTML body: a tokenizer
                // failure here ends the whole scrape.
                let ContentEnvelope { url, body, .. } = envelope;
                let bag = tokenize(body, &url).await.or_raise(|| ErrorKind::Tokenize)?;
                Ok(self.fuse_bag(bag, &url).await)
            },
            Some(_) => next.dispatch(envelope).await,
            None => {
                let ContentEnvelope { url, http_status, headers, encoding_format, body } = envelope;
                let (ours, theirs) = tee(body);
                let passed = ContentEnvelope {
                    url: url.clone(),
                    http_status,
                    headers,
                    encoding_format,
                    body: Box::new(theirs),
                };
                let (harvested, baseline) = futures::join!(tokenize(ours, &url), next.dispatch(passed));
                let baseline = baseline?;
                match harvested {
                    Ok(bag) if !bag.is_empty() && matches!(baseline, Snippet::Link(_)) => {
                        Ok(self.fuse_bag(bag, &url).await)
                    },
                    Ok(_) => Ok(baseline),
                    Err(error) => {
                        tracing::debug!(%error, "enrichment tokenization failed");
                        Ok(baseline)
                    },
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures::io::AsyncRead;

    use crate::chain::compose;
    use crate::envelope::Headers;

    /// Yields its queued chunks, then fails the read.
    struct DroppedConnection {
        chunks: VecDeque<Vec<u8>>,
    }

    impl AsyncRead for DroppedConnection {
        fn poll_read(mut self: Pin<&mut Self>, _: &mut Context<'_>, dest: &mut [u8]) -> Poll<io::Result<usize>> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    dest[..chunk.len()].copy_from_slice(&chunk);
                    Poll::Ready(Ok(chunk.len()))
                },
                None => Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))),
            }
        }
    }

    fn failing_envelope(content_type: Option<&str>, prefix: &[u8]) -> ContentEnvelope {
        let mut headers = Headers::new();
        if let Some(value) = content_type {
            headers.insert("content-type", value);
        }
        let body = DroppedConnection { chunks: VecDeque::from(vec![prefix.to_vec()]) };
        ContentEnvelope::new(Url::parse("https://example.com/page").unwrap(), 200, headers, Box::new(body))
    }

    fn chain() -> crate::chain::Chain {
        compose(vec![Arc::new(HtmlExtractor::new(None, None, FuseOptions::default())) as Arc<dyn Extractor>])
    }

    #[tokio::test]
    async fn sole_html_branch_surfaces_a_mid_body_failure() {
        let error = chain().run(failing_envelope(Some("text/html"), b"<html><head>")).await.unwrap_err();
        assert_eq!(*error, ErrorKind::Tokenize);
    }

    #[tokio::test]
    async fn enrichment_branch_failure_keeps_the_baseline_link() {
        let envelope =
            failing_envelope(None, b"<html><head><meta property=\"og:title\" content=\"Lost\"></head>");
        let snippet = chain().run(envelope).await.unwrap();
        assert_eq!(snippet, Snippet::link("https://example.com/page"));
    }
}
