//! The extraction pipeline: fetch a URL through the injected transport,
//! dispatch the response down the plugin chain by content type, run the
//! streaming HTML pass plus auxiliary lookups where they apply, and return
//! one fused [`Snippet`].
//!
//! The chain contract lives in [`chain`]; the built-in plugins in
//! [`extract`]; the collaborator traits (transport, binary metadata,
//! linked-data expansion) in [`capability`]. [`Scraper`] wires the default
//! arrangement together.

mod aux;
pub mod capability;
pub mod chain;
pub mod envelope;
pub mod error;
pub mod extract;

use std::sync::Arc;

use tracing::instrument;
use unfurl_snippet::{FuseOptions, Snippet};
use url::Url;

pub use crate::capability::{AbortHandle, BinaryMetadata, BodyStream, FetchedResource, GraphExpander, Transport};
pub use crate::chain::{Chain, Extractor, Next, compose};
pub use crate::envelope::{ContentEnvelope, Headers};
use crate::error::{ErrorKind, Result};
use crate::extract::{DocumentExtractor, HtmlExtractor, MediaExtractor};

/// Accept header sent with the primary fetch.
const ACCEPT: &str = "text/html, application/xhtml+xml, */*;q=0.8";

/// The default pipeline arrangement: HTML, then media, then PDF, then the
/// bare-link fallback.
pub struct Scraper {
    transport: Arc<dyn Transport>,
    binary: Option<Arc<dyn BinaryMetadata>>,
    expander: Option<Arc<dyn GraphExpander>>,
    options: FuseOptions,
}

impl Scraper {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, binary: None, expander: None, options: FuseOptions::default() }
    }

    /// Wires in binary (EXIF/PDF) metadata extraction. Without it, media
    /// responses yield type-only snippets.
    pub fn with_binary_metadata(mut self, capability: Arc<dyn BinaryMetadata>) -> Self {
        self.binary = Some(capability);
        self
    }

    /// Wires in JSON-LD graph expansion for pages carrying linked data.
    pub fn with_graph_expander(mut self, capability: Arc<dyn GraphExpander>) -> Self {
        self.expander = Some(capability);
        self
    }

    pub fn with_fuse_options(mut self, options: FuseOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches `url` and runs the chain over the response.
    ///
    /// Non-2xx answers fail with [`ErrorKind::HttpStatus`]; no snippet is
    /// fabricated for them. Whatever the outcome, the transport's abort
    /// handle is invoked before returning so the connection is released.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn scrape(&self, url: &Url) -> Result<Snippet> {
        let resource = self.transport.fetch(url, Some(ACCEPT)).await?;
        let status = resource.status;
        let (envelope, abort) = ContentEnvelope::from_resource(resource);
        if !(200..300).contains(&status) {
            abort.invoke();
            exn::bail!(ErrorKind::HttpStatus(status));
        }

        let chain = compose(vec![
            Arc::new(HtmlExtractor::new(
                Some(Arc::clone(&self.transport)),
                self.expander.clone(),
                self.options.clone(),
            )) as Arc<dyn Extractor>,
            Arc::new(MediaExtractor::new(self.binary.clone())),
            Arc::new(DocumentExtractor::new(self.binary.clone())),
        ]);
        let result = chain.run(envelope).await;
        abort.invoke();
        result
    }
}
