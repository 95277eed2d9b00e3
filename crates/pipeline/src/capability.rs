//! External capabilities the pipeline collaborates with.
//!
//! The pipeline owns dispatch, stream lifecycle, and fusion; the actual
//! network transport, the linked-data expansion algorithm, and binary
//! (EXIF/PDF) metadata extraction are injected behind these traits so tests
//! and embedders can swap them freely.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::io::AsyncRead;
use unfurl_tokenize::RdfaGraph;
use url::Url;

use crate::envelope::Headers;
use crate::error::Result;

/// An exclusively-owned response body. Boxed so transports of any flavor
/// plug in behind one type. The pipeline is single-threaded cooperative,
/// so the stream never has to cross threads.
pub type BodyStream = Box<dyn AsyncRead + Unpin>;

/// One fetched resource as the transport hands it over, abort handle
/// included.
pub struct FetchedResource {
    pub url: Url,
    pub status: u16,
    pub headers: Headers,
    pub body: BodyStream,
    pub abort: AbortHandle,
}

impl fmt::Debug for FetchedResource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FetchedResource")
            .field("url", &self.url.as_str())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Tells the transport that no further bytes are wanted.
///
/// Idempotent: invoking after completion, or after another clone already
/// invoked it, is a no-op, never an error.
#[derive(Clone)]
pub struct AbortHandle {
    inner: Arc<AbortInner>,
}

struct AbortInner {
    invoked: AtomicBool,
    action: Box<dyn Fn() + Send + Sync>,
}

impl AbortHandle {
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(AbortInner { invoked: AtomicBool::new(false), action: Box::new(action) }) }
    }

    /// For transports with nothing to release (fixtures, in-memory bodies).
    pub fn noop() -> Self {
        Self::new(|| ())
    }

    pub fn invoke(&self) {
        if !self.inner.invoked.swap(true, Ordering::SeqCst) {
            (self.inner.action)();
        }
    }
}

impl fmt::Debug for AbortHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AbortHandle")
            .field("invoked", &self.inner.invoked.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// The network fetch collaborator. Follows redirects itself; yields
/// lower-cased header names; performs no retries on the pipeline's behalf.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url, accept: Option<&str>) -> Result<FetchedResource>;
}

/// Binary (EXIF/PDF-style) metadata extraction over a piped byte stream,
/// typically a subprocess. Yields a flat tag map.
#[async_trait(?Send)]
pub trait BinaryMetadata: Send + Sync {
    async fn extract(&self, body: BodyStream) -> Result<BTreeMap<String, String>>;
}

/// Linked-data (JSON-LD) graph expansion. The standard algorithm lives
/// outside this core; remote context fetches go through whatever transport
/// the implementation was built with.
#[async_trait(?Send)]
pub trait GraphExpander: Send + Sync {
    async fn expand(&self, documents: &[serde_json::Value], base: &Url) -> Result<RdfaGraph>;
}
