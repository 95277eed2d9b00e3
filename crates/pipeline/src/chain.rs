//! Extractor chain composition and the at-most-once continuation contract.
//!
//! `compose` folds an ordered list of plugins into a [`Chain`]. Each plugin
//! either claims the envelope and returns a snippet (after draining or
//! destroying the body), or hands the envelope to its [`Next`] continuation
//! exactly once. The chain is itself an [`Extractor`], so chains nest.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use unfurl_snippet::Snippet;

use crate::envelope::ContentEnvelope;
use crate::error::{ErrorKind, Result};

/// One content-type plugin.
///
/// Extraction runs on the single-threaded cooperative model, so plugin
/// futures are not required to be `Send` and may hold tokenizer state
/// across awaits.
#[async_trait(?Send)]
pub trait Extractor: Send + Sync {
    async fn extract(&self, envelope: ContentEnvelope, next: Next<'_>) -> Result<Snippet>;
}

/// The continuation handed to a non-claiming plugin.
///
/// Dispatching moves the envelope to the remaining plugins and, past the
/// end of the list, to the enclosing chain or the bare-link fallback. A
/// second dispatch through the same continuation raises
/// [`ErrorKind::DoubleDispatch`].
pub struct Next<'a> {
    rest: &'a [Arc<dyn Extractor>],
    outer: Option<&'a Next<'a>>,
    dispatched: &'a AtomicBool,
}

impl Next<'_> {
    pub fn dispatch(&self, envelope: ContentEnvelope) -> LocalBoxFuture<'_, Result<Snippet>> {
        async move {
            if self.dispatched.swap(true, Ordering::SeqCst) {
                exn::bail!(ErrorKind::DoubleDispatch);
            }
            match self.rest.split_first() {
                Some((head, rest)) => {
                    let guard = AtomicBool::new(false);
                    let next = Next { rest, outer: self.outer, dispatched: &guard };
                    head.extract(envelope, next).await
                },
                None => match self.outer {
                    Some(outer) => outer.dispatch(envelope).await,
                    None => fallback(envelope).await,
                },
            }
        }
        .boxed_local()
    }
}

/// Composes plugins, first one outermost.
pub fn compose(extractors: Vec<Arc<dyn Extractor>>) -> Chain {
    Chain { extractors }
}

pub struct Chain {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl Chain {
    /// Runs the chain to completion. Content no plugin claims falls through
    /// to the fallback, which discards the body and answers with a bare
    /// link snippet.
    pub async fn run(&self, envelope: ContentEnvelope) -> Result<Snippet> {
        let guard = AtomicBool::new(false);
        Next { rest: &self.extractors, outer: None, dispatched: &guard }.dispatch(envelope).await
    }
}

#[async_trait(?Send)]
impl Extractor for Chain {
    async fn extract(&self, envelope: ContentEnvelope, next: Next<'_>) -> Result<Snippet> {
        let guard = AtomicBool::new(false);
        let inner = Next { rest: &self.extractors, outer: Some(&next), dispatched: &guard };
        inner.dispatch(envelope).await
    }
}

/// Innermost fallback: nobody wanted the content, so discard the bytes and
/// keep only the URL. A failure while discarding is not worth surfacing.
async fn fallback(envelope: ContentEnvelope) -> Result<Snippet> {
    let ContentEnvelope { url, mut body, .. } = envelope;
    if let Err(error) = unfurl_streams::drain(&mut body).await {
        tracing::debug!(url = %url, %error, "discarding unclaimed body failed");
    }
    Ok(Snippet::link(url))
}
