//! Auxiliary lookups around the primary pass: the oEmbed document, the
//! expanded JSON-LD graph, and the favicon fallback probe.
//!
//! Everything here is best-effort. A failed or missing auxiliary source
//! omits its contribution and never fails the scrape.

use std::sync::Arc;

use unfurl_snippet::AuxData;
use unfurl_streams::media_type;
use unfurl_tokenize::{IconLink, MetadataBag};
use url::Url;

use crate::capability::{GraphExpander, Transport};

const OEMBED_MEDIA_TYPE: &str = "application/json+oembed";
const OEMBED_BODY_LIMIT: usize = 1024 * 1024;

/// Resolves auxiliary data for one scraped page.
pub(crate) struct AuxResolver {
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) expander: Option<Arc<dyn GraphExpander>>,
}

impl AuxResolver {
    pub(crate) async fn resolve(&self, bag: &MetadataBag, base: &Url) -> AuxData {
        AuxData { oembed: self.oembed(bag, base).await, graph: self.expand(bag, base).await }
    }

    /// Fetches the oEmbed document discovered through `rel=alternate`.
    async fn oembed(&self, bag: &MetadataBag, base: &Url) -> Option<unfurl_snippet::OEmbedDocument> {
        let transport = self.transport.as_ref()?;
        let alternate = bag
            .alternates
            .iter()
            .find(|link| link.media_type.as_deref().is_some_and(|name| name.eq_ignore_ascii_case(OEMBED_MEDIA_TYPE)))?;
        let endpoint = Url::parse(&alternate.href).or_else(|_| base.join(&alternate.href)).ok()?;
        match transport.fetch(&endpoint, Some("application/json")).await {
            Ok(resource) => {
                let abort = resource.abort.clone();
                let document = if (200..300).contains(&resource.status) {
                    unfurl_streams::read_json(resource.body, OEMBED_BODY_LIMIT).await.map_or_else(
                        |error| {
                            tracing::debug!(endpoint = %endpoint, %error, "oEmbed document unreadable");
                            None
                        },
                        Some,
                    )
                } else {
                    tracing::debug!(endpoint = %endpoint, status = resource.status, "oEmbed endpoint refused");
                    None
                };
                abort.invoke();
                document
            },
            Err(error) => {
                tracing::debug!(endpoint = %endpoint, %error, "oEmbed fetch failed");
                None
            },
        }
    }

    /// Hands the collected JSON-LD islands to the expansion capability.
    async fn expand(&self, bag: &MetadataBag, base: &Url) -> Option<unfurl_tokenize::RdfaGraph> {
        let expander = self.expander.as_ref()?;
        if bag.json_ld.is_empty() {
            return None;
        }
        match expander.expand(&bag.json_ld, base).await {
            Ok(graph) => Some(graph),
            Err(error) => {
                tracing::debug!(%error, "linked-data expansion failed");
                None
            },
        }
    }

    /// Probes `<origin>/favicon.ico` when the page declared no icons.
    pub(crate) async fn favicon(&self, base: &Url) -> Option<IconLink> {
        let transport = self.transport.as_ref()?;
        let probe = base.join("/favicon.ico").ok()?;
        match transport.fetch(&probe, None).await {
            Ok(mut resource) => {
                let reachable = (200..300).contains(&resource.status);
                // Discard the payload; only existence matters here.
                let _ = unfurl_streams::drain(&mut resource.body).await;
                resource.abort.invoke();
                reachable.then(|| IconLink {
                    href: probe.to_string(),
                    sizes: None,
                    media_type: resource.headers.first("content-type").and_then(media_type::essence),
                })
            },
            Err(error) => {
                tracing::debug!(probe = %probe, %error, "favicon probe failed");
                None
            },
        }
    }
}
