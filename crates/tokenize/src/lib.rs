//! Single streaming pass over an HTML body, collecting every metadata
//! dialect at once: flat dictionaries (Twitter Cards, Dublin Core, Sailthru,
//! App Links, a raw HTML allow-list), an RDFa triple graph with nested
//! vocabulary and prefix scoping, canonical/alternate/icon links, and
//! embedded JSON-LD payloads.
//!
//! Suspension happens only at stream-read boundaries; tokens are processed
//! synchronously between reads and nothing buffers the whole document.

pub mod bag;
pub mod error;
pub mod prefixes;
mod sink;

use exn::ResultExt;
use futures::io::{AsyncRead, AsyncReadExt};
use html5ever::tokenizer::{BufferQueue, Tokenizer, TokenizerOpts};
use tendril::StrTendril;
use tracing::instrument;
use unfurl_streams::Utf8Decoder;
use url::Url;

pub use crate::bag::{AlternateLink, FlatDialect, IconLink, MetadataBag, RdfaGraph, Values};
use crate::error::{ErrorKind, Result};
use crate::sink::MetaSink;

const CHUNK_SIZE: usize = 8 * 1024;

/// Tokenizes a streamed HTML body into a [`MetadataBag`].
///
/// Malformed markup degrades to partial data; the only failure is the body
/// stream itself dying, which rejects the whole pass. Bodies are decoded as
/// UTF-8 with U+FFFD replacement.
///
/// # Examples
///
/// ```rust
/// # futures::executor::block_on(async {
/// use futures::io::Cursor;
/// use url::Url;
///
/// let html = r#"<html><head><meta property="og:title" content="Hello"></head></html>"#;
/// let base = Url::parse("https://example.com/post").unwrap();
/// let bag = unfurl_tokenize::tokenize(Cursor::new(html.as_bytes()), &base).await.unwrap();
/// assert_eq!(bag.graph.root_first("http://ogp.me/ns#title"), Some("Hello"));
/// # });
/// ```
#[instrument(skip(body), fields(base = %base))]
pub async fn tokenize<R: AsyncRead + Unpin>(mut body: R, base: &Url) -> Result<MetadataBag> {
    let tokenizer = Tokenizer::new(MetaSink::new(base.clone()), TokenizerOpts::default());
    let input = BufferQueue::default();
    let mut decoder = Utf8Decoder::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = body.read(&mut chunk).await.or_raise(|| ErrorKind::Read)?;
        if n == 0 {
            break;
        }
        let text = decoder.push(&chunk[..n]);
        if !text.is_empty() {
            input.push_back(StrTendril::from_slice(&text));
            let _ = tokenizer.feed(&input);
        }
    }
    let tail = decoder.finish();
    if !tail.is_empty() {
        input.push_back(StrTendril::from_slice(&tail));
        let _ = tokenizer.feed(&input);
    }
    tokenizer.end();
    Ok(tokenizer.sink.into_bag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;

    const OG: &str = "http://ogp.me/ns#";

    fn base() -> Url {
        Url::parse("https://example.com/post/1").unwrap()
    }

    async fn bag_for(html: &str) -> MetadataBag {
        tokenize(Cursor::new(html.as_bytes().to_vec()), &base()).await.unwrap()
    }

    #[tokio::test]
    async fn collects_open_graph_through_the_graph() {
        let bag = bag_for(
            r#"<html><head>
                <meta property="og:title" content="Hello">
                <meta property="og:image" content="https://cdn.example.com/a.png">
                <meta property="og:image" content="https://cdn.example.com/b.png">
            </head></html>"#,
        )
        .await;
        assert_eq!(bag.graph.root_first(&format!("{OG}title")), Some("Hello"));
        let images = bag.graph.root_get(&format!("{OG}image")).unwrap();
        assert_eq!(
            images.iter().collect::<Vec<_>>(),
            vec!["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"]
        );
    }

    #[tokio::test]
    async fn classifies_flat_dialects() {
        let bag = bag_for(
            r#"<head>
                <meta name="twitter:card" content="summary">
                <meta property="twitter:title" content="Card Title">
                <meta property="al:ios:app_name" content="Example">
                <meta name="DC.Title" content="Dublin Title">
                <meta name="dc.creator" content="An Author">
                <meta name="sailthru.date" content="2020-01-01">
                <meta name="description" content="general description">
                <meta name="unrelated" content="skipped">
            </head>"#,
        )
        .await;
        assert_eq!(bag.twitter.first("card"), Some("summary"));
        assert_eq!(bag.twitter.first("title"), Some("Card Title"));
        assert_eq!(bag.app_links.first("ios:app_name"), Some("Example"));
        assert_eq!(bag.dublin_core.first("title"), Some("Dublin Title"));
        assert_eq!(bag.dublin_core.first("creator"), Some("An Author"));
        assert_eq!(bag.sailthru.first("date"), Some("2020-01-01"));
        assert_eq!(bag.general.first("description"), Some("general description"));
        assert_eq!(bag.general.first("unrelated"), None);
    }

    #[tokio::test]
    async fn canonical_alternates_and_icons() {
        let bag = bag_for(
            r#"<head>
                <link rel="canonical" href="https://example.com/canonical">
                <link rel="alternate" type="application/json+oembed" href="/oembed?url=x">
                <link rel="alternate" type="application/rss+xml" href="/feed.xml">
                <link rel="shortcut icon" href="/favicon.ico">
                <link rel="icon" href="/icon-48.png" sizes="48x48" type="image/png">
            </head>"#,
        )
        .await;
        assert_eq!(bag.canonical.as_deref(), Some("https://example.com/canonical"));
        assert_eq!(bag.alternates.len(), 2);
        assert_eq!(bag.alternates[0].media_type.as_deref(), Some("application/json+oembed"));
        assert_eq!(bag.alternates[0].href, "https://example.com/oembed?url=x");
        assert_eq!(bag.icons.len(), 2);
        assert_eq!(bag.icons[0].href, "https://example.com/favicon.ico");
        assert_eq!(bag.icons[1].sizes.as_deref(), Some("48x48"));
    }

    #[tokio::test]
    async fn title_and_language_fallbacks() {
        let bag = bag_for("<html lang=\"en-GB\"><head><title>Page &amp; Title</title></head></html>").await;
        assert_eq!(bag.general.first("title"), Some("Page & Title"));
        assert_eq!(bag.general.first("language"), Some("en-GB"));
    }

    #[tokio::test]
    async fn prefix_scoping_does_not_leak_to_siblings() {
        let bag = bag_for(
            r#"<body>
                <div prefix="ex: http://example.org/ns#">
                    <span property="ex:inside" content="in scope"></span>
                </div>
                <span property="ex:outside" content="dropped"></span>
            </body>"#,
        )
        .await;
        assert_eq!(bag.graph.root_first("http://example.org/ns#inside"), Some("in scope"));
        assert!(bag.graph.root_first("http://example.org/ns#outside").is_none());
    }

    #[tokio::test]
    async fn vocabulary_resolves_bare_terms() {
        let bag = bag_for(
            r#"<div vocab="http://schema.org/">
                <span property="name">A Name</span>
                <div vocab="">
                    <span property="orphan">dropped</span>
                </div>
            </div>"#,
        )
        .await;
        assert_eq!(bag.graph.root_first("http://schema.org/name"), Some("A Name"));
        assert!(bag.graph.root_first("orphan").is_none());
    }

    #[tokio::test]
    async fn resource_attribute_switches_subject() {
        let bag = bag_for(
            r#"<div resource="/things/42" vocab="http://schema.org/">
                <span property="name" content="Forty-Two"></span>
            </div>"#,
        )
        .await;
        assert_eq!(
            bag.graph.get("https://example.com/things/42", "http://schema.org/name").map(Values::first),
            Some("Forty-Two")
        );
    }

    #[tokio::test]
    async fn implicit_values_from_href_src_and_datetime() {
        let bag = bag_for(
            r#"<div vocab="http://schema.org/">
                <a property="url" href="/about">About</a>
                <img property="image" src="/img/photo.jpg">
                <time property="datePublished" datetime="2021-05-04T10:00:00Z">May the 4th</time>
            </div>"#,
        )
        .await;
        assert_eq!(bag.graph.root_first("http://schema.org/url"), Some("https://example.com/about"));
        assert_eq!(bag.graph.root_first("http://schema.org/image"), Some("https://example.com/img/photo.jpg"));
        assert_eq!(bag.graph.root_first("http://schema.org/datePublished"), Some("2021-05-04T10:00:00Z"));
    }

    #[tokio::test]
    async fn deferred_text_value_spans_inline_children() {
        let bag = bag_for(
            r#"<div vocab="http://schema.org/">
                <h1 property="headline">Big <em>bold</em> headline</h1>
            </div>"#,
        )
        .await;
        assert_eq!(bag.graph.root_first("http://schema.org/headline"), Some("Big bold headline"));
    }

    #[tokio::test]
    async fn json_ld_good_and_bad_payloads() {
        let bag = bag_for(
            r#"<head>
                <script type="application/ld+json">{"@type": "Article", "headline": "LD"}</script>
                <script type="application/ld+json">{not json at all</script>
                <script>var x = "<b>not metadata</b>";</script>
            </head>"#,
        )
        .await;
        assert_eq!(bag.json_ld.len(), 1);
        assert_eq!(bag.json_ld[0]["headline"], "LD");
    }

    #[tokio::test]
    async fn determinism_across_repeated_runs() {
        let html = r#"<html lang="en"><head>
            <title>T</title>
            <meta property="og:title" content="Hello">
            <meta name="twitter:card" content="summary">
            <link rel="icon" href="/i.png" sizes="16x16">
        </head></html>"#;
        let first = bag_for(html).await;
        let second = bag_for(html).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn read_failure_rejects_the_pass() {
        struct Failing;
        impl futures::io::AsyncRead for Failing {
            fn poll_read(
                self: std::pin::Pin<&mut Self>,
                _: &mut std::task::Context<'_>,
                _: &mut [u8],
            ) -> std::task::Poll<std::io::Result<usize>> {
                std::task::Poll::Ready(Err(std::io::Error::other("connection lost")))
            }
        }
        let error = tokenize(Failing, &base()).await.unwrap_err();
        assert_eq!(*error, ErrorKind::Read);
    }

    #[tokio::test]
    async fn chunk_boundaries_do_not_change_the_result() {
        // A document larger than one read chunk, with a multi-byte char
        // guaranteed to straddle a boundary eventually.
        let mut html = String::from("<html><head><meta property=\"og:title\" content=\"Caf\u{e9}\">");
        html.push_str(&"<meta name=\"unrelated\" content=\"pad\">".repeat(600));
        html.push_str("</head></html>");
        let bag = bag_for(&html).await;
        assert_eq!(bag.graph.root_first(&format!("{OG}title")), Some("Caf\u{e9}"));
    }
}
