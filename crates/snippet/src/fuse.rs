//! The fusion engine: folds the harvested metadata bag, plus whatever
//! auxiliary documents the pipeline fetched, into one [`Snippet`].
//!
//! Every field is assembled by a fixed precedence chain over the sources;
//! fusion itself is pure and deterministic, so the same bag always yields
//! the same snippet.

use tracing::instrument;
use unfurl_tokenize::{MetadataBag, RdfaGraph};
use url::Url;

use crate::models::{HtmlSnippet, Locale, OEmbedDocument, Snippet, TwitterIds};
use crate::{apps, dates, entity, icon, media, vocab};

/// Auxiliary inputs resolved outside the main document stream.
#[derive(Debug, Clone, Default)]
pub struct AuxData {
    /// The oEmbed document discovered via `<link rel=alternate>`, if any.
    pub oembed: Option<OEmbedDocument>,
    /// Property graph expanded from the page's JSON-LD islands, if any.
    pub graph: Option<RdfaGraph>,
}

#[derive(Debug, Clone)]
pub struct FuseOptions {
    /// Target icon edge length for nearest-size selection.
    pub preferred_icon_size: u32,
}

impl Default for FuseOptions {
    fn default() -> Self {
        Self { preferred_icon_size: 32 }
    }
}

/// Fuses one streaming pass's harvest into the HTML snippet.
#[instrument(skip_all, fields(url = %url))]
pub fn fuse(bag: &MetadataBag, aux: &AuxData, url: &Url, options: &FuseOptions) -> Snippet {
    let canonical = bag
        .canonical
        .clone()
        .or_else(|| bag.graph.root_first(&vocab::og("url")).map(str::to_string))
        .unwrap_or_else(|| url.to_string());
    let oembed = aux.oembed.as_ref();

    let snippet = HtmlSnippet {
        url: canonical.clone(),
        headline: headline(bag, aux),
        description: description(bag, aux),
        provider_name: oembed
            .and_then(|doc| doc.provider_name.clone())
            .or_else(|| bag.graph.root_first(&vocab::og("site_name")).map(str::to_string)),
        provider_url: oembed.and_then(|doc| doc.provider_url.clone()).or_else(|| origin_of(&canonical)),
        author_name: author_name(bag, aux),
        author_url: oembed
            .and_then(|doc| doc.author_url.clone())
            .or_else(|| bag.graph.root_first(&vocab::article("author")).map(str::to_string)),
        ttl_seconds: bag
            .graph
            .root_first(&vocab::og("ttl"))
            .and_then(|raw| raw.parse().ok())
            .or_else(|| oembed.and_then(|doc| doc.cache_age)),
        date: date(bag),
        keywords: keywords(bag),
        images: media::images(&bag.graph, &bag.twitter),
        videos: media::videos(&bag.graph, &bag.twitter),
        audio: media::audio(&bag.graph),
        apps: apps::resolve(&bag.twitter, &bag.app_links),
        locale: locale(bag),
        twitter: twitter_ids(bag),
        icon: icon::select(&bag.icons, options.preferred_icon_size),
        entity: entity::classify(bag, aux),
    };
    Snippet::Html(Box::new(snippet))
}

fn headline(bag: &MetadataBag, aux: &AuxData) -> Option<String> {
    bag.twitter
        .first("title")
        .or_else(|| aux.oembed.as_ref().and_then(|doc| doc.title.as_deref()))
        .or_else(|| bag.graph.root_first(&vocab::og("title")))
        .or_else(|| dc_first(bag, "title"))
        .or_else(|| schema_first(aux, &["headline", "name"]))
        .or_else(|| bag.general.first("title"))
        .map(str::to_string)
}

fn description(bag: &MetadataBag, aux: &AuxData) -> Option<String> {
    bag.twitter
        .first("description")
        .or_else(|| bag.graph.root_first(&vocab::og("description")))
        .or_else(|| dc_first(bag, "description"))
        .or_else(|| schema_first(aux, &["description"]))
        .or_else(|| bag.general.first("description"))
        .or_else(|| bag.sailthru.first("description"))
        .map(str::to_string)
}

fn author_name(bag: &MetadataBag, aux: &AuxData) -> Option<String> {
    aux.oembed
        .as_ref()
        .and_then(|doc| doc.author_name.as_deref())
        .or_else(|| bag.twitter.first("creator"))
        .or_else(|| dc_first(bag, "creator"))
        .or_else(|| bag.sailthru.first("author"))
        .or_else(|| bag.general.first("author"))
        .map(str::to_string)
}

fn date(bag: &MetadataBag) -> Option<time::OffsetDateTime> {
    bag.general
        .first("date")
        .or_else(|| dc_first(bag, "date"))
        .or_else(|| bag.sailthru.first("date"))
        .and_then(dates::parse_flexible)
}

fn keywords(bag: &MetadataBag) -> Vec<String> {
    bag.general
        .first("keywords")
        .map(|raw| raw.split(',').map(str::trim).filter(|word| !word.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

fn locale(bag: &MetadataBag) -> Locale {
    Locale {
        primary: bag
            .graph
            .root_first(&vocab::og("locale"))
            .or_else(|| bag.general.first("language"))
            .map(str::to_string),
        alternate: bag
            .graph
            .root_get(&vocab::og("locale:alternate"))
            .map(|values| values.iter().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

fn twitter_ids(bag: &MetadataBag) -> TwitterIds {
    TwitterIds {
        site_id: bag.twitter.first("site:id").map(str::to_string),
        site_handle: bag.twitter.first("site").map(str::to_string),
        creator_id: bag.twitter.first("creator:id").map(str::to_string),
        creator_handle: bag.twitter.first("creator").map(str::to_string),
    }
}

/// Dublin Core lookup: the triple graph (terms, then 1.1 elements) first,
/// then `<meta name="dc.*">` harvested into the flat dialect.
fn dc_first<'b>(bag: &'b MetadataBag, element: &str) -> Option<&'b str> {
    let terms = format!("{}{element}", vocab::DC_TERMS);
    let elements = format!("{}{element}", vocab::DC_ELEMENTS);
    bag.graph.first_of(&[&terms, &elements]).or_else(|| bag.dublin_core.first(element))
}

/// Lookup on the expanded JSON-LD graph, across all subjects.
fn schema_first<'a>(aux: &'a AuxData, names: &[&str]) -> Option<&'a str> {
    let graph = aux.graph.as_ref()?;
    names.iter().find_map(|name| graph.any_first(&format!("{}{name}", vocab::SCHEMA)))
}

fn origin_of(canonical: &str) -> Option<String> {
    let parsed = Url::parse(canonical).ok()?;
    if !parsed.has_host() {
        return None;
    }
    Some(parsed.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppEntry, Entity, OEmbedKind};
    use time::macros::datetime;

    fn base() -> Url {
        Url::parse("https://example.com/post").unwrap()
    }

    fn bag() -> MetadataBag {
        MetadataBag::new(base().to_string())
    }

    fn fuse_html(bag: &MetadataBag, aux: &AuxData) -> HtmlSnippet {
        match fuse(bag, aux, &base(), &FuseOptions::default()) {
            Snippet::Html(html) => *html,
            other => panic!("expected an html snippet, got {other:?}"),
        }
    }

    fn og_insert(bag: &mut MetadataBag, name: &str, value: &str) {
        let subject = bag.graph.root().to_string();
        bag.graph.insert(subject, vocab::og(name), value);
    }

    #[test]
    fn headline_from_open_graph_alone() {
        let mut bag = bag();
        og_insert(&mut bag, "title", "Hello");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.headline.as_deref(), Some("Hello"));
    }

    #[test]
    fn twitter_title_outranks_open_graph_and_document_title() {
        let mut bag = bag();
        bag.general.insert("title", "Document title");
        og_insert(&mut bag, "title", "OG title");
        bag.twitter.insert("title", "Twitter title");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.headline.as_deref(), Some("Twitter title"));
    }

    #[test]
    fn document_title_is_the_last_resort() {
        let mut bag = bag();
        bag.general.insert("title", "Document title");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.headline.as_deref(), Some("Document title"));
    }

    #[test]
    fn canonical_beats_og_url_beats_request_url() {
        let mut bag = bag();
        og_insert(&mut bag, "url", "https://example.com/og");
        bag.canonical = Some("https://example.com/canonical".to_string());
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.url, "https://example.com/canonical");

        let mut bag = self::bag();
        og_insert(&mut bag, "url", "https://example.com/og");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.url, "https://example.com/og");

        let html = fuse_html(&self::bag(), &AuxData::default());
        assert_eq!(html.url, "https://example.com/post");
    }

    #[test]
    fn provider_url_falls_back_to_canonical_origin() {
        let mut bag = bag();
        og_insert(&mut bag, "site_name", "Example");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.provider_name.as_deref(), Some("Example"));
        assert_eq!(html.provider_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn oembed_provider_outranks_site_name() {
        let mut bag = bag();
        og_insert(&mut bag, "site_name", "Example");
        let aux = AuxData {
            oembed: Some(OEmbedDocument {
                provider_name: Some("Vimeo".to_string()),
                provider_url: Some("https://vimeo.com".to_string()),
                ..Default::default()
            }),
            graph: None,
        };
        let html = fuse_html(&bag, &aux);
        assert_eq!(html.provider_name.as_deref(), Some("Vimeo"));
        assert_eq!(html.provider_url.as_deref(), Some("https://vimeo.com"));
    }

    #[test]
    fn image_records_merge_by_url() {
        let mut bag = bag();
        og_insert(&mut bag, "image", "https://cdn.example.com/a.png");
        og_insert(&mut bag, "image:width", "800");
        bag.twitter.insert("image:src", "https://cdn.example.com/a.png");
        bag.twitter.insert("image:height", "600");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.images.len(), 1);
        assert_eq!(html.images[0].width, Some(800));
        assert_eq!(html.images[0].height, Some(600));
    }

    #[test]
    fn twitter_app_card_outranks_app_links() {
        let mut bag = bag();
        bag.twitter.insert("app:id:iphone", "111");
        bag.twitter.insert("app:name:iphone", "Card App");
        bag.twitter.insert("app:url:iphone", "card://open");
        bag.app_links.insert("ios:app_store_id", "222");
        bag.app_links.insert("ios:app_name", "AL App");
        bag.app_links.insert("ios:url", "al://open");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(
            html.apps.iphone,
            AppEntry::complete(Some("111"), Some("Card App"), Some("card://open"))
        );
        // The iPad entry has no card attributes, so App Links fills it.
        assert_eq!(html.apps.ipad, AppEntry::complete(Some("222"), Some("AL App"), Some("al://open")));
    }

    #[test]
    fn article_entity_with_parsed_dates() {
        let mut bag = bag();
        og_insert(&mut bag, "type", "article");
        let subject = bag.graph.root().to_string();
        bag.graph.insert(subject.clone(), vocab::article("section"), "Tech");
        bag.graph.insert(subject, vocab::article("published_time"), "2021-06-01T10:30:00Z");
        let html = fuse_html(&bag, &AuxData::default());
        match html.entity {
            Some(Entity::Article { section, published, .. }) => {
                assert_eq!(section.as_deref(), Some("Tech"));
                assert_eq!(published, Some(datetime!(2021-06-01 10:30:00 UTC)));
            },
            other => panic!("expected an article entity, got {other:?}"),
        }
    }

    #[test]
    fn oembed_video_entity() {
        let aux = AuxData {
            oembed: Some(OEmbedDocument {
                kind: OEmbedKind::Video,
                html: Some("<iframe></iframe>".to_string()),
                width: Some(640),
                height: Some(360),
                ..Default::default()
            }),
            graph: None,
        };
        let html = fuse_html(&bag(), &aux);
        assert_eq!(
            html.entity,
            Some(Entity::Video { html: Some("<iframe></iframe>".to_string()), width: Some(640), height: Some(360) })
        );
    }

    #[test]
    fn keywords_split_and_trimmed() {
        let mut bag = bag();
        bag.general.insert("keywords", "rust, async , ,streams");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.keywords, vec!["rust", "async", "streams"]);
    }

    #[test]
    fn locale_prefers_og_locale_over_html_lang() {
        let mut bag = bag();
        bag.general.insert("language", "en");
        og_insert(&mut bag, "locale", "en_GB");
        og_insert(&mut bag, "locale:alternate", "fr_FR");
        og_insert(&mut bag, "locale:alternate", "de_DE");
        let html = fuse_html(&bag, &AuxData::default());
        assert_eq!(html.locale.primary.as_deref(), Some("en_GB"));
        assert_eq!(html.locale.alternate, vec!["fr_FR", "de_DE"]);
    }

    #[test]
    fn schema_headline_outranks_document_title() {
        let mut bag = bag();
        bag.general.insert("title", "Document title");
        let mut graph = RdfaGraph::new("https://example.com/post");
        graph.insert("_:b0", format!("{}headline", vocab::SCHEMA), "Schema headline");
        let aux = AuxData { oembed: None, graph: Some(graph) };
        let html = fuse_html(&bag, &aux);
        assert_eq!(html.headline.as_deref(), Some("Schema headline"));
    }

    #[test]
    fn fusion_is_deterministic() {
        let mut bag = bag();
        og_insert(&mut bag, "title", "Hello");
        og_insert(&mut bag, "image", "https://cdn.example.com/a.png");
        bag.twitter.insert("description", "A page");
        bag.general.insert("keywords", "a,b");
        let first = fuse(&bag, &AuxData::default(), &base(), &FuseOptions::default());
        let second = fuse(&bag, &AuxData::default(), &base(), &FuseOptions::default());
        assert_eq!(first, second);
    }
}
