//! The tokenizer's output model: flat per-dialect dictionaries plus a
//! subject-keyed RDFa triple graph.

use std::collections::BTreeMap;

/// One or many string values for a single key.
///
/// A second occurrence of the same key never overwrites: a scalar becomes a
/// two-element list, preserving encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
    One(String),
    Many(Vec<String>),
}

impl Values {
    pub fn push(&mut self, value: String) {
        match self {
            Values::One(existing) => {
                *self = Values::Many(vec![std::mem::take(existing), value]);
            },
            Values::Many(list) => list.push(value),
        }
    }

    /// The first value in encounter order.
    pub fn first(&self) -> &str {
        match self {
            Values::One(value) => value,
            // Construction guarantees Many is never empty.
            Values::Many(list) => list.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Values::One(value) => std::slice::from_ref(value).iter(),
            Values::Many(list) => list.iter(),
        }
        .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        match self {
            Values::One(_) => 1,
            Values::Many(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The closed set of keys a dialect documents.
///
/// Anything outside the set still gets collected, but lands in the dialect's
/// `extensions` bucket instead of its primary map.
#[derive(Debug, PartialEq)]
pub struct KeySet {
    pub exact: &'static [&'static str],
    pub prefixes: &'static [&'static str],
}

impl KeySet {
    fn contains(&self, key: &str) -> bool {
        self.exact.contains(&key) || self.prefixes.iter().any(|prefix| key.starts_with(prefix))
    }
}

/// Documented key sets for each flat dialect.
pub mod keys {
    use super::KeySet;

    /// Raw HTML metadata: the `name=` allow-list plus `<title>` and `<html lang>`.
    pub static GENERAL: KeySet = KeySet {
        exact: &["title", "description", "author", "date", "keywords", "language"],
        prefixes: &[],
    };

    /// Twitter Cards. Indexed image variants and app-card keys are matched
    /// by prefix since the suffix space is open-ended.
    pub static TWITTER: KeySet = KeySet {
        exact: &[
            "card",
            "site",
            "site:id",
            "creator",
            "creator:id",
            "title",
            "description",
            "url",
            "domain",
        ],
        prefixes: &["image", "player", "app:"],
    };

    /// Dublin Core element set (keys already lower-cased, `dc.` stripped).
    pub static DUBLIN_CORE: KeySet = KeySet {
        exact: &[
            "title",
            "creator",
            "subject",
            "description",
            "publisher",
            "contributor",
            "date",
            "type",
            "format",
            "identifier",
            "source",
            "language",
            "relation",
            "coverage",
            "rights",
        ],
        prefixes: &[],
    };

    /// Sailthru (keys with `sailthru.` stripped).
    pub static SAILTHRU: KeySet = KeySet {
        exact: &["title", "description", "author", "date", "tags", "image.full", "image.thumb"],
        prefixes: &["image."],
    };

    /// App Links (`al:` stripped), matched per platform namespace.
    pub static APP_LINKS: KeySet = KeySet {
        exact: &[],
        prefixes: &["ios:", "iphone:", "ipad:", "android:", "windows:", "windows_phone:", "windows_universal:", "web:"],
    };
}

/// A flat key/value dialect with a documented key set and an extensions
/// escape hatch for everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatDialect {
    known: &'static KeySet,
    values: BTreeMap<String, Values>,
    extensions: BTreeMap<String, Values>,
}

impl FlatDialect {
    pub fn new(known: &'static KeySet) -> Self {
        Self { known, values: BTreeMap::new(), extensions: BTreeMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let target = if self.known.contains(&key) { &mut self.values } else { &mut self.extensions };
        target.entry(key).and_modify(|existing| existing.push(value.clone())).or_insert(Values::One(value));
    }

    pub fn get(&self, key: &str) -> Option<&Values> {
        self.values.get(key).or_else(|| self.extensions.get(key))
    }

    /// First value in encounter order for the key, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).map(Values::first)
    }

    /// All keys starting with `prefix`, lexicographically ordered, from both
    /// the documented map and the extension bucket.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a Values)> {
        self.values
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .chain(
                self.extensions.range(prefix.to_string()..).take_while(move |(key, _)| key.starts_with(prefix)),
            )
            .map(|(key, values)| (key.as_str(), values))
    }

    /// An absent dialect and an empty one are the same thing to callers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extensions.is_empty()
    }
}

/// A subject → property → values triple store built from nested HTML
/// attribute conventions.
///
/// The `root` subject is the document itself (its base URL); `resource`
/// attributes introduce further subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct RdfaGraph {
    root: String,
    subjects: BTreeMap<String, BTreeMap<String, Values>>,
}

impl RdfaGraph {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into(), subjects: BTreeMap::new() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn insert(&mut self, subject: impl Into<String>, property: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        self.subjects
            .entry(subject.into())
            .or_default()
            .entry(property.into())
            .and_modify(|existing| existing.push(value.clone()))
            .or_insert(Values::One(value));
    }

    pub fn get(&self, subject: &str, property: &str) -> Option<&Values> {
        self.subjects.get(subject)?.get(property)
    }

    /// Values of `property` on the document subject.
    pub fn root_get(&self, property: &str) -> Option<&Values> {
        self.get(&self.root, property)
    }

    pub fn root_first(&self, property: &str) -> Option<&str> {
        self.root_get(property).map(Values::first)
    }

    /// First non-empty value among `properties` on the document subject, in
    /// the given order. The order is the precedence chain, so it is behavior.
    pub fn first_of(&self, properties: &[&str]) -> Option<&str> {
        properties.iter().find_map(|property| self.root_first(property)).filter(|value| !value.is_empty())
    }

    /// First value of `property` on *any* subject, subjects in key order.
    /// Used against expanded linked-data graphs where the subject of
    /// interest is a blank node.
    pub fn any_first(&self, property: &str) -> Option<&str> {
        self.subjects.values().find_map(|properties| properties.get(property)).map(Values::first)
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.values().all(BTreeMap::is_empty)
    }
}

/// An `<link rel=alternate>` discovery, keyed by its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub href: String,
    pub media_type: Option<String>,
    pub title: Option<String>,
}

/// An icon candidate in document discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLink {
    pub href: String,
    pub sizes: Option<String>,
    pub media_type: Option<String>,
}

/// Everything one streaming pass over an HTML document produces.
///
/// Built incrementally while streaming, immutable once the stream ends.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBag {
    pub general: FlatDialect,
    pub twitter: FlatDialect,
    pub dublin_core: FlatDialect,
    pub sailthru: FlatDialect,
    pub app_links: FlatDialect,
    pub graph: RdfaGraph,
    pub canonical: Option<String>,
    pub alternates: Vec<AlternateLink>,
    pub icons: Vec<IconLink>,
    pub json_ld: Vec<serde_json::Value>,
}

impl MetadataBag {
    /// True when the pass harvested nothing at all, from any dialect.
    pub fn is_empty(&self) -> bool {
        self.general.is_empty()
            && self.twitter.is_empty()
            && self.dublin_core.is_empty()
            && self.sailthru.is_empty()
            && self.app_links.is_empty()
            && self.graph.is_empty()
            && self.canonical.is_none()
            && self.alternates.is_empty()
            && self.icons.is_empty()
            && self.json_ld.is_empty()
    }

    pub fn new(document_subject: impl Into<String>) -> Self {
        Self {
            general: FlatDialect::new(&keys::GENERAL),
            twitter: FlatDialect::new(&keys::TWITTER),
            dublin_core: FlatDialect::new(&keys::DUBLIN_CORE),
            sailthru: FlatDialect::new(&keys::SAILTHRU),
            app_links: FlatDialect::new(&keys::APP_LINKS),
            graph: RdfaGraph::new(document_subject),
            canonical: None,
            alternates: Vec::new(),
            icons: Vec::new(),
            json_ld: Vec::new(),
        }
    }
}
