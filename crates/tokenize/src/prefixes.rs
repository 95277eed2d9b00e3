//! RDFa prefix and vocabulary scoping.
//!
//! The default prefix table is an immutable constant injected into every
//! tokenizer invocation; per-element `prefix` attributes introduce child
//! scopes chained to their parent, so a nested override never leaks to
//! sibling elements or to concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

/// The default RDFa initial-context prefix mappings.
pub static DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("article", "http://ogp.me/ns/article#"),
    ("book", "http://ogp.me/ns/book#"),
    ("cc", "http://creativecommons.org/ns#"),
    ("ctag", "http://commontag.org/ns#"),
    ("dc", "http://purl.org/dc/terms/"),
    ("dc11", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("fb", "http://ogp.me/ns/fb#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("gr", "http://purl.org/goodrelations/v1#"),
    ("music", "http://ogp.me/ns/music#"),
    ("og", "http://ogp.me/ns#"),
    ("profile", "http://ogp.me/ns/profile#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("rev", "http://purl.org/stuff/rev#"),
    ("schema", "http://schema.org/"),
    ("sioc", "http://rdfs.org/sioc/ns#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("v", "http://rdf.data-vocabulary.org/#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("video", "http://ogp.me/ns/video#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// One level of prefix scoping, chained to its parent.
///
/// Lookup walks the chain innermost-first, so a child's redefinition of a
/// prefix shadows the parent without mutating it.
#[derive(Debug)]
pub struct PrefixScope {
    local: HashMap<String, String>,
    parent: Option<Arc<PrefixScope>>,
}

impl PrefixScope {
    /// The root scope holding the immutable default table.
    pub fn root() -> Arc<Self> {
        let local = DEFAULT_PREFIXES.iter().map(|(name, iri)| (name.to_string(), iri.to_string())).collect();
        Arc::new(Self { local, parent: None })
    }

    /// Parses a `prefix` attribute (`name: IRI` pairs, whitespace separated)
    /// into a child scope. Pairs with a malformed name token are skipped.
    pub fn child(parent: &Arc<Self>, prefix_attr: &str) -> Arc<Self> {
        let mut local = HashMap::new();
        let mut tokens = prefix_attr.split_whitespace();
        while let Some(name) = tokens.next() {
            let Some(iri) = tokens.next() else {
                break;
            };
            match name.strip_suffix(':') {
                Some(bare) if !bare.is_empty() => {
                    local.insert(bare.to_string(), iri.to_string());
                },
                _ => tracing::debug!(token = name, "skipping malformed prefix declaration"),
            }
        }
        Arc::new(Self { local, parent: Some(Arc::clone(parent)) })
    }

    /// Resolves a prefix to its IRI, innermost scope first.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        match self.local.get(prefix) {
            Some(iri) => Some(iri),
            None => self.parent.as_deref()?.resolve(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("og", Some("http://ogp.me/ns#"))]
    #[case("dc", Some("http://purl.org/dc/terms/"))]
    #[case("schema", Some("http://schema.org/"))]
    #[case("twitter", None)]
    fn root_scope_resolves_the_default_table(#[case] prefix: &str, #[case] iri: Option<&str>) {
        assert_eq!(PrefixScope::root().resolve(prefix), iri);
    }

    #[test]
    fn child_shadows_without_mutating_parent() {
        let root = PrefixScope::root();
        let child = PrefixScope::child(&root, "og: http://example.org/override# new: http://example.org/new#");
        assert_eq!(child.resolve("og"), Some("http://example.org/override#"));
        assert_eq!(child.resolve("new"), Some("http://example.org/new#"));
        assert_eq!(child.resolve("dc"), Some("http://purl.org/dc/terms/"));
        // Parent unchanged: siblings created later still see the defaults.
        assert_eq!(root.resolve("og"), Some("http://ogp.me/ns#"));
        assert_eq!(root.resolve("new"), None);
    }

    #[test]
    fn malformed_declarations_are_skipped() {
        let root = PrefixScope::root();
        let child = PrefixScope::child(&root, "nocolon http://example.org/ good: http://example.org/good#");
        assert_eq!(child.resolve("nocolon"), None);
        assert_eq!(child.resolve("good"), Some("http://example.org/good#"));
    }
}
