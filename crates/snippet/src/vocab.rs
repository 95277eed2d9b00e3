//! Property IRIs the fusion engine consults on the triple graph.

pub(crate) const OG: &str = "http://ogp.me/ns#";
pub(crate) const ARTICLE: &str = "http://ogp.me/ns/article#";
pub(crate) const DC_TERMS: &str = "http://purl.org/dc/terms/";
pub(crate) const DC_ELEMENTS: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const SCHEMA: &str = "http://schema.org/";

pub(crate) fn og(name: &str) -> String {
    format!("{OG}{name}")
}

pub(crate) fn article(name: &str) -> String {
    format!("{ARTICLE}{name}")
}
