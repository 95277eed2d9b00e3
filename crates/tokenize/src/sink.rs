//! The html5ever token sink that builds a [`MetadataBag`] in one pass.
//!
//! Four pieces of context are scoped to tag nesting: the RDFa vocabulary
//! (`vocab`), the prefix map (`prefix`, parent-chained), the current subject
//! (`resource`), and a per-element pending-text capture used when a property
//! has no inline value.

use std::cell::RefCell;
use std::sync::Arc;

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{Tag, TagKind, Token, TokenSink, TokenSinkResult};
use url::Url;

use crate::bag::MetadataBag;
use crate::prefixes::PrefixScope;

/// Elements that never take a closing tag; they are processed inline and
/// never pushed onto the nesting stack.
const VOID_ELEMENTS: &[&str] =
    &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr"];

/// Elements whose RDFa value, absent a `content` attribute, comes from one of
/// their own attributes rather than their text.
fn implicit_value_attr(name: &str) -> Option<&'static str> {
    match name {
        "a" | "link" | "area" => Some("href"),
        "img" | "audio" | "video" | "embed" | "iframe" | "source" | "track" => Some("src"),
        "object" => Some("data"),
        "time" => Some("datetime"),
        _ => None,
    }
}

/// The raw HTML `<meta name=...>` values worth keeping.
const GENERAL_META_NAMES: &[&str] = &["date", "keywords", "author", "description", "language"];

enum Capture {
    None,
    /// RDFa properties waiting for this element's text.
    Property { subject: Arc<String>, properties: Vec<String>, text: String },
    /// `<title>` text.
    Title(String),
    /// Embedded JSON-LD payload, parsed on close.
    JsonLd(String),
    /// Raw-text element we ignore (`<style>`, non-JSON-LD `<script>`).
    Discard,
}

struct Frame {
    name: String,
    prefixes: Arc<PrefixScope>,
    vocab: Option<Arc<String>>,
    subject: Arc<String>,
    capture: Capture,
}

struct SinkState {
    base: Url,
    document_subject: Arc<String>,
    root_prefixes: Arc<PrefixScope>,
    stack: Vec<Frame>,
    bag: MetadataBag,
}

/// Sink driving all metadata collection. State lives behind a `RefCell`
/// because html5ever hands out `&self`.
pub(crate) struct MetaSink {
    state: RefCell<SinkState>,
}

impl MetaSink {
    pub(crate) fn new(base: Url) -> Self {
        let document_subject = Arc::new(base.to_string());
        let bag = MetadataBag::new(base.to_string());
        Self {
            state: RefCell::new(SinkState {
                base,
                document_subject,
                root_prefixes: PrefixScope::root(),
                stack: Vec::new(),
                bag,
            }),
        }
    }

    /// Closes any dangling elements and hands over the finished bag.
    pub(crate) fn into_bag(self) -> MetadataBag {
        let mut state = self.state.into_inner();
        while let Some(frame) = state.stack.pop() {
            state.finish_frame(frame);
        }
        state.bag
    }
}

impl TokenSink for MetaSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return state.open_tag(&tag),
                TagKind::EndTag => state.close_tag(&tag.name),
            },
            Token::CharacterTokens(text) => state.text(&text),
            Token::ParseError(error) => tracing::debug!(%error, "html tokenizer parse error"),
            Token::DoctypeToken(_) | Token::CommentToken(_) | Token::NullCharacterToken | Token::EOFToken => {},
        }
        TokenSinkResult::Continue
    }
}

impl SinkState {
    fn open_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        let name: &str = &tag.name;

        // Inherit scoping context from the innermost open element.
        let (parent_prefixes, parent_vocab, parent_subject) = match self.stack.last() {
            Some(frame) => (Arc::clone(&frame.prefixes), frame.vocab.clone(), Arc::clone(&frame.subject)),
            None => (Arc::clone(&self.root_prefixes), None, Arc::clone(&self.document_subject)),
        };
        let prefixes = match attr(tag, "prefix") {
            Some(declaration) => PrefixScope::child(&parent_prefixes, declaration),
            None => parent_prefixes,
        };
        let vocab = match attr(tag, "vocab") {
            Some(declared) if !declared.trim().is_empty() => Some(Arc::new(declared.trim().to_string())),
            // `vocab=""` resets to no vocabulary.
            Some(_) => None,
            None => parent_vocab,
        };
        let subject = match attr(tag, "resource") {
            Some(resource) => Arc::new(self.resolve_url(resource)),
            None => parent_subject,
        };

        match name {
            "html" => {
                if let Some(lang) = attr(tag, "lang").filter(|lang| !lang.trim().is_empty()) {
                    self.bag.general.insert("language", lang.trim());
                }
            },
            "meta" => self.meta_tag(tag, &prefixes, &vocab, &subject),
            "link" => {
                self.link_tag(tag);
                self.rdfa_tag(tag, name, &prefixes, &vocab, &subject);
            },
            "title" => {
                if !tag.self_closing {
                    self.stack.push(Frame { name: name.to_string(), prefixes, vocab, subject, capture: Capture::Title(String::new()) });
                    return TokenSinkResult::RawData(RawKind::Rcdata);
                }
            },
            "script" => {
                if !tag.self_closing {
                    let capture = if attr(tag, "type").map(is_json_ld_type).unwrap_or(false) {
                        Capture::JsonLd(String::new())
                    } else {
                        Capture::Discard
                    };
                    self.stack.push(Frame { name: name.to_string(), prefixes, vocab, subject, capture });
                    return TokenSinkResult::RawData(RawKind::ScriptData);
                }
            },
            "style" => {
                if !tag.self_closing {
                    self.stack.push(Frame { name: name.to_string(), prefixes, vocab, subject, capture: Capture::Discard });
                    return TokenSinkResult::RawData(RawKind::Rawtext);
                }
            },
            "textarea" => {
                if !tag.self_closing {
                    self.stack.push(Frame { name: name.to_string(), prefixes, vocab, subject, capture: Capture::Discard });
                    return TokenSinkResult::RawData(RawKind::Rcdata);
                }
            },
            _ => {
                let capture = self.rdfa_tag(tag, name, &prefixes, &vocab, &subject);
                if !tag.self_closing && !VOID_ELEMENTS.contains(&name) {
                    self.stack.push(Frame { name: name.to_string(), prefixes, vocab, subject, capture });
                }
                return TokenSinkResult::Continue;
            },
        }
        TokenSinkResult::Continue
    }

    fn close_tag(&mut self, name: &str) {
        // Lenient matching: close the nearest open element of this name,
        // implicitly finishing anything left open inside it. A stray end tag
        // with no matching open element is ignored.
        let Some(position) = self.stack.iter().rposition(|frame| frame.name == name) else {
            return;
        };
        while self.stack.len() > position {
            if let Some(frame) = self.stack.pop() {
                self.finish_frame(frame);
            }
        }
    }

    fn text(&mut self, text: &str) {
        // Text belongs to the nearest enclosing element that wants it, so a
        // property value may span inline children.
        for frame in self.stack.iter_mut().rev() {
            match &mut frame.capture {
                Capture::Property { text: buffer, .. } | Capture::Title(buffer) | Capture::JsonLd(buffer) => {
                    buffer.push_str(text);
                    return;
                },
                Capture::Discard => return,
                Capture::None => {},
            }
        }
    }

    fn finish_frame(&mut self, frame: Frame) {
        match frame.capture {
            Capture::None | Capture::Discard => {},
            Capture::Property { subject, properties, text } => {
                let value = text.trim();
                if !value.is_empty() {
                    for property in properties {
                        self.bag.graph.insert(subject.as_str(), property, value);
                    }
                }
            },
            Capture::Title(text) => {
                let title = text.trim();
                if !title.is_empty() {
                    self.bag.general.insert("title", title);
                }
            },
            Capture::JsonLd(text) => match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(document) => self.bag.json_ld.push(document),
                Err(error) => tracing::debug!(%error, "ignoring malformed embedded JSON-LD"),
            },
        }
    }

    /// Flat-dialect classification of `<meta>` tags, plus the RDFa path for
    /// `property` attributes that resolve against the graph.
    fn meta_tag(&mut self, tag: &Tag, prefixes: &Arc<PrefixScope>, vocab: &Option<Arc<String>>, subject: &Arc<String>) {
        let Some(content) = attr(tag, "content") else {
            return;
        };
        if let Some(property) = attr(tag, "property") {
            for term in property.split_whitespace() {
                if let Some(rest) = term.strip_prefix("twitter:") {
                    self.bag.twitter.insert(rest, content);
                } else if let Some(rest) = term.strip_prefix("al:") {
                    self.bag.app_links.insert(rest, content);
                } else if let Some(resolved) = resolve_term(term, prefixes, vocab) {
                    self.bag.graph.insert(subject.as_str(), resolved, content);
                }
            }
        }
        if let Some(name) = attr(tag, "name") {
            let lowered = name.to_ascii_lowercase();
            if let Some(rest) = name.strip_prefix("twitter:") {
                self.bag.twitter.insert(rest, content);
            } else if let Some(rest) = lowered.strip_prefix("dc.") {
                self.bag.dublin_core.insert(rest, content);
            } else if let Some(rest) = lowered.strip_prefix("sailthru.") {
                self.bag.sailthru.insert(rest, content);
            } else if GENERAL_META_NAMES.contains(&lowered.as_str()) {
                self.bag.general.insert(lowered, content);
            }
        }
    }

    fn link_tag(&mut self, tag: &Tag) {
        let (Some(rel), Some(href)) = (attr(tag, "rel"), attr(tag, "href")) else {
            return;
        };
        let resolved = self.resolve_url(href);
        let rel = rel.to_ascii_lowercase();
        let tokens: Vec<&str> = rel.split_whitespace().collect();
        if tokens.contains(&"canonical") && self.bag.canonical.is_none() {
            self.bag.canonical = Some(resolved.clone());
        }
        if tokens.contains(&"alternate") {
            self.bag.alternates.push(crate::bag::AlternateLink {
                href: resolved.clone(),
                media_type: attr(tag, "type").map(|t| t.trim().to_ascii_lowercase()),
                title: attr(tag, "title").map(str::to_string),
            });
        }
        if tokens.iter().any(|token| token.contains("icon")) {
            self.bag.icons.push(crate::bag::IconLink {
                href: resolved,
                sizes: attr(tag, "sizes").map(str::to_string),
                media_type: attr(tag, "type").map(|t| t.trim().to_ascii_lowercase()),
            });
        }
    }

    /// RDFa `property` handling for ordinary elements. Returns the capture to
    /// install when the value must come from the element's text.
    fn rdfa_tag(
        &mut self,
        tag: &Tag,
        name: &str,
        prefixes: &Arc<PrefixScope>,
        vocab: &Option<Arc<String>>,
        subject: &Arc<String>,
    ) -> Capture {
        let Some(property) = attr(tag, "property") else {
            return Capture::None;
        };
        let properties: Vec<String> =
            property.split_whitespace().filter_map(|term| resolve_term(term, prefixes, vocab)).collect();
        if properties.is_empty() {
            return Capture::None;
        }
        let inline = attr(tag, "content").map(str::to_string).or_else(|| self.implicit_value(tag, name));
        match inline {
            Some(value) => {
                for property in properties {
                    self.bag.graph.insert(subject.as_str(), property, value.clone());
                }
                Capture::None
            },
            None => Capture::Property { subject: Arc::clone(subject), properties, text: String::new() },
        }
    }

    fn implicit_value(&self, tag: &Tag, name: &str) -> Option<String> {
        let source = implicit_value_attr(name)?;
        let raw = attr(tag, source)?;
        if source == "datetime" {
            // Dates are opaque values, not URLs.
            return Some(raw.trim().to_string());
        }
        Some(self.resolve_url(raw))
    }

    fn resolve_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        match self.base.join(raw) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

fn attr<'t>(tag: &'t Tag, name: &str) -> Option<&'t str> {
    tag.attrs.iter().find(|attribute| &*attribute.name.local == name).map(|attribute| &*attribute.value)
}

fn is_json_ld_type(declared: &str) -> bool {
    unfurl_streams::media_type::essence(declared).is_some_and(|essence| essence == "application/ld+json")
}

/// Resolves one RDFa term to an absolute property IRI: `prefix:name` through
/// the innermost prefix chain, bare terms through the innermost vocabulary.
/// Unresolvable terms are logged and dropped.
fn resolve_term(term: &str, prefixes: &PrefixScope, vocab: &Option<Arc<String>>) -> Option<String> {
    if let Some((prefix, local)) = term.split_once(':') {
        return match prefixes.resolve(prefix) {
            Some(iri) => Some(format!("{iri}{local}")),
            None => {
                tracing::debug!(term, "dropping term with undeclared prefix");
                None
            },
        };
    }
    match vocab {
        Some(vocabulary) => Some(format!("{vocabulary}{term}")),
        None => {
            tracing::debug!(term, "dropping bare term without a vocabulary in scope");
            None
        },
    }
}
