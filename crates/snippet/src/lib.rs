//! Fusion of harvested page metadata into one typed snippet.
//!
//! Inputs are immutable: the [`MetadataBag`](unfurl_tokenize::MetadataBag)
//! from the streaming tokenizer plus any auxiliary documents the pipeline
//! resolved (oEmbed, an expanded JSON-LD graph). Output is a [`Snippet`],
//! a closed union over HTML pages, binary media, and the bare-link
//! fallback. Everything here is pure; fetching happens upstream.

mod apps;
mod dates;
mod entity;
mod exif;
mod fuse;
mod icon;
mod media;
pub mod models;
mod vocab;

pub use crate::exif::{BinaryKind, project};
pub use crate::fuse::{AuxData, FuseOptions, fuse};
pub use crate::models::{
    AppEntry, Apps, AudioRecord, Entity, HtmlSnippet, Icon, ImageRecord, LinkSnippet, Locale, MediaSnippet,
    OEmbedDocument, OEmbedKind, PlayerRecord, Snippet, TwitterIds,
};
