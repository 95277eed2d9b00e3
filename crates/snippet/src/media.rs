//! Media list harvesting and URL-keyed merging.
//!
//! The graph (`og:*`) is the primary source; the flat Twitter dialect is
//! secondary. Merging is keyed by exact URL: a later source only fills
//! fields the earlier source left unset, and when the primary source is
//! absent entirely the secondary source's first candidate is appended
//! instead of merely patched.

use unfurl_tokenize::{FlatDialect, RdfaGraph};

use crate::models::{AudioRecord, ImageRecord, PlayerRecord};
use crate::vocab;

pub(crate) fn images(graph: &RdfaGraph, twitter: &FlatDialect) -> Vec<ImageRecord> {
    let mut fused: Vec<ImageRecord> = Vec::new();
    let urls = graph_list(graph, &vocab::og("image"));
    let secure = graph_list(graph, &vocab::og("image:secure_url"));
    let types = graph_list(graph, &vocab::og("image:type"));
    let widths = graph_list(graph, &vocab::og("image:width"));
    let heights = graph_list(graph, &vocab::og("image:height"));
    let alts = graph_list(graph, &vocab::og("image:alt"));
    for (index, url) in urls.iter().enumerate() {
        upsert_image(&mut fused, ImageRecord {
            url: url.to_string(),
            secure_url: nth(&secure, index),
            media_type: nth(&types, index),
            width: nth_u32(&widths, index),
            height: nth_u32(&heights, index),
            alt: nth(&alts, index),
        });
    }

    let mut secondary: Vec<ImageRecord> = Vec::new();
    if let Some(url) = twitter.first("image:src").or_else(|| twitter.first("image")) {
        secondary.push(ImageRecord {
            url: url.to_string(),
            secure_url: None,
            media_type: None,
            width: twitter.first("image:width").and_then(|raw| raw.parse().ok()),
            height: twitter.first("image:height").and_then(|raw| raw.parse().ok()),
            alt: twitter.first("image:alt").map(str::to_string),
        });
    }
    for index in 0..4 {
        let src_key = format!("image{index}:src");
        let bare_key = format!("image{index}");
        if let Some(url) = twitter.first(&src_key).or_else(|| twitter.first(&bare_key)) {
            secondary.push(ImageRecord { url: url.to_string(), ..Default::default() });
        }
    }

    let had_primary = !fused.is_empty();
    for (index, candidate) in secondary.into_iter().enumerate() {
        if fused.iter().any(|existing| existing.url == candidate.url) {
            upsert_image(&mut fused, candidate);
        } else if !had_primary && index == 0 {
            fused.push(candidate);
        }
    }
    fused
}

pub(crate) fn videos(graph: &RdfaGraph, twitter: &FlatDialect) -> Vec<PlayerRecord> {
    let mut fused: Vec<PlayerRecord> = Vec::new();
    let mut urls = graph_list(graph, &vocab::og("video"));
    if urls.is_empty() {
        urls = graph_list(graph, &vocab::og("video:url"));
    }
    let secure = graph_list(graph, &vocab::og("video:secure_url"));
    let types = graph_list(graph, &vocab::og("video:type"));
    let widths = graph_list(graph, &vocab::og("video:width"));
    let heights = graph_list(graph, &vocab::og("video:height"));
    for (index, url) in urls.iter().enumerate() {
        upsert_video(&mut fused, PlayerRecord {
            url: url.to_string(),
            secure_url: nth(&secure, index),
            stream_url: None,
            media_type: nth(&types, index),
            width: nth_u32(&widths, index),
            height: nth_u32(&heights, index),
        });
    }

    let mut secondary: Vec<PlayerRecord> = Vec::new();
    if let Some(url) = twitter.first("player") {
        secondary.push(PlayerRecord {
            url: url.to_string(),
            secure_url: None,
            stream_url: twitter.first("player:stream").map(str::to_string),
            media_type: None,
            width: twitter.first("player:width").and_then(|raw| raw.parse().ok()),
            height: twitter.first("player:height").and_then(|raw| raw.parse().ok()),
        });
    }

    let had_primary = !fused.is_empty();
    for (index, candidate) in secondary.into_iter().enumerate() {
        if fused.iter().any(|existing| existing.url == candidate.url) {
            upsert_video(&mut fused, candidate);
        } else if !had_primary && index == 0 {
            fused.push(candidate);
        }
    }
    fused
}

pub(crate) fn audio(graph: &RdfaGraph) -> Vec<AudioRecord> {
    let mut fused: Vec<AudioRecord> = Vec::new();
    let urls = graph_list(graph, &vocab::og("audio"));
    let secure = graph_list(graph, &vocab::og("audio:secure_url"));
    let types = graph_list(graph, &vocab::og("audio:type"));
    for (index, url) in urls.iter().enumerate() {
        let candidate = AudioRecord {
            url: url.to_string(),
            secure_url: nth(&secure, index),
            media_type: nth(&types, index),
        };
        match fused.iter_mut().find(|existing| existing.url == candidate.url) {
            Some(existing) => {
                merge_option(&mut existing.secure_url, candidate.secure_url);
                merge_option(&mut existing.media_type, candidate.media_type);
            },
            None => fused.push(candidate),
        }
    }
    fused
}

/// Inserts the candidate, or fills the unset fields of the existing entry
/// with the same URL. Set fields are never overwritten.
fn upsert_image(list: &mut Vec<ImageRecord>, candidate: ImageRecord) {
    match list.iter_mut().find(|existing| existing.url == candidate.url) {
        Some(existing) => {
            merge_option(&mut existing.secure_url, candidate.secure_url);
            merge_option(&mut existing.media_type, candidate.media_type);
            merge_option(&mut existing.width, candidate.width);
            merge_option(&mut existing.height, candidate.height);
            merge_option(&mut existing.alt, candidate.alt);
        },
        None => list.push(candidate),
    }
}

fn upsert_video(list: &mut Vec<PlayerRecord>, candidate: PlayerRecord) {
    match list.iter_mut().find(|existing| existing.url == candidate.url) {
        Some(existing) => {
            merge_option(&mut existing.secure_url, candidate.secure_url);
            merge_option(&mut existing.stream_url, candidate.stream_url);
            merge_option(&mut existing.media_type, candidate.media_type);
            merge_option(&mut existing.width, candidate.width);
            merge_option(&mut existing.height, candidate.height);
        },
        None => list.push(candidate),
    }
}

fn merge_option<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if slot.is_none() {
        *slot = incoming;
    }
}

fn graph_list<'g>(graph: &'g RdfaGraph, property: &str) -> Vec<&'g str> {
    graph.root_get(property).map(|values| values.iter().collect()).unwrap_or_default()
}

fn nth(list: &[&str], index: usize) -> Option<String> {
    list.get(index).map(|value| value.to_string())
}

fn nth_u32(list: &[&str], index: usize) -> Option<u32> {
    list.get(index).and_then(|value| value.parse().ok())
}
