//! Content entity classification: a priority cascade from Open Graph type,
//! through oEmbed type, to Twitter card type.

use unfurl_tokenize::MetadataBag;

use crate::dates::parse_flexible;
use crate::fuse::AuxData;
use crate::models::{Entity, OEmbedKind};
use crate::vocab;

pub(crate) fn classify(bag: &MetadataBag, aux: &AuxData) -> Option<Entity> {
    if bag.graph.root_first(&vocab::og("type")) == Some("article") {
        return Some(Entity::Article {
            section: bag.graph.root_first(&vocab::article("section")).map(str::to_string),
            publisher: bag.graph.root_first(&vocab::article("publisher")).map(str::to_string),
            published: bag.graph.root_first(&vocab::article("published_time")).and_then(parse_flexible),
            modified: bag.graph.root_first(&vocab::article("modified_time")).and_then(parse_flexible),
            expiration: bag.graph.root_first(&vocab::article("expiration_time")).and_then(parse_flexible),
        });
    }
    if let Some(oembed) = &aux.oembed {
        match oembed.kind {
            OEmbedKind::Video => {
                return Some(Entity::Video { html: oembed.html.clone(), width: oembed.width, height: oembed.height });
            },
            OEmbedKind::Rich => {
                return Some(Entity::Rich { html: oembed.html.clone(), width: oembed.width, height: oembed.height });
            },
            _ => {},
        }
    }
    let card = bag.twitter.first("card");
    let photo_card = matches!(card, Some("summary_large_image" | "photo" | "gallery"));
    let photo_oembed = aux.oembed.as_ref().is_some_and(|oembed| oembed.kind == OEmbedKind::Photo);
    if photo_card || photo_oembed {
        let oembed = aux.oembed.as_ref();
        return Some(Entity::Image {
            url: oembed.and_then(|doc| doc.url.clone()),
            width: oembed.and_then(|doc| doc.width),
            height: oembed.and_then(|doc| doc.height),
        });
    }
    None
}
