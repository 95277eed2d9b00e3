mod apps;
mod entity;
mod media;
mod oembed;
mod snippet;

pub use self::apps::{AppEntry, Apps};
pub use self::entity::Entity;
pub use self::media::{AudioRecord, Icon, ImageRecord, Locale, PlayerRecord, TwitterIds};
pub use self::oembed::{OEmbedDocument, OEmbedKind};
pub use self::snippet::{HtmlSnippet, LinkSnippet, MediaSnippet, Snippet};
