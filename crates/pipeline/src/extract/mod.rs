//! The built-in content-type plugins.

mod binary;
mod html;

pub use self::binary::{DocumentExtractor, MediaExtractor};
pub use self::html::HtmlExtractor;
