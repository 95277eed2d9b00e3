//! Stream primitives shared across the unfurl workspace: tee fan-out,
//! bounded body collection, JSON body decoding, incremental UTF-8 decoding,
//! and MIME essence extraction.

pub mod decode;
pub mod error;
pub mod media_type;
mod read;
mod tee;

pub use crate::decode::Utf8Decoder;
pub use crate::read::{drain, read_json, read_limited};
pub use crate::tee::{TeeReader, tee};
