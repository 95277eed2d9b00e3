//! Stream Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A stream error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for stream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A read from the underlying stream failed. The stream is dead; fetch again.
    #[display("I/O error while reading stream")]
    Io,
    /// The body exceeded the caller's size limit. Don't retry with the same limit.
    #[display("stream exceeded limit of {_0} bytes")]
    TooLarge(#[error(not(source))] usize),
    /// The body was not the JSON document the caller expected.
    #[display("malformed JSON body")]
    MalformedJson,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
