//! Tokenizer Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.
//!
//! Malformed markup never raises: the tokenizer degrades to partial data.
//! The only failure surfaced here is the byte stream itself dying under us.

use derive_more::{Display, Error};

/// A tokenizer error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the body stream failed mid-pass. The collected bag is
    /// incomplete and discarded; re-fetch if the resource matters.
    #[display("body stream failed during tokenization")]
    Read,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Read)
    }
}
