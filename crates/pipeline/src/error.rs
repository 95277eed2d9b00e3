//! Pipeline Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.
//!
//! Only primary failures live here: auxiliary fetches, binary-metadata
//! extraction, and embedded JSON-LD all degrade locally and never raise.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport could not produce a response stream at all.
    #[display("transport failed to fetch the resource")]
    Transport,
    /// The resource answered outside the 2xx range. No snippet is fabricated.
    #[display("resource answered HTTP {_0}")]
    HttpStatus(#[error(not(source))] u16),
    /// The body stream died while the sole HTML consumer was mid-pass.
    #[display("tokenization of the primary HTML branch failed")]
    Tokenize,
    /// A plugin dispatched its continuation more than once. A contract
    /// violation in the plugin, never the input; fix the plugin.
    #[display("extractor dispatched its continuation twice")]
    DoubleDispatch,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Transport | ErrorKind::Tokenize => true,
            ErrorKind::HttpStatus(status) => *status == 429 || *status >= 500,
            ErrorKind::DoubleDispatch => false,
        }
    }
}
