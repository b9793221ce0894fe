// Error taxonomy shared across the crate.
//
// Validation errors (pattern, argument) are raised synchronously at
// construction time and never deferred into a lazy sequence. I/O errors
// surface from whichever scan or probe step issued the read, so callers
// can distinguish "exhausted" from "failed".

use std::io;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Delimiter construction was given an empty or malformed pattern.
    #[error("invalid delimiter pattern: {0}")]
    InvalidPattern(String),

    /// A non-positive chunk count, inverted range, or similar bad input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The resource could not be opened at all.
    #[error("cannot open resource `{path}`: {source}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A positioned read failed at the storage layer.
    #[error("positioned read failed at offset {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}
