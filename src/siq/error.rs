//! Custom error types for the siq-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum SiqError {
    /// An error originating from I/O operations (opening the archive,
    /// extracting an entry to disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive exists but is not a readable zip container.
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A required or requested entry is absent from the archive.
    #[error("entry {0:?} not found in archive")]
    MissingEntry(String),

    /// The payload is not well-formed XML, or does not match the expected
    /// root shape for the detected schema generation.
    #[error("malformed content.xml: {0}")]
    Decode(#[from] quick_xml::DeError),

    /// The payload is not valid UTF-8.
    #[error("content.xml is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// A reference token did not resolve against the package's global table.
    /// Carries the original token so callers can fall back to displaying it
    /// verbatim.
    #[error("reference {token:?} not found")]
    ReferenceNotFound { token: String },
}

/// A convenience `Result` type alias using the crate's `SiqError` type.
pub type Result<T> = std::result::Result<T, SiqError>;
