// Error types for tag reading and writing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    /// The leading marker (`TAG` or `ID3`) is absent
    #[error("{0} tag not found")]
    FormatNotFound(&'static str),

    /// Fewer bytes were available than requested
    #[error("short read: wanted {expected} bytes, got {actual}")]
    TruncatedRead { expected: usize, actual: usize },

    /// An assembled ID3v1 buffer is not exactly 128 bytes
    #[error("ID3v1 tag is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An operation was attempted on a tag that cannot support it
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// Whether this error only means the tag generation is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, TagError::FormatNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TagError>;
