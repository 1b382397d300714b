//! Error types for vbsync-content

/// Result type for vbsync-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vbsync-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown encoding label: {label}")]
    UnknownEncoding { label: String },

    #[error("Encoding {name} is not a single-byte encoding")]
    NotSingleByte { name: String },
}
