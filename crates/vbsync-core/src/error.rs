//! Error types for vbsync-core

use std::path::PathBuf;

/// Result type for vbsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vbsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host is unreachable or the session was lost
    #[error("Cannot reach the host: {message}")]
    Connection { message: String },

    /// The host refused programmatic access to its code project
    #[error("Access to the code project was refused: {message}\n  hint: {hint}")]
    Permission { message: String, hint: String },

    /// A local path does not map to any component
    #[error("No component maps to {path}")]
    ComponentNotFound { path: PathBuf },

    /// A document folder with no matching open document
    #[error("No open document uses the folder '{folder}'")]
    UnknownDocument { folder: String },

    /// The user cancelled the export of a document
    #[error("Export of {document} was cancelled")]
    ConflictCancelled { document: String },

    /// The host rejected an import
    #[error("Import of {name} failed: {reason}")]
    ImportFailure { name: String, reason: String },

    /// Any other failure reported by the host
    #[error("Host error: {message}")]
    Host { message: String },

    /// Invalid settings
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from vbsync-fs
    #[error(transparent)]
    Fs(#[from] vbsync_fs::Error),

    /// Content error from vbsync-content
    #[error(transparent)]
    Content(#[from] vbsync_content::Error),

    /// File watcher error
    #[error(transparent)]
    Watch(#[from] notify::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Connection-level errors abort the whole command; everything else is
    /// isolated to the component or document it happened in.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Permission { .. })
    }

    pub(crate) fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}
