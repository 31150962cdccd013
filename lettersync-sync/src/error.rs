//! Error types for lettersync-sync.

use std::path::PathBuf;

use thiserror::Error;

use lettersync_core::types::LetterPath;
use lettersync_remote::RemoteError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the remote template service.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local file was expected but does not exist.
    #[error("local file not found: {path}")]
    NotFound { path: LetterPath },

    /// JSON serialization/deserialization error (status ledger).
    #[error("status ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Whether this error invalidates the remote session, so the remaining
    /// batch must be abandoned rather than continued entry by entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Remote(err) if err.is_fatal())
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
