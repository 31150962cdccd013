//! Error types for lettersync-remote.

use lettersync_core::types::{LanguageCode, LetterPath};
use thiserror::Error;

/// All errors that can arise from remote template store and render calls.
///
/// The per-entry kinds (`NotFound`, `Rejected`, `RenderFailed`) fail a single
/// entry or render pair; the fatal kinds (`Session`, `Protocol`) mean the
/// shared session can no longer be trusted and the remaining batch must be
/// abandoned.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote entry does not exist.
    #[error("remote entry not found: {path}")]
    NotFound { path: LetterPath },

    /// The remote service refused the uploaded content (validation failure).
    #[error("remote rejected {path}: {reason}")]
    Rejected { path: LetterPath, reason: String },

    /// A render request was refused or timed out.
    #[error("render failed for {document} ({language}): {reason}")]
    RenderFailed {
        document: String,
        language: LanguageCode,
        reason: String,
    },

    /// The session is unusable (connection lost, endpoint unreachable).
    #[error("remote session unusable: {0}")]
    Session(String),

    /// The service answered with something outside its interface contract.
    #[error("unexpected remote response (HTTP {status}): {body}")]
    Protocol { status: u16, body: String },
}

impl RemoteError {
    /// Whether the error invalidates the session for the rest of the batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RemoteError::Session(_) | RemoteError::Protocol { .. })
    }
}
