//! # lettersync-remote
//!
//! The boundary to the remote template service: the [`TemplateStore`] and
//! [`RenderHarness`] traits the sync engine is written against, and the
//! HTTP-backed [`HttpRemote`] that implements both over one shared session.
//!
//! Every trait method takes `&mut self`: the remote side is a single stateful
//! connection, and exclusive borrows make issuing two calls against it at
//! once a compile error rather than a runtime hazard.

pub mod error;
pub mod http;

use lettersync_core::types::{LanguageCode, LetterPath, RemoteEntry};

pub use error::RemoteError;
pub use http::HttpRemote;

/// A captured render result, as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    /// File extension derived from the response content type (`png`, `pdf`, …).
    pub extension: String,
}

/// The remote template collection.
///
/// Implementations issue logical operations only; how they reach the service
/// (HTTP, a recorded fixture, an in-memory map in tests) is their business.
pub trait TemplateStore {
    /// Describe every entry in the remote collection. Order is stable for
    /// display purposes but carries no meaning.
    fn list(&mut self) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Fetch the current content of one entry.
    fn fetch(&mut self, path: &LetterPath) -> Result<String, RemoteError>;

    /// Overwrite (or create) one entry.
    ///
    /// A `Rejected` error means the service refused the content; the entry is
    /// unchanged on the remote side.
    fn put(&mut self, path: &LetterPath, content: &str) -> Result<(), RemoteError>;
}

/// The remote render-and-capture capability used by the `test` command.
///
/// Stateless across calls; no caching of prior renders is implied.
pub trait RenderHarness {
    /// Upload `document` and capture the rendered output in `language`.
    ///
    /// `document_name` identifies the source document in error reports.
    fn render(
        &mut self,
        document_name: &str,
        document: &str,
        language: &LanguageCode,
    ) -> Result<RenderedArtifact, RemoteError>;
}
