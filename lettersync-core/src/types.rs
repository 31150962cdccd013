//! Domain types shared across the lettersync crates.
//!
//! Relative letter paths, fingerprints, and language codes are String
//! newtypes so they cannot be mixed up at call sites. All of them serialize
//! transparently as plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A letter template path relative to the tracked root, using `/` separators.
/// The stable identity of a tracked entry for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterPath(pub String);

impl fmt::Display for LetterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LetterPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LetterPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Lowercase SHA-256 hex digest of a file's line-ending-normalized content.
///
/// Local and remote fingerprints use the same digest function, so equality
/// across sides is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Fingerprint {
    /// First 12 hex chars, for compact display in reports.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

/// A two-letter (or locale-qualified) language code, e.g. `en` or `nb_NO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(pub String);

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LanguageCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LanguageCode {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote listing entry
// ---------------------------------------------------------------------------

/// One entry in the remote template collection, as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub path: LetterPath,
    /// Content fingerprint as currently stored remotely.
    #[serde(rename = "checksum")]
    pub fingerprint: Fingerprint,
    /// Vendor-shipped content, never customized on the remote side.
    #[serde(rename = "default")]
    pub is_default: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
