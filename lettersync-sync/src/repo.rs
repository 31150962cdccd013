//! Local letter repository — the tracked file tree on disk.
//!
//! Fingerprints are SHA-256 hex digests of line-ending-normalized content, so
//! they depend on bytes only, never on timestamps or permissions, and CRLF
//! checkouts hash the same as LF ones.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use lettersync_core::types::{Fingerprint, LetterPath};

use crate::error::{io_err, SyncError};

/// Compute the fingerprint of in-memory content.
pub fn fingerprint(content: &str) -> Fingerprint {
    let normalized = content.replace("\r\n", "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    Fingerprint(hex::encode(hasher.finalize()))
}

/// The tracked letter tree rooted at a fixed directory (`xsl/letters` by
/// convention).
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalRepository { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path for a tracked letter.
    pub fn abs_path(&self, letter: &LetterPath) -> PathBuf {
        self.root.join(Path::new(&letter.0))
    }

    /// Every tracked file under the root, recursively, as sorted relative
    /// paths with `/` separators. A missing root is an empty tree (fresh
    /// checkout before the first pull), not an error.
    pub fn list(&self) -> Result<Vec<LetterPath>, SyncError> {
        let mut paths = Vec::new();
        if self.root.exists() {
            collect_files(&self.root, &self.root, &mut paths)?;
        }
        paths.sort();
        Ok(paths)
    }

    /// Fingerprint of the file currently on disk, or `None` if it is absent.
    pub fn fingerprint_of(&self, letter: &LetterPath) -> Result<Option<Fingerprint>, SyncError> {
        let path = self.abs_path(letter);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(fingerprint(&content))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(&path, err)),
        }
    }

    /// Read a tracked file, failing with `NotFound` when it does not exist.
    pub fn read(&self, letter: &LetterPath) -> Result<String, SyncError> {
        let path = self.abs_path(letter);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(SyncError::NotFound {
                path: letter.clone(),
            }),
            Err(err) => Err(io_err(&path, err)),
        }
    }

    /// Write a tracked file atomically, creating parent directories as
    /// needed: write to `<path>.lettersync.tmp`, then rename. Line endings
    /// are normalized to LF before writing so disk content matches what was
    /// fingerprinted.
    pub fn write(&self, letter: &LetterPath, content: &str) -> Result<(), SyncError> {
        let path = self.abs_path(letter);
        let normalized = content.replace("\r\n", "\n");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        let tmp = PathBuf::from(format!("{}.lettersync.tmp", path.display()));
        std::fs::write(&tmp, &normalized).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&path, e));
        }
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<LetterPath>) -> Result<(), SyncError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_files(root, &path, out)?;
        } else if meta.is_file() {
            let rel = path.strip_prefix(root).unwrap_or(path.as_path());
            let rel = rel.to_string_lossy().replace('\\', "/");
            out.push(LetterPath(rel));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
