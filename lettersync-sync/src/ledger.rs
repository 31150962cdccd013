//! Status ledger — the last-synchronized fingerprint of every tracked letter.
//!
//! Persists a JSON document (default `status.json` in the working directory).
//! Writes use an atomic `.tmp` + rename pattern. A missing file is an empty
//! ledger, not an error: a fresh checkout simply has no history yet.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lettersync_core::types::{Fingerprint, LetterPath};

use crate::error::{io_err, SyncError};

/// In-memory ledger with its backing file path.
///
/// Mutations stay in memory until [`StatusLedger::save`] is called; the
/// orchestration layer saves after every successfully applied entry, so an
/// aborted batch never loses applies that were already recorded.
#[derive(Debug, Clone, Serialize)]
pub struct StatusLedger {
    #[serde(skip)]
    path: PathBuf,
    pub synced_at: DateTime<Utc>,
    entries: HashMap<LetterPath, Fingerprint>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LedgerCompat {
    Structured(LedgerStructuredCompat),
    Legacy(HashMap<LetterPath, Fingerprint>),
}

#[derive(Debug, Deserialize)]
struct LedgerStructuredCompat {
    synced_at: Option<DateTime<Utc>>,
    entries: HashMap<LetterPath, Fingerprint>,
}

impl StatusLedger {
    /// Load the ledger from `path`, or start empty if the file does not exist.
    ///
    /// Accepts both the current `{synced_at, entries}` shape and the legacy
    /// flat `{path: fingerprint}` map written by early releases.
    pub fn load(path: &Path) -> Result<StatusLedger, SyncError> {
        if !path.exists() {
            return Ok(StatusLedger {
                path: path.to_path_buf(),
                synced_at: Utc::now(),
                entries: HashMap::new(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        if contents.trim().is_empty() {
            // An empty file is no history, same as a missing one.
            return Ok(StatusLedger {
                path: path.to_path_buf(),
                synced_at: Utc::now(),
                entries: HashMap::new(),
            });
        }
        let (synced_at, entries) = match serde_json::from_str::<LedgerCompat>(&contents)? {
            LedgerCompat::Structured(ledger) => {
                (ledger.synced_at.unwrap_or_else(Utc::now), ledger.entries)
            }
            LedgerCompat::Legacy(entries) => (Utc::now(), entries),
        };
        Ok(StatusLedger {
            path: path.to_path_buf(),
            synced_at,
            entries,
        })
    }

    /// Save the full mapping atomically: write `<path>.tmp`, then rename.
    ///
    /// Refreshes `synced_at` to the moment of the save.
    pub fn save(&mut self) -> Result<(), SyncError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            }
        }
        self.synced_at = Utc::now();
        let json = serde_json::to_string_pretty(self)?;
        let tmp = PathBuf::from(format!("{}.tmp", self.path.display()));
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, e));
        }
        tracing::debug!("saved status ledger ({} entries)", self.entries.len());
        Ok(())
    }

    pub fn get(&self, path: &LetterPath) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    pub fn set(&mut self, path: LetterPath, fingerprint: Fingerprint) {
        self.entries.insert(path, fingerprint);
    }

    pub fn remove(&mut self, path: &LetterPath) -> Option<Fingerprint> {
        self.entries.remove(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_ledger_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let ledger = StatusLedger::load(&tmp.path().join("status.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("status.json");
        let mut ledger = StatusLedger::load(&path).unwrap();
        ledger.set(LetterPath::from("overdue.xsl"), Fingerprint::from("deadbeef"));
        ledger.set(LetterPath::from("footer.xsl"), Fingerprint::from("cafebabe"));
        ledger.save().unwrap();

        let loaded = StatusLedger::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get(&LetterPath::from("overdue.xsl")),
            Some(&Fingerprint::from("deadbeef"))
        );
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("status.json");
        let mut ledger = StatusLedger::load(&path).unwrap();
        ledger.save().unwrap();
        assert!(
            !tmp.path().join("status.json.tmp").exists(),
            "tmp file should be removed after atomic rename"
        );
    }

    #[test]
    fn empty_file_is_no_history() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("status.json");
        std::fs::write(&path, "").unwrap();
        let ledger = StatusLedger::load(&path).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn load_legacy_flat_map() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("status.json");
        std::fs::write(
            &path,
            r#"{"overdue.xsl":"deadbeef","footer.xsl":"cafebabe"}"#,
        )
        .unwrap();

        let ledger = StatusLedger::load(&path).unwrap();
        assert_eq!(
            ledger.get(&LetterPath::from("overdue.xsl")),
            Some(&Fingerprint::from("deadbeef"))
        );
        assert_eq!(
            ledger.get(&LetterPath::from("footer.xsl")),
            Some(&Fingerprint::from("cafebabe"))
        );
    }

    #[test]
    fn load_structured_without_synced_at() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("status.json");
        std::fs::write(&path, r#"{"entries":{"overdue.xsl":"deadbeef"}}"#).unwrap();

        let before = Utc::now();
        let ledger = StatusLedger::load(&path).unwrap();
        let after = Utc::now();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.synced_at >= before && ledger.synced_at <= after);
    }

    #[test]
    fn remove_drops_entry() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = StatusLedger::load(&tmp.path().join("status.json")).unwrap();
        ledger.set(LetterPath::from("a.xsl"), Fingerprint::from("aa"));
        assert_eq!(ledger.remove(&LetterPath::from("a.xsl")), Some(Fingerprint::from("aa")));
        assert!(ledger.get(&LetterPath::from("a.xsl")).is_none());
    }

    #[test]
    fn save_refreshes_synced_at() {
        let tmp = TempDir::new().unwrap();
        let mut ledger = StatusLedger::load(&tmp.path().join("status.json")).unwrap();
        let initial = ledger.synced_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        ledger.save().unwrap();
        assert!(ledger.synced_at > initial);
    }
}
