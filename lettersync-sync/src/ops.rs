//! Pull / push orchestration over the three stores.
//!
//! Every operation reads live state from both sides, classifies each entry
//! against the status ledger, applies the decided action, and records the
//! new fingerprint in the ledger immediately after each successful apply
//! (apply, record, continue — never batch-then-record-at-the-end). A fatal
//! session error aborts the remaining batch; everything already recorded
//! stays recorded.

use std::collections::HashMap;

use lettersync_core::types::{Fingerprint, LetterPath, RemoteEntry};
use lettersync_remote::{RemoteError, TemplateStore};

use crate::error::SyncError;
use crate::ledger::StatusLedger;
use crate::repo::LocalRepository;
use crate::state::{classify, EntryState};

// ---------------------------------------------------------------------------
// Per-entry outcomes
// ---------------------------------------------------------------------------

/// Outcome of one entry during a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Remote content was fetched and written locally.
    Fetched { path: LetterPath },
    /// Nothing to do.
    Unchanged { path: LetterPath },
    /// The entry is locally edited; pull leaves it for a later push.
    LocalEdit { path: LetterPath },
    /// Both sides diverged; nothing was touched. `local` is `None` when the
    /// file was deleted locally.
    Conflict {
        path: LetterPath,
        local: Option<Fingerprint>,
        remote: Fingerprint,
    },
    /// The entry failed on its own; the rest of the batch continued.
    Failed { path: LetterPath, reason: String },
}

/// Outcome of one entry during a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Local content was uploaded and recorded.
    Pushed { path: LetterPath },
    /// Already in sync; no remote write was issued.
    Unchanged { path: LetterPath },
    /// Only the remote side moved; a pull is required before pushing.
    RemoteAhead {
        path: LetterPath,
        local: Fingerprint,
        remote: Fingerprint,
    },
    /// Both sides diverged; refused without touching anything.
    Conflict {
        path: LetterPath,
        local: Fingerprint,
        remote: Fingerprint,
    },
    /// The remote service refused the content; the ledger was not advanced.
    Rejected { path: LetterPath, reason: String },
    /// The selected path does not exist locally.
    MissingLocal { path: LetterPath },
    /// The entry failed on its own; the rest of the batch continued.
    Failed { path: LetterPath, reason: String },
}

/// Result of a pull over the whole remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub outcomes: Vec<PullOutcome>,
}

impl PullReport {
    pub fn fetched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PullOutcome::Fetched { .. }))
            .count()
    }

    pub fn conflicts(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PullOutcome::Conflict { .. }))
            .count()
    }
}

/// Result of a push over an explicit selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub outcomes: Vec<PushOutcome>,
}

impl PushReport {
    pub fn pushed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PushOutcome::Pushed { .. }))
            .count()
    }

    pub fn refused(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    PushOutcome::Conflict { .. } | PushOutcome::RemoteAhead { .. }
                )
            })
            .count()
    }
}

// ---------------------------------------------------------------------------
// pull / pull_defaults
// ---------------------------------------------------------------------------

/// Pull remote edits for every entry that is *not* a vendor default.
///
/// Conflicted entries are reported and skipped; entries that exist only
/// locally are never touched — pull never deletes.
pub fn pull(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    ledger: &mut StatusLedger,
) -> Result<PullReport, SyncError> {
    pull_subset(store, repo, ledger, false)
}

/// Same algorithm as [`pull`], restricted to vendor-default entries, so
/// shipped boilerplate can be refreshed without disturbing customized
/// letters.
pub fn pull_defaults(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    ledger: &mut StatusLedger,
) -> Result<PullReport, SyncError> {
    pull_subset(store, repo, ledger, true)
}

fn pull_subset(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    ledger: &mut StatusLedger,
    defaults_only: bool,
) -> Result<PullReport, SyncError> {
    let entries = store.list()?;
    let mut outcomes = Vec::new();

    for entry in entries
        .into_iter()
        .filter(|e| e.is_default == defaults_only)
    {
        let local = match repo.fingerprint_of(&entry.path) {
            Ok(fp) => fp,
            Err(err) => {
                outcomes.push(PullOutcome::Failed {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let recorded = ledger.get(&entry.path).cloned();

        match classify(local.as_ref(), Some(&entry.fingerprint), recorded.as_ref()) {
            EntryState::Unchanged => {
                if recorded.as_ref() != Some(&entry.fingerprint) {
                    // Both sides already agree; the ledger just never heard.
                    ledger.set(entry.path.clone(), entry.fingerprint.clone());
                    ledger.save()?;
                }
                outcomes.push(PullOutcome::Unchanged { path: entry.path });
            }
            EntryState::RemotelyModified | EntryState::NewRemote => {
                match fetch_into_repo(store, repo, &entry) {
                    Ok(()) => {
                        ledger.set(entry.path.clone(), entry.fingerprint.clone());
                        ledger.save()?;
                        tracing::info!("pulled {}", entry.path);
                        outcomes.push(PullOutcome::Fetched { path: entry.path });
                    }
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => outcomes.push(PullOutcome::Failed {
                        path: entry.path,
                        reason: err.to_string(),
                    }),
                }
            }
            EntryState::LocallyModified => {
                outcomes.push(PullOutcome::LocalEdit { path: entry.path });
            }
            EntryState::Conflicted => {
                tracing::warn!("conflict on {}", entry.path);
                outcomes.push(PullOutcome::Conflict {
                    path: entry.path,
                    local,
                    remote: entry.fingerprint,
                });
            }
            // The listing always carries a remote fingerprint.
            EntryState::LocalOnly => unreachable!("listed entry has a remote side"),
        }
    }

    Ok(PullReport { outcomes })
}

fn fetch_into_repo(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    entry: &RemoteEntry,
) -> Result<(), SyncError> {
    let content = store.fetch(&entry.path)?;
    repo.write(&entry.path, &content)
}

// ---------------------------------------------------------------------------
// push
// ---------------------------------------------------------------------------

/// Push local edits for an explicit, already-resolved selection of paths.
///
/// A conflicted entry and an entry whose remote side moved on its own are
/// both refused: a remote change the user has not seen is never silently
/// overwritten. The operation is idempotent for entries already in sync.
pub fn push(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    ledger: &mut StatusLedger,
    selected: &[LetterPath],
) -> Result<PushReport, SyncError> {
    let listing = store.list()?;
    let remote_by_path: HashMap<&LetterPath, &RemoteEntry> =
        listing.iter().map(|e| (&e.path, e)).collect();
    let mut outcomes = Vec::new();

    for path in selected {
        let local = match repo.fingerprint_of(path) {
            Ok(fp) => fp,
            Err(err) => {
                outcomes.push(PushOutcome::Failed {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let Some(local_fp) = local else {
            outcomes.push(PushOutcome::MissingLocal { path: path.clone() });
            continue;
        };
        let remote_fp = remote_by_path.get(path).map(|e| e.fingerprint.clone());
        let recorded = ledger.get(path).cloned();

        let wants_upload = match remote_fp {
            // No remote counterpart yet: creation is a plain upload.
            None => true,
            Some(remote) => {
                match classify(Some(&local_fp), Some(&remote), recorded.as_ref()) {
                    EntryState::LocallyModified => true,
                    EntryState::Unchanged => {
                        if recorded.as_ref() != Some(&local_fp) {
                            ledger.set(path.clone(), local_fp.clone());
                            ledger.save()?;
                        }
                        outcomes.push(PushOutcome::Unchanged { path: path.clone() });
                        false
                    }
                    EntryState::RemotelyModified => {
                        outcomes.push(PushOutcome::RemoteAhead {
                            path: path.clone(),
                            local: local_fp.clone(),
                            remote,
                        });
                        false
                    }
                    EntryState::Conflicted => {
                        tracing::warn!("conflict on {path}");
                        outcomes.push(PushOutcome::Conflict {
                            path: path.clone(),
                            local: local_fp.clone(),
                            remote,
                        });
                        false
                    }
                    // Both need an absent local file, ruled out above.
                    EntryState::NewRemote | EntryState::LocalOnly => false,
                }
            }
        };
        if !wants_upload {
            continue;
        }

        let content = match repo.read(path) {
            Ok(content) => content,
            Err(err) => {
                outcomes.push(PushOutcome::Failed {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        match store.put(path, &content) {
            Ok(()) => {
                ledger.set(path.clone(), local_fp);
                ledger.save()?;
                tracing::info!("pushed {path}");
                outcomes.push(PushOutcome::Pushed { path: path.clone() });
            }
            Err(RemoteError::Rejected { reason, .. }) => {
                outcomes.push(PushOutcome::Rejected {
                    path: path.clone(),
                    reason,
                });
            }
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => outcomes.push(PushOutcome::Failed {
                path: path.clone(),
                reason: err.to_string(),
            }),
        }
    }

    Ok(PushReport { outcomes })
}

/// Paths a push with an empty selection would offer to upload: everything
/// locally edited or not yet present remotely. Used by the interactive
/// selection in the shell.
pub fn push_candidates(
    store: &mut dyn TemplateStore,
    repo: &LocalRepository,
    ledger: &StatusLedger,
) -> Result<Vec<LetterPath>, SyncError> {
    let listing = store.list()?;
    let remote_by_path: HashMap<&LetterPath, &Fingerprint> =
        listing.iter().map(|e| (&e.path, &e.fingerprint)).collect();

    let mut candidates = Vec::new();
    for path in repo.list()? {
        let local = repo.fingerprint_of(&path)?;
        let state = classify(
            local.as_ref(),
            remote_by_path.get(&path).copied(),
            ledger.get(&path),
        );
        if matches!(state, EntryState::LocallyModified | EntryState::LocalOnly) {
            candidates.push(path);
        }
    }
    Ok(candidates)
}
