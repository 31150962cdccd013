//! Derived per-entry sync state.
//!
//! Divergence between the recorded (ledger) fingerprint and either live
//! fingerprint is the sole classification signal. States are computed on
//! demand and never stored.

use lettersync_core::types::Fingerprint;

/// Sync state of one tracked entry, derived from its three fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Local and remote agree (ledger may still need recording).
    Unchanged,
    /// Local diverged from the ledger; remote still matches it. Includes a
    /// locally deleted file.
    LocallyModified,
    /// Remote diverged from the ledger; local still matches it.
    RemotelyModified,
    /// Both sides diverged from the ledger and disagree with each other.
    /// Requires manual resolution; nothing may be overwritten.
    Conflicted,
    /// Remote entry with no history and no local counterpart yet.
    NewRemote,
    /// Local file with no remote counterpart.
    LocalOnly,
}

/// Classify an entry from its local, remote, and recorded fingerprints.
///
/// `None` means "absent" and is a distinct value for comparison purposes: a
/// locally deleted file diverges from a recorded fingerprint exactly like an
/// edited one.
pub fn classify(
    local: Option<&Fingerprint>,
    remote: Option<&Fingerprint>,
    recorded: Option<&Fingerprint>,
) -> EntryState {
    let Some(remote) = remote else {
        return EntryState::LocalOnly;
    };

    if local == recorded {
        // The local side is exactly where the last sync left it.
        return match recorded {
            None => EntryState::NewRemote,
            Some(rec) if rec == remote => EntryState::Unchanged,
            Some(_) => EntryState::RemotelyModified,
        };
    }

    // Local diverged from the record (or there is no record for an existing
    // local file).
    if recorded == Some(remote) {
        EntryState::LocallyModified
    } else if local == Some(remote) {
        // Both sides hold the same content; only the record is behind.
        EntryState::Unchanged
    } else {
        EntryState::Conflicted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
