//! # lettersync-sync
//!
//! The synchronization engine: status ledger, local repository, per-entry
//! state classification, and the pull / push / test orchestration.
//!
//! Call [`pull`] or [`pull_defaults`] to bring remote edits down, [`push`]
//! to upload an explicit selection of local edits, and [`run_tests`] to
//! render sample documents and capture the output per language.

pub mod error;
pub mod ledger;
pub mod ops;
pub mod repo;
pub mod state;
pub mod testrun;

pub use error::SyncError;
pub use ledger::StatusLedger;
pub use ops::{
    pull, pull_defaults, push, push_candidates, PullOutcome, PullReport, PushOutcome, PushReport,
};
pub use repo::{fingerprint, LocalRepository};
pub use state::{classify, EntryState};
pub use testrun::{run_tests, TestOutcome};
