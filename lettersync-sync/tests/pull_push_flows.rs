//! End-to-end pull/push flows against an in-memory template store.

use std::collections::{BTreeMap, HashSet};
use std::fs;

use tempfile::TempDir;

use lettersync_core::types::{LetterPath, RemoteEntry};
use lettersync_remote::{RemoteError, TemplateStore};
use lettersync_sync::{
    fingerprint, pull, pull_defaults, push, push_candidates, LocalRepository, PullOutcome,
    PushOutcome, StatusLedger,
};

/// In-memory stand-in for the remote template collection. BTreeMap keeps the
/// listing order deterministic.
#[derive(Default)]
struct MemoryStore {
    letters: BTreeMap<LetterPath, (String, bool)>,
    rejects: HashSet<LetterPath>,
    fail_fetches_after: Option<usize>,
    fetches: usize,
    puts: usize,
}

impl MemoryStore {
    fn insert(&mut self, path: &str, content: &str, is_default: bool) {
        self.letters
            .insert(LetterPath::from(path), (content.to_string(), is_default));
    }

    fn content(&self, path: &str) -> Option<String> {
        self.letters
            .get(&LetterPath::from(path))
            .map(|(content, _)| content.clone())
    }
}

impl TemplateStore for MemoryStore {
    fn list(&mut self) -> Result<Vec<RemoteEntry>, RemoteError> {
        Ok(self
            .letters
            .iter()
            .map(|(path, (content, is_default))| RemoteEntry {
                path: path.clone(),
                fingerprint: fingerprint(content),
                is_default: *is_default,
            })
            .collect())
    }

    fn fetch(&mut self, path: &LetterPath) -> Result<String, RemoteError> {
        if let Some(limit) = self.fail_fetches_after {
            if self.fetches >= limit {
                return Err(RemoteError::Session("connection reset".into()));
            }
        }
        self.fetches += 1;
        self.letters
            .get(path)
            .map(|(content, _)| content.clone())
            .ok_or_else(|| RemoteError::NotFound { path: path.clone() })
    }

    fn put(&mut self, path: &LetterPath, content: &str) -> Result<(), RemoteError> {
        if self.rejects.contains(path) {
            return Err(RemoteError::Rejected {
                path: path.clone(),
                reason: "validation failed".into(),
            });
        }
        self.puts += 1;
        let is_default = self
            .letters
            .get(path)
            .map(|(_, is_default)| *is_default)
            .unwrap_or(false);
        self.letters
            .insert(path.clone(), (content.to_string(), is_default));
        Ok(())
    }
}

fn setup() -> (TempDir, LocalRepository, StatusLedger) {
    let tmp = TempDir::new().expect("tempdir");
    let repo = LocalRepository::new(tmp.path().join("xsl").join("letters"));
    let ledger = StatusLedger::load(&tmp.path().join("status.json")).expect("ledger");
    (tmp, repo, ledger)
}

#[test]
fn pull_fetches_new_remote_entries_and_records_them() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "<xsl>overdue</xsl>\n", false);
    store.insert("sms/pickup.xsl", "<xsl>pickup</xsl>\n", false);
    store.insert("footer.xsl", "<xsl>footer</xsl>\n", true);

    let report = pull(&mut store, &repo, &mut ledger).expect("pull");
    assert_eq!(report.fetched(), 2);

    assert_eq!(
        repo.read(&LetterPath::from("overdue.xsl")).unwrap(),
        "<xsl>overdue</xsl>\n"
    );
    assert_eq!(
        ledger.get(&LetterPath::from("sms/pickup.xsl")),
        Some(&fingerprint("<xsl>pickup</xsl>\n"))
    );
    // Vendor defaults are not pull's business.
    assert!(!repo.abs_path(&LetterPath::from("footer.xsl")).exists());
    assert!(ledger.get(&LetterPath::from("footer.xsl")).is_none());
}

#[test]
fn second_pull_is_a_no_op() {
    let (tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "<xsl/>\n", false);
    pull(&mut store, &repo, &mut ledger).expect("first pull");

    let fetches_before = store.fetches;
    let ledger_bytes_before = fs::read_to_string(tmp.path().join("status.json")).expect("read");

    let report = pull(&mut store, &repo, &mut ledger).expect("second pull");
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o, PullOutcome::Unchanged { .. })));
    assert_eq!(store.fetches, fetches_before, "no content refetched");
    let ledger_bytes_after = fs::read_to_string(tmp.path().join("status.json")).expect("read");
    assert_eq!(
        ledger_bytes_after, ledger_bytes_before,
        "ledger must not be rewritten on a no-op pull"
    );
}

#[test]
fn pull_converges_on_remote_only_change() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    store.insert("overdue.xsl", "v2\n", false);
    let report = pull(&mut store, &repo, &mut ledger).expect("pull");

    let path = LetterPath::from("overdue.xsl");
    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PullOutcome::Fetched { path: p } if *p == path)));
    assert_eq!(repo.read(&path).unwrap(), "v2\n");
    assert_eq!(ledger.get(&path), Some(&fingerprint("v2\n")));
}

#[test]
fn pull_leaves_locally_edited_entry_alone() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    let path = LetterPath::from("overdue.xsl");
    repo.write(&path, "local edit\n").unwrap();

    let report = pull(&mut store, &repo, &mut ledger).expect("pull");
    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PullOutcome::LocalEdit { path: p } if *p == path)));
    assert_eq!(repo.read(&path).unwrap(), "local edit\n");
    assert_eq!(ledger.get(&path), Some(&fingerprint("v1\n")));
}

#[test]
fn conflict_is_reported_and_nothing_moves() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    let path = LetterPath::from("overdue.xsl");
    repo.write(&path, "local v2\n").unwrap();
    store.insert("overdue.xsl", "remote v2\n", false);

    let pull_report = pull(&mut store, &repo, &mut ledger).expect("pull");
    let conflict = pull_report
        .outcomes
        .iter()
        .find(|o| matches!(o, PullOutcome::Conflict { .. }))
        .expect("conflict outcome");
    match conflict {
        PullOutcome::Conflict {
            path: p,
            local,
            remote,
        } => {
            assert_eq!(*p, path);
            assert_eq!(local.as_ref(), Some(&fingerprint("local v2\n")));
            assert_eq!(remote, &fingerprint("remote v2\n"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let push_report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("push");
    assert!(push_report
        .outcomes
        .iter()
        .any(|o| matches!(o, PushOutcome::Conflict { .. })));

    // Ledger, local content, and remote content are all untouched.
    assert_eq!(ledger.get(&path), Some(&fingerprint("v1\n")));
    assert_eq!(repo.read(&path).unwrap(), "local v2\n");
    assert_eq!(store.content("overdue.xsl").unwrap(), "remote v2\n");
    assert_eq!(store.puts, 0);
}

#[test]
fn pull_never_deletes_local_only_files() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);

    let local_only = LetterPath::from("scratch.xsl");
    repo.write(&local_only, "work in progress\n").unwrap();

    let report = pull(&mut store, &repo, &mut ledger).expect("pull");
    assert!(repo.abs_path(&local_only).exists());
    assert!(!report
        .outcomes
        .iter()
        .any(|o| matches!(o, PullOutcome::Fetched { path } if *path == local_only)));
}

#[test]
fn pull_defaults_never_touches_customized_entries() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("footer.xsl", "default v1\n", true);
    store.insert("overdue.xsl", "custom v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed custom");
    pull_defaults(&mut store, &repo, &mut ledger).expect("seed defaults");

    // Both sides move remotely; only the default may follow.
    store.insert("footer.xsl", "default v2\n", true);
    store.insert("overdue.xsl", "custom v2\n", false);

    let report = pull_defaults(&mut store, &repo, &mut ledger).expect("pull defaults");
    assert_eq!(report.fetched(), 1);
    assert_eq!(
        repo.read(&LetterPath::from("footer.xsl")).unwrap(),
        "default v2\n"
    );
    assert_eq!(
        repo.read(&LetterPath::from("overdue.xsl")).unwrap(),
        "custom v1\n",
        "pull-defaults must not modify non-default entries"
    );
    assert_eq!(
        ledger.get(&LetterPath::from("overdue.xsl")),
        Some(&fingerprint("custom v1\n"))
    );
}

#[test]
fn push_converges_on_local_only_change() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    let path = LetterPath::from("overdue.xsl");
    repo.write(&path, "v2 local\n").unwrap();

    let report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("push");
    assert_eq!(report.pushed(), 1);
    assert_eq!(store.content("overdue.xsl").unwrap(), "v2 local\n");
    assert_eq!(ledger.get(&path), Some(&fingerprint("v2 local\n")));
}

#[test]
fn repeat_push_issues_no_remote_write() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    let path = LetterPath::from("overdue.xsl");
    repo.write(&path, "v2\n").unwrap();
    push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("first push");
    assert_eq!(store.puts, 1);

    let report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("second push");
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o, PushOutcome::Unchanged { .. })));
    assert_eq!(store.puts, 1, "no repeat upload for unchanged content");
}

#[test]
fn push_creates_entry_missing_remotely() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();

    let path = LetterPath::from("brand-new.xsl");
    repo.write(&path, "fresh\n").unwrap();

    let report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("push");
    assert_eq!(report.pushed(), 1);
    assert_eq!(store.content("brand-new.xsl").unwrap(), "fresh\n");
    assert_eq!(ledger.get(&path), Some(&fingerprint("fresh\n")));
}

#[test]
fn push_refuses_when_only_remote_moved() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    store.insert("overdue.xsl", "remote v2\n", false);

    let path = LetterPath::from("overdue.xsl");
    let report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("push");
    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PushOutcome::RemoteAhead { .. })));
    assert_eq!(store.puts, 0);
    assert_eq!(store.content("overdue.xsl").unwrap(), "remote v2\n");
    assert_eq!(ledger.get(&path), Some(&fingerprint("v1\n")));
}

#[test]
fn rejected_upload_leaves_ledger_and_batch_continues() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("bad.xsl", "v1\n", false);
    store.insert("good.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    let bad = LetterPath::from("bad.xsl");
    let good = LetterPath::from("good.xsl");
    repo.write(&bad, "broken xsl\n").unwrap();
    repo.write(&good, "fine xsl\n").unwrap();
    store.rejects.insert(bad.clone());

    let report = push(
        &mut store,
        &repo,
        &mut ledger,
        &[bad.clone(), good.clone()],
    )
    .expect("push");

    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PushOutcome::Rejected { path, .. } if *path == bad)));
    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PushOutcome::Pushed { path } if *path == good)));
    assert_eq!(
        ledger.get(&bad),
        Some(&fingerprint("v1\n")),
        "a rejected put must not advance the ledger"
    );
    assert_eq!(ledger.get(&good), Some(&fingerprint("fine xsl\n")));
}

#[test]
fn push_of_missing_local_file_is_reported() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    let path = LetterPath::from("ghost.xsl");
    let report = push(&mut store, &repo, &mut ledger, &[path.clone()]).expect("push");
    assert!(report
        .outcomes
        .iter()
        .any(|o| matches!(o, PushOutcome::MissingLocal { path: p } if *p == path)));
}

#[test]
fn fatal_session_error_keeps_already_recorded_applies() {
    let (tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("a.xsl", "v1\n", false);
    store.insert("b.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    store.insert("a.xsl", "v2\n", false);
    store.insert("b.xsl", "v2\n", false);
    store.fetches = 0;
    store.fail_fetches_after = Some(1);

    let err = pull(&mut store, &repo, &mut ledger).expect_err("session death aborts the batch");
    assert!(err.is_fatal());

    // The first entry was applied and durably recorded before the session
    // died; the second keeps its old record.
    let reloaded = StatusLedger::load(&tmp.path().join("status.json")).expect("reload");
    assert_eq!(
        reloaded.get(&LetterPath::from("a.xsl")),
        Some(&fingerprint("v2\n"))
    );
    assert_eq!(
        reloaded.get(&LetterPath::from("b.xsl")),
        Some(&fingerprint("v1\n"))
    );
}

#[test]
fn push_candidates_reports_edits_and_new_files() {
    let (_tmp, repo, mut ledger) = setup();
    let mut store = MemoryStore::default();
    store.insert("overdue.xsl", "v1\n", false);
    store.insert("untouched.xsl", "v1\n", false);
    pull(&mut store, &repo, &mut ledger).expect("seed pull");

    repo.write(&LetterPath::from("overdue.xsl"), "edited\n").unwrap();
    repo.write(&LetterPath::from("scratch.xsl"), "new\n").unwrap();

    let candidates = push_candidates(&mut store, &repo, &ledger).expect("candidates");
    assert_eq!(
        candidates,
        vec![LetterPath::from("overdue.xsl"), LetterPath::from("scratch.xsl")]
    );
}
