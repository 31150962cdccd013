//! Terminal rendering of operation reports.

use colored::Colorize;

use lettersync_core::types::Fingerprint;
use lettersync_sync::{PullOutcome, PullReport, PushOutcome, PushReport, TestOutcome};

fn short_or_absent(fingerprint: Option<&Fingerprint>) -> String {
    match fingerprint {
        Some(fp) => fp.short().to_string(),
        None => "absent".to_string(),
    }
}

pub fn print_pull(report: &PullReport) {
    let unchanged = report
        .outcomes
        .iter()
        .filter(|o| matches!(o, PullOutcome::Unchanged { .. }))
        .count();
    println!(
        "✓ pull complete ({} fetched, {} unchanged, {} conflicts)",
        report.fetched(),
        unchanged,
        report.conflicts(),
    );

    for outcome in &report.outcomes {
        match outcome {
            PullOutcome::Fetched { path } => println!("  ✎  {path}"),
            PullOutcome::Unchanged { path } => println!("  ·  {path}"),
            PullOutcome::LocalEdit { path } => {
                println!("  ~  {path} {}", "(local edit — push when ready)".yellow())
            }
            PullOutcome::Conflict {
                path,
                local,
                remote,
            } => println!(
                "  !  {path} {} local {} / remote {} — resolve manually",
                "conflict:".red().bold(),
                short_or_absent(local.as_ref()),
                remote.short(),
            ),
            PullOutcome::Failed { path, reason } => {
                println!("  ✗  {path}: {}", reason.red())
            }
        }
    }
}

pub fn print_push(report: &PushReport) {
    println!(
        "✓ push complete ({} pushed, {} refused)",
        report.pushed(),
        report.refused(),
    );

    for outcome in &report.outcomes {
        match outcome {
            PushOutcome::Pushed { path } => println!("  ✎  {path}"),
            PushOutcome::Unchanged { path } => println!("  ·  {path}"),
            PushOutcome::RemoteAhead {
                path,
                local,
                remote,
            } => println!(
                "  !  {path} {} local {} / remote {} — pull first",
                "remote changed:".yellow().bold(),
                local.short(),
                remote.short(),
            ),
            PushOutcome::Conflict {
                path,
                local,
                remote,
            } => println!(
                "  !  {path} {} local {} / remote {} — resolve manually",
                "conflict:".red().bold(),
                local.short(),
                remote.short(),
            ),
            PushOutcome::Rejected { path, reason } => {
                println!("  ✗  {path} {} {reason}", "rejected:".red())
            }
            PushOutcome::MissingLocal { path } => {
                println!("  ✗  {path}: {}", "no such local file".red())
            }
            PushOutcome::Failed { path, reason } => {
                println!("  ✗  {path}: {}", reason.red())
            }
        }
    }
}

pub fn print_test(outcomes: &[TestOutcome]) {
    let captured = outcomes
        .iter()
        .filter(|o| matches!(o, TestOutcome::Captured { .. }))
        .count();
    println!(
        "✓ test run complete ({captured} captured, {} failed)",
        outcomes.len() - captured,
    );

    for outcome in outcomes {
        match outcome {
            TestOutcome::Captured {
                document,
                language,
                artifact,
            } => println!(
                "  ✎  {} [{language}] → {}",
                document.display(),
                artifact.display(),
            ),
            TestOutcome::Failed {
                document,
                language,
                reason,
            } => println!(
                "  ✗  {} [{language}]: {}",
                document.display(),
                reason.red(),
            ),
        }
    }
}
