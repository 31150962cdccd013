//! `push [paths...]` — upload locally modified letters.
//!
//! With an explicit selection the paths go straight to the engine. With no
//! arguments the command lists everything locally edited and asks before
//! pushing — the engine itself only ever sees an already-resolved set.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use lettersync_core::types::LetterPath;
use lettersync_sync::{push, push_candidates};

use crate::context::AppContext;
use crate::report;

pub fn run(ctx: &mut AppContext, paths: &[String]) -> Result<()> {
    let selected: Vec<LetterPath> = if paths.is_empty() {
        let candidates = push_candidates(&mut ctx.remote, &ctx.repo, &ctx.ledger)
            .context("could not determine locally modified letters")?;
        if candidates.is_empty() {
            println!("Nothing to push.");
            return Ok(());
        }
        println!("Locally modified letters:");
        for candidate in &candidates {
            println!("  ✎  {candidate}");
        }
        if !confirm(&format!("Push {} letter(s)?", candidates.len()))? {
            println!("Aborted.");
            return Ok(());
        }
        candidates
    } else {
        paths
            .iter()
            .map(|path| normalize_selection(path, &ctx.config.letters_dir))
            .collect()
    };

    let result =
        push(&mut ctx.remote, &ctx.repo, &mut ctx.ledger, &selected).context("push failed")?;
    report::print_push(&result);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} {} ", "[y/N]".bold());
    std::io::stdout().flush().context("flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Accept both `overdue.xsl` and `xsl/letters/overdue.xsl` on the command
/// line; the engine keys everything relative to the tracked root.
fn normalize_selection(path: &str, letters_dir: &Path) -> LetterPath {
    let normalized = path.replace('\\', "/");
    let prefix = format!("{}/", letters_dir.to_string_lossy().replace('\\', "/"));
    match normalized.strip_prefix(&prefix) {
        Some(stripped) => LetterPath::from(stripped),
        None => LetterPath(normalized),
    }
}
