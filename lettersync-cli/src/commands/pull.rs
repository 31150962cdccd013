//! `pull` — bring down letters modified on the remote side.

use anyhow::{Context, Result};

use lettersync_sync::pull;

use crate::context::AppContext;
use crate::report;

pub fn run(ctx: &mut AppContext) -> Result<()> {
    let result = pull(&mut ctx.remote, &ctx.repo, &mut ctx.ledger).context("pull failed")?;
    report::print_pull(&result);
    Ok(())
}
