//! `defaults` — refresh vendor-default letters without disturbing
//! customized ones.

use anyhow::{Context, Result};

use lettersync_sync::pull_defaults;

use crate::context::AppContext;
use crate::report;

pub fn run(ctx: &mut AppContext) -> Result<()> {
    let result = pull_defaults(&mut ctx.remote, &ctx.repo, &mut ctx.ledger)
        .context("defaults pull failed")?;
    report::print_pull(&result);
    Ok(())
}
