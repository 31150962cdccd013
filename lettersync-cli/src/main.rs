//! Lettersync — keep local letter templates in sync with the remote service.
//!
//! # Usage
//!
//! ```text
//! lettersync                  start the interactive shell
//! lettersync pull             pull letters modified on the remote side
//! lettersync defaults         pull updates to vendor-default letters
//! lettersync push [paths...]  push locally modified letters
//! lettersync test <pattern>[@lang1,lang2,...]
//! ```
//!
//! All commands run from the root of a letters checkout containing a
//! `lettersync.yaml`.

mod commands;
mod context;
mod report;
mod shell;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use context::AppContext;

#[derive(Parser, Debug)]
#[command(
    name = "lettersync",
    version,
    about = "Synchronize letter templates with the remote template service",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull letters modified on the remote side.
    Pull,

    /// Pull updates to vendor-default letters.
    Defaults,

    /// Push locally modified letters; with no paths, offers everything
    /// locally edited.
    Push(PushArgs),

    /// Render test documents remotely and capture the output per language.
    Test(TestArgs),
}

#[derive(Args, Debug)]
struct PushArgs {
    /// Letter paths relative to the tracked root.
    pub paths: Vec<String>,
}

#[derive(Args, Debug)]
struct TestArgs {
    /// `<pattern>[@lang1,lang2,...]` — a glob over the test-data directory,
    /// optionally followed by language codes (default `en`).
    pub spec: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut ctx = AppContext::bootstrap()?;
    let result = match cli.command {
        None => shell::run(&mut ctx),
        Some(Commands::Pull) => commands::pull::run(&mut ctx),
        Some(Commands::Defaults) => commands::defaults::run(&mut ctx),
        Some(Commands::Push(args)) => commands::push::run(&mut ctx, &args.paths),
        Some(Commands::Test(args)) => commands::test::run(&mut ctx, &args.spec),
    };
    ctx.remote.close();
    result
}
