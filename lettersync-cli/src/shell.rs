//! Interactive shell.
//!
//! Commands form a closed set dispatched through a single match; an error
//! from any command is printed as a structured report and control returns to
//! the prompt, so one failed operation never kills the session. The
//! `restart` command tears down and re-establishes the remote session after
//! a connection loss.

use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use lettersync_remote::RemoteError;
use lettersync_sync::SyncError;

use crate::commands;
use crate::context::AppContext;

const HISTORY_FILE: &str = ".lettersync_history";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Pull,
    Defaults,
    Push(Vec<String>),
    Test(String),
    Restart,
    Help,
    Exit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err("empty command".to_string());
    };
    match head {
        "pull" => Ok(ShellCommand::Pull),
        "defaults" => Ok(ShellCommand::Defaults),
        "push" => Ok(ShellCommand::Push(parts.map(str::to_string).collect())),
        "test" => {
            let spec = parts.collect::<Vec<_>>().join(" ");
            if spec.is_empty() {
                Err("usage: test <pattern>[@lang1,lang2,...]".to_string())
            } else {
                Ok(ShellCommand::Test(spec))
            }
        }
        "restart" => Ok(ShellCommand::Restart),
        "help" | "?" => Ok(ShellCommand::Help),
        "exit" | "quit" => Ok(ShellCommand::Exit),
        other => Err(format!("unknown command '{other}'; type help for a list")),
    }
}

pub fn run(ctx: &mut AppContext) -> Result<()> {
    println!(
        "Welcome to lettersync {}. Type help or ? to list commands.",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = std::io::stdin();
    let mut input = String::new();
    loop {
        print!("{} ", "lettersync>".bright_cyan());
        std::io::stdout().flush()?;

        input.clear();
        // EOF (ctrl-d) behaves like exit.
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        append_history(line);

        match parse_command(line) {
            Err(message) => println!("{message}"),
            Ok(ShellCommand::Exit) => break,
            Ok(ShellCommand::Help) => print_help(),
            Ok(ShellCommand::Restart) => match ctx.remote.restart() {
                Ok(()) => println!("Session restarted."),
                Err(err) => report_error(&err.into()),
            },
            Ok(command) => {
                if let Err(err) = execute(ctx, command) {
                    report_error(&err);
                }
            }
        }
    }

    Ok(())
}

fn execute(ctx: &mut AppContext, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Pull => commands::pull::run(ctx),
        ShellCommand::Defaults => commands::defaults::run(ctx),
        ShellCommand::Push(paths) => commands::push::run(ctx, &paths),
        ShellCommand::Test(spec) => commands::test::run(ctx, &spec),
        // Handled in the loop above.
        ShellCommand::Restart | ShellCommand::Help | ShellCommand::Exit => Ok(()),
    }
}

fn report_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
    let session_lost = err.chain().any(|cause| {
        cause
            .downcast_ref::<SyncError>()
            .map(SyncError::is_fatal)
            .unwrap_or(false)
            || cause
                .downcast_ref::<RemoteError>()
                .map(RemoteError::is_fatal)
                .unwrap_or(false)
    });
    if session_lost {
        eprintln!("The remote session may be unusable — try 'restart'.");
    }
}

fn print_help() {
    println!(
        "\
Commands:
  pull                          pull letters modified on the remote side
  defaults                      pull updates to vendor-default letters
  push [paths...]               push locally modified letters; with no paths,
                                offers everything locally edited
  test <pattern>[@lang1,...]    render matching test documents and capture
                                the output (default language: en)
  restart                       tear down and re-establish the remote session
  exit | quit                   leave the shell"
    );
}

fn append_history(line: &str) {
    // Best effort; a read-only checkout should not break the shell.
    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(HISTORY_FILE)
        .and_then(|mut file| writeln!(file, "{line}"));
    if let Err(err) = result {
        tracing::debug!("could not append history: {err}");
    }
}
