//! Command implementations shared by the one-shot subcommands and the shell.

pub mod defaults;
pub mod pull;
pub mod push;
