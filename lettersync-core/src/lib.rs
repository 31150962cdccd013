//! # lettersync-core
//!
//! Domain types and configuration for the letter synchronization tool.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{Fingerprint, LanguageCode, LetterPath, RemoteEntry};
