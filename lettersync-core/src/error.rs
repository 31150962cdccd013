//! Error types for lettersync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, unreadable file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No config file in the working directory. The tool is meant to be run
    /// from the root of a letters checkout.
    #[error("no {file} found in {dir} — run lettersync from the root of a letters checkout")]
    NotFound { file: String, dir: PathBuf },
}
