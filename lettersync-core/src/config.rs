//! Workspace configuration — `lettersync.yaml`.
//!
//! The tool runs from the root of a letters checkout and reads its
//! configuration from `lettersync.yaml` in that directory. Only the remote
//! endpoint is mandatory; every path has a conventional default.
//!
//! ```yaml
//! remote:
//!   base_url: https://letters.example.edu/api
//!   api_key: s3cret            # optional
//!   timeout_secs: 30           # optional
//! letters_dir: xsl/letters     # optional
//! test_data_dir: test-data     # optional
//! artifacts_dir: screenshots   # optional
//! status_path: status.json     # optional
//! default_language: en         # optional
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::LanguageCode;

pub const CONFIG_FILE: &str = "lettersync.yaml";

/// Connection settings for the remote template service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,

    /// Tracked letter templates, relative to the working directory.
    #[serde(default = "default_letters_dir")]
    pub letters_dir: PathBuf,

    /// Sample documents uploaded by the `test` command.
    #[serde(default = "default_test_data_dir")]
    pub test_data_dir: PathBuf,

    /// Where captured render artifacts are written.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Persisted fingerprint ledger.
    #[serde(default = "default_status_path")]
    pub status_path: PathBuf,

    #[serde(default = "default_language")]
    pub default_language: LanguageCode,
}

fn default_letters_dir() -> PathBuf {
    PathBuf::from("xsl").join("letters")
}

fn default_test_data_dir() -> PathBuf {
    PathBuf::from("test-data")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_status_path() -> PathBuf {
    PathBuf::from("status.json")
}

fn default_language() -> LanguageCode {
    LanguageCode::from("en")
}

impl Config {
    /// Load `lettersync.yaml` from `dir`.
    ///
    /// Returns `ConfigError::NotFound` when the file is absent — the caller
    /// decides whether that is fatal (it is, for the CLI).
    pub fn load_at(dir: &Path) -> Result<Config, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(ConfigError::NotFound {
                file: CONFIG_FILE.to_string(),
                dir: dir.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(&path)?;
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
