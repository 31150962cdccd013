//! Render-and-capture test runs.
//!
//! Uploads sample documents and records the rendered output per language.
//! The full `documents × languages` cross-product is processed; one failing
//! pair never blocks the others. The status ledger plays no part here.

use std::path::{Path, PathBuf};

use lettersync_core::types::LanguageCode;
use lettersync_remote::RenderHarness;

use crate::error::{io_err, SyncError};

/// Outcome of one `(document, language)` render pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The render succeeded and the artifact was written.
    Captured {
        document: PathBuf,
        language: LanguageCode,
        artifact: PathBuf,
    },
    /// The pair failed; the rest of the cross-product continued.
    Failed {
        document: PathBuf,
        language: LanguageCode,
        reason: String,
    },
}

/// Where the artifact for a `(document, language)` pair is written:
/// `<dir>/<document stem>_<language>.<extension>`.
pub fn artifact_path(
    dir: &Path,
    document: &Path,
    language: &LanguageCode,
    extension: &str,
) -> PathBuf {
    let stem = document
        .file_stem()
        .unwrap_or_else(|| document.as_os_str())
        .to_string_lossy();
    dir.join(format!("{stem}_{language}.{extension}"))
}

/// Render every document in every language and persist the captured
/// artifacts under `artifacts_dir`.
///
/// Per-pair failures (unreadable document, refused render) are recorded and
/// the run continues; only a fatal session error abandons the remainder.
pub fn run_tests(
    harness: &mut dyn RenderHarness,
    documents: &[PathBuf],
    languages: &[LanguageCode],
    artifacts_dir: &Path,
) -> Result<Vec<TestOutcome>, SyncError> {
    let mut outcomes = Vec::new();

    for document in documents {
        let name = document
            .file_name()
            .unwrap_or_else(|| document.as_os_str())
            .to_string_lossy()
            .into_owned();
        let content = match std::fs::read_to_string(document) {
            Ok(content) => content,
            Err(err) => {
                // The document is unreadable in every language alike.
                for language in languages {
                    outcomes.push(TestOutcome::Failed {
                        document: document.clone(),
                        language: language.clone(),
                        reason: err.to_string(),
                    });
                }
                continue;
            }
        };

        for language in languages {
            match harness.render(&name, &content, language) {
                Ok(artifact) => {
                    let target =
                        artifact_path(artifacts_dir, document, language, &artifact.extension);
                    match write_artifact(&target, &artifact.bytes) {
                        Ok(()) => {
                            tracing::info!("captured {} ({language})", target.display());
                            outcomes.push(TestOutcome::Captured {
                                document: document.clone(),
                                language: language.clone(),
                                artifact: target,
                            });
                        }
                        Err(err) => outcomes.push(TestOutcome::Failed {
                            document: document.clone(),
                            language: language.clone(),
                            reason: err.to_string(),
                        }),
                    }
                }
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => outcomes.push(TestOutcome::Failed {
                    document: document.clone(),
                    language: language.clone(),
                    reason: err.to_string(),
                }),
            }
        }
    }

    Ok(outcomes)
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| io_err(path, e))
}
