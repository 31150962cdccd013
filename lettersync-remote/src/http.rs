//! HTTP implementation of the remote template service boundary.
//!
//! # Endpoints
//!
//! | Call         | Request                              | Response                |
//! |--------------|--------------------------------------|-------------------------|
//! | health check | `GET  <base>/health`                 | `200 OK`                |
//! | list         | `GET  <base>/letters`                | `{"letters": [...]}`    |
//! | fetch        | `GET  <base>/letters/<path>`         | raw template content    |
//! | put          | `PUT  <base>/letters/<path>`         | `204 No Content`        |
//! | render       | `POST <base>/render`                 | captured artifact bytes |
//!
//! Checksums in the list payload are SHA-256 hex of line-ending-normalized
//! content, the same digest the local side computes, so fingerprints compare
//! across sides.

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use lettersync_core::config::RemoteConfig;
use lettersync_core::types::{LanguageCode, LetterPath, RemoteEntry};

use crate::error::RemoteError;
use crate::{RenderHarness, RenderedArtifact, TemplateStore};

// Artifacts can be large; cap reads well above any sane screenshot.
const MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct ListPayload {
    letters: Vec<RemoteEntry>,
}

/// The single shared session against the remote service.
///
/// Implements both [`TemplateStore`] and [`RenderHarness`]; the orchestration
/// layer borrows it mutably for the duration of one operation, which keeps
/// all round trips strictly sequential.
pub struct HttpRemote {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        HttpRemote {
            agent: build_agent(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        }
    }

    /// Establish the session. Fatal when the endpoint is unreachable.
    pub fn connect(&mut self) -> Result<(), RemoteError> {
        let url = join_url(&self.base_url, "health");
        match self.request("GET", &url).call() {
            Ok(_) => {
                tracing::info!("connected to {}", self.base_url);
                Ok(())
            }
            Err(err) => Err(RemoteError::Session(format!(
                "cannot reach {}: {err}",
                self.base_url
            ))),
        }
    }

    /// Tear down and re-establish the session.
    pub fn restart(&mut self) -> Result<(), RemoteError> {
        tracing::info!("restarting remote session");
        self.agent = build_agent(self.timeout);
        self.connect()
    }

    /// Graceful shutdown. The underlying connection pool is dropped with the
    /// agent; nothing needs flushing.
    pub fn close(&mut self) {
        tracing::info!("closing remote session");
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let req = self.agent.request(method, url);
        match &self.api_key {
            Some(key) => req.set("Authorization", &format!("Bearer {key}")),
            None => req,
        }
    }

    fn letter_url(&self, path: &LetterPath) -> String {
        join_url(&self.base_url, &format!("letters/{}", path.0))
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Map a transport-level failure to a fatal session error.
fn transport_err(err: &ureq::Error) -> RemoteError {
    RemoteError::Session(err.to_string())
}

fn response_body(response: ureq::Response) -> String {
    response.into_string().unwrap_or_default()
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

impl TemplateStore for HttpRemote {
    fn list(&mut self) -> Result<Vec<RemoteEntry>, RemoteError> {
        let url = join_url(&self.base_url, "letters");
        let response = match self.request("GET", &url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(RemoteError::Protocol {
                    status,
                    body: response_body(response),
                })
            }
            Err(err) => return Err(transport_err(&err)),
        };
        let payload: ListPayload = response.into_json().map_err(|err| RemoteError::Protocol {
            status: 200,
            body: format!("malformed listing payload: {err}"),
        })?;
        tracing::debug!("listed {} remote entries", payload.letters.len());
        Ok(payload.letters)
    }

    fn fetch(&mut self, path: &LetterPath) -> Result<String, RemoteError> {
        let url = self.letter_url(path);
        match self.request("GET", &url).call() {
            Ok(response) => response.into_string().map_err(|err| RemoteError::Protocol {
                status: 200,
                body: format!("unreadable template body: {err}"),
            }),
            Err(ureq::Error::Status(404, _)) => {
                Err(RemoteError::NotFound { path: path.clone() })
            }
            Err(ureq::Error::Status(status, response)) => Err(RemoteError::Protocol {
                status,
                body: response_body(response),
            }),
            Err(err) => Err(transport_err(&err)),
        }
    }

    fn put(&mut self, path: &LetterPath, content: &str) -> Result<(), RemoteError> {
        let url = self.letter_url(path);
        match self.request("PUT", &url).send_string(content) {
            Ok(_) => {
                tracing::info!("uploaded {path}");
                Ok(())
            }
            Err(ureq::Error::Status(status @ (400 | 422), response)) => {
                let reason = response_body(response);
                tracing::debug!("upload of {path} rejected ({status}): {reason}");
                Err(RemoteError::Rejected {
                    path: path.clone(),
                    reason,
                })
            }
            Err(ureq::Error::Status(status, response)) => Err(RemoteError::Protocol {
                status,
                body: response_body(response),
            }),
            Err(err) => Err(transport_err(&err)),
        }
    }
}

impl RenderHarness for HttpRemote {
    fn render(
        &mut self,
        document_name: &str,
        document: &str,
        language: &LanguageCode,
    ) -> Result<RenderedArtifact, RemoteError> {
        let url = join_url(&self.base_url, "render");
        let response = match self.request("POST", &url).send_json(serde_json::json!({
            "document": document,
            "language": language,
        })) {
            Ok(response) => response,
            Err(ureq::Error::Status(status @ (400 | 422), response)) => {
                return Err(RemoteError::RenderFailed {
                    document: document_name.to_string(),
                    language: language.clone(),
                    reason: format!("rejected ({status}): {}", response_body(response)),
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                return Err(RemoteError::Protocol {
                    status,
                    body: response_body(response),
                })
            }
            // Read timeouts surface as Io; anything else means the connection
            // itself died and the session needs a restart.
            Err(ureq::Error::Transport(t)) if matches!(t.kind(), ureq::ErrorKind::Io) => {
                return Err(RemoteError::RenderFailed {
                    document: document_name.to_string(),
                    language: language.clone(),
                    reason: t.to_string(),
                })
            }
            Err(err) => return Err(transport_err(&err)),
        };

        let extension = extension_for(response.content_type()).to_string();
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ARTIFACT_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|err| RemoteError::Session(format!("artifact read failed: {err}")))?;
        tracing::debug!(
            "captured {} bytes for {document_name} ({language})",
            bytes.len()
        );
        Ok(RenderedArtifact { bytes, extension })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
