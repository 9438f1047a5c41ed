use serde::Deserialize;
use thiserror::Error;

/// Failures talking to the Appwrite REST API.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid Appwrite endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Appwrite request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Appwrite API error {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("failed to decode Appwrite response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

impl PlatformError {
    /// Build an `Api` error from a non-2xx status and its raw body.
    ///
    /// Appwrite answers `{ "message", "code", "type", "version" }`; anything
    /// else keeps the raw body as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => PlatformError::Api {
                status,
                kind: if parsed.kind.is_empty() {
                    "unknown".to_string()
                } else {
                    parsed.kind
                },
                message: parsed.message,
            },
            Err(_) => PlatformError::Api {
                status,
                kind: "unknown".to_string(),
                message: body.trim().to_string(),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PlatformError::Api { status, .. } => Some(*status),
            PlatformError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for 409 answers such as a duplicate document or slug.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
