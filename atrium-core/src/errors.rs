//! # Errors
//!
//! Atrium carries one structured error type through the whole provisioning
//! flow. Core goals:
//! - every failure maps to a stable machine-readable `code` and an HTTP status
//! - can be carried through `anyhow::Error` across async platform ports
//! - transport-agnostic (the function entry decides how to serialize)
//! - internal detail (platform ids, upstream messages) stays in `source` and is
//!   dropped by [`AtriumError::sanitize_for_client`]

use std::fmt;

use anyhow::Error as AnyError;
use serde::{Deserialize, Serialize};

/// Error codes returned to callers, with their HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,            // 401
    AuthenticationFailed,    // 401
    InvalidInput,            // 400
    ValidationError,         // 400
    TeamCreationFailed,      // 500
    WorkspaceCreationFailed, // 500
    ConfigurationError,      // 500
    InvalidRequest,          // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthorized | ErrorKind::AuthenticationFailed => 401,
            ErrorKind::InvalidInput | ErrorKind::ValidationError => 400,
            ErrorKind::TeamCreationFailed
            | ErrorKind::WorkspaceCreationFailed
            | ErrorKind::ConfigurationError
            | ErrorKind::InvalidRequest => 500,
        }
    }

    /// Wire `code` (e.g. "VALIDATION_ERROR")
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::TeamCreationFailed => "TEAM_CREATION_FAILED",
            ErrorKind::WorkspaceCreationFailed => "WORKSPACE_CREATION_FAILED",
            ErrorKind::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// The `error` object of a failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// `{ "success": false, "error": { ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            success: false,
            error: ApiError {
                code: code.into(),
                message: message.into(),
                field,
            },
        }
    }
}

/// A structured Atrium error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct AtriumError {
    pub kind: ErrorKind,
    pub message: String,
    pub field: Option<String>,
    pub source: Option<AnyError>,
}

impl AtriumError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Convert into `anyhow::Error` so it flows through async ports.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Turn any error into an `AtriumError`:
    /// - if it already is one, keep it (lossless)
    /// - otherwise wrap it under `fallback`, keeping it as source
    pub fn normalize(err: AnyError, fallback: ErrorKind, message: &str) -> AtriumError {
        match err.downcast::<AtriumError>() {
            Ok(atrium) => atrium,
            Err(other) => AtriumError::new(fallback, message).with_source(other),
        }
    }

    /// A copy safe to hand to callers: same kind/message/field, no `source`.
    pub fn sanitize_for_client(&self) -> AtriumError {
        AtriumError {
            kind: self.kind,
            message: self.message.clone(),
            field: self.field.clone(),
            source: None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.message.clone(), self.field.clone())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.to_response()).unwrap_or(serde_json::Value::Null)
    }

    // ---- Constructors ----

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, msg)
    }
    pub fn authentication_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailed, msg)
    }
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg)
    }
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, msg).with_field(field)
    }
    pub fn team_creation_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::TeamCreationFailed, msg)
    }
    pub fn workspace_creation_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::WorkspaceCreationFailed, msg)
    }
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigurationError, msg)
    }
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, msg)
    }
}

impl fmt::Display for AtriumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code(), self.status_code(), self.message)?;
        if let Some(field) = &self.field {
            write!(f, " [field: {field}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for AtriumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convenience helper for "bail with AtriumError".
#[macro_export]
macro_rules! bail_atrium {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::AtriumError::$ctor($msg))
    };
    ($ctor:ident, $field:expr, $msg:expr) => {
        return Err($crate::errors::AtriumError::$ctor($field, $msg))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_and_statuses_follow_the_taxonomy() {
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::AuthenticationFailed.status_code(), 401);
        assert_eq!(ErrorKind::InvalidInput.status_code(), 400);
        assert_eq!(ErrorKind::ValidationError.code(), "VALIDATION_ERROR");
        assert_eq!(ErrorKind::TeamCreationFailed.status_code(), 500);
        assert_eq!(ErrorKind::WorkspaceCreationFailed.code(), "WORKSPACE_CREATION_FAILED");
        assert!(ErrorKind::ConfigurationError.is_server_error());
        assert!(!ErrorKind::ValidationError.is_server_error());
    }

    #[test]
    fn field_is_omitted_from_json_when_absent() {
        let err = AtriumError::unauthorized("missing x-appwrite-trigger header");
        assert_eq!(
            err.to_json(),
            json!({
                "success": false,
                "error": {"code": "UNAUTHORIZED", "message": "missing x-appwrite-trigger header"}
            })
        );

        let err = AtriumError::validation("name", "Workspace name is required");
        assert_eq!(err.to_json()["error"]["field"], "name");
    }

    #[test]
    fn sanitize_drops_internal_source() {
        let err = AtriumError::team_creation_failed("Failed to create workspace team")
            .with_source(anyhow::anyhow!("upstream said: key standard_abc123 is invalid"));
        let safe = err.sanitize_for_client();
        assert!(safe.source.is_none());
        assert_eq!(safe.message, "Failed to create workspace team");
        assert!(!safe.to_json().to_string().contains("standard_abc123"));
    }

    #[test]
    fn normalize_wraps_foreign_errors() {
        let err = AtriumError::normalize(
            anyhow::anyhow!("connection reset"),
            ErrorKind::TeamCreationFailed,
            "Failed to create workspace team",
        );
        assert_eq!(err.kind, ErrorKind::TeamCreationFailed);
        assert!(err.source.is_some());

        let kept = AtriumError::normalize(
            AtriumError::authentication_failed("authentication failed").into_anyhow(),
            ErrorKind::TeamCreationFailed,
            "ignored",
        );
        assert_eq!(kept.kind, ErrorKind::AuthenticationFailed);
    }
}
