/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum GifyuError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Request network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authorization error. {0}")]
    Auth(String),

    #[error("No such file or directory {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("API Response was error: {status}")]
    ApiResponse {
        status: StatusCode,
        body: serde_json::Value,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error: {0}")]
    UrlParsing(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Expected response field missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Uniform error shape handed back to callers in place of a raised error.
///
/// Mirrors the JSON the service itself returns on failure:
/// `{"status_code": 400, "error": {"message": "..."}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub error: ErrorMessage,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }

    /// Generic envelope used for a failed item of a batch upload
    pub fn batch_item() -> Self {
        Self::new(400, "Error uploading file")
    }
}

/// A normalized failure.
///
/// When the service answered with a body it is kept verbatim, otherwise the local error is
/// folded into an [`ErrorEnvelope`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ErrorResponse {
    Envelope(ErrorEnvelope),
    Remote(serde_json::Value),
}

impl ErrorResponse {
    /// Status code carried by the failure, if the body exposes one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ErrorResponse::Envelope(e) => Some(e.status_code),
            ErrorResponse::Remote(body) => body
                .get("status_code")
                .and_then(serde_json::Value::as_u64)
                .and_then(|v| u16::try_from(v).ok()),
        }
    }

    /// Human readable message, if the body exposes one
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorResponse::Envelope(e) => Some(e.error.message.as_str()),
            ErrorResponse::Remote(body) => body
                .pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .or_else(|| body.as_str()),
        }
    }
}

impl From<GifyuError> for ErrorResponse {
    fn from(err: GifyuError) -> Self {
        match err {
            GifyuError::ApiResponse { body, .. } => ErrorResponse::Remote(body),
            other => ErrorResponse::Envelope(ErrorEnvelope::new(400, other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_body_is_kept_verbatim() {
        let body = json!({"status_code": 403, "error": {"message": "Request denied", "code": 5}});
        let err = GifyuError::ApiResponse {
            status: StatusCode::FORBIDDEN,
            body: body.clone(),
        };
        let resp = ErrorResponse::from(err);
        assert_eq!(resp, ErrorResponse::Remote(body));
        assert_eq!(resp.status_code(), Some(403));
        assert_eq!(resp.message(), Some("Request denied"));
    }

    #[test]
    fn local_error_becomes_envelope() {
        let err = GifyuError::FileNotFound(PathBuf::from("/nope/cat.png"));
        let resp = ErrorResponse::from(err);
        assert_eq!(resp.status_code(), Some(400));
        assert_eq!(
            resp.message(),
            Some("No such file or directory /nope/cat.png")
        );
    }

    #[test]
    fn envelope_serializes_like_the_service() {
        let value = serde_json::to_value(ErrorEnvelope::batch_item()).unwrap();
        assert_eq!(
            value,
            json!({"status_code": 400, "error": {"message": "Error uploading file"}})
        );
    }
}
