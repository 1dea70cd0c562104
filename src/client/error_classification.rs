//! Status classification.
//!
//! A response either carries the operation's expected success status, in
//! which case its body goes on to the codec, or it becomes one [`HttpError`].

use crate::error_code::ErrorClass;
use crate::transport::RawResponse;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One `{error, message}` entry of an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorItem {
    pub error: String,
    pub message: String,
}

/// `{"status_code": int, "errors": [...]}`. The body's `status_code` is
/// ignored; the HTTP status line is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ErrorPayload {
    errors: Vec<ApiErrorItem>,
}

/// A non-success response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status} ({class}): {message}")]
pub struct HttpError {
    /// Status of the HTTP response.
    pub status: u16,
    pub class: ErrorClass,
    /// `"<error>: <message>"` pairs joined by `", "`, or the raw body when
    /// it was not an error payload.
    pub message: String,
    /// Parsed entries; empty when the body was not an error payload.
    pub errors: Vec<ApiErrorItem>,
}

impl HttpError {
    pub fn is_pdf_not_ready(&self) -> bool {
        self.class == ErrorClass::PdfNotReady
    }

    /// Build from a status and the raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorPayload>(body) {
            Ok(payload) if !payload.errors.is_empty() => {
                let message = payload
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.error, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                let class =
                    ErrorClass::classify(status, payload.errors.first().map(|e| e.error.as_str()));
                Self {
                    status,
                    class,
                    message,
                    errors: payload.errors,
                }
            }
            _ => Self {
                status,
                class: ErrorClass::from_http_status(status),
                message: String::from_utf8_lossy(body).into_owned(),
                errors: Vec::new(),
            },
        }
    }
}

/// Pass the body through on `expected` status, otherwise classify.
pub(crate) fn classify(expected: u16, response: RawResponse) -> Result<Bytes, HttpError> {
    if response.status == expected {
        Ok(response.body)
    } else {
        Err(HttpError::from_response(response.status, &response.body))
    }
}
