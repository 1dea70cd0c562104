//! Remote error classes.
//!
//! The service answers failures with an HTTP status and a list of
//! `{error, message}` pairs. This module maps that pair onto a small set of
//! classes so callers can branch without string matching.
//!
//! | Class        | Typical status | Service error names                           |
//! |--------------|----------------|-----------------------------------------------|
//! | BadRequest   | 400            | `BadRequestError`, `ValidationError`          |
//! | PdfNotReady  | 400            | `PDFNotReadyError`                            |
//! | Auth         | 401, 403       | `AuthError`                                   |
//! | NotFound     | 404            | `NoResultFound`                               |
//! | RateLimited  | 429            | `RateLimitError`, `TooManyRequestsError`      |
//! | ServerError  | 5xx            | `Exception`                                   |
//! | Unknown      | anything else  |                                               |
//!
//! ## Example
//!
//! ```rust
//! use notify_client::error_code::ErrorClass;
//!
//! let class = ErrorClass::classify(400, Some("PDFNotReadyError"));
//! assert_eq!(class, ErrorClass::PdfNotReady);
//! assert!(class.transient());
//! ```

use std::fmt;

/// Error name the service uses while a letter PDF is still being rendered.
pub const PDF_NOT_READY: &str = "PDFNotReadyError";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed request or failed server-side validation
    BadRequest,
    /// The requested artifact exists but is not rendered yet
    PdfNotReady,
    /// Token rejected: wrong key, clock skew, revoked key
    Auth,
    /// Notification or template does not exist
    NotFound,
    /// Rate or daily send limit exceeded
    RateLimited,
    /// Service-side failure
    ServerError,
    Unknown,
}

impl ErrorClass {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::PdfNotReady => "pdf_not_ready",
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the same request may succeed later without changes.
    ///
    /// Informational only: the client never retries on its own.
    #[inline]
    pub fn transient(&self) -> bool {
        matches!(self, Self::PdfNotReady | Self::RateLimited | Self::ServerError)
    }

    /// Maps a service error name to its class, if it is a recognised one.
    pub fn from_error_name(name: &str) -> Option<Self> {
        let class = match name {
            PDF_NOT_READY => Self::PdfNotReady,
            "BadRequestError" | "ValidationError" => Self::BadRequest,
            "AuthError" => Self::Auth,
            "NoResultFound" => Self::NotFound,
            "RateLimitError" | "TooManyRequestsError" => Self::RateLimited,
            "Exception" => Self::ServerError,
            _ => return None,
        };
        Some(class)
    }

    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Combines status and the first error name. A recognised name wins over
    /// the status, so `PDFNotReadyError` is distinguished from other 400s.
    pub fn classify(status: u16, first_error_name: Option<&str>) -> Self {
        first_error_name
            .and_then(Self::from_error_name)
            .unwrap_or_else(|| Self::from_http_status(status))
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
