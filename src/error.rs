use crate::client::error_classification::HttpError;
use crate::codec::rules::Violations;
use crate::error_code::ErrorClass;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "api_key", "notifications[2].type")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "codec", "client_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the client.
///
/// Every call yields exactly one success value or exactly one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// Local, pre-network: lists every violated field.
    #[error("Validation error: {0}")]
    Validation(#[from] Violations),

    /// Non-success response from the service, already classified.
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    /// Body does not match the expected shape.
    #[error("Serialization error: {message}{}", format_context(.context))]
    Serialization {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::serialization_with_context(
            e.to_string(),
            ErrorContext::new().with_details(format!("line {}, column {}", e.line(), e.column())),
        )
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::serialization_with_context(msg, ErrorContext::new())
    }

    pub fn serialization_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Serialization {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Serialization { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// HTTP status of a classified remote error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(e) => Some(e.status),
            _ => None,
        }
    }

    /// Remote error class, if this came back from the service.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Error::Http(e) => Some(e.class),
            _ => None,
        }
    }

    /// The letter PDF has not been rendered yet. Callers may poll for it.
    pub fn is_pdf_not_ready(&self) -> bool {
        self.class() == Some(ErrorClass::PdfNotReady)
    }

    /// Violated fields of a local validation failure.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::Validation(v) => Some(v),
            _ => None,
        }
    }
}
