//! # notify-client
//!
//! Blocking client for a notification-dispatch service: send email, SMS and
//! letter notifications, inspect their status, and fetch templates.
//!
//! ## Overview
//!
//! Every call follows the same pipeline:
//!
//! 1. the request value is validated and encoded by the [`codec`],
//! 2. a short-lived bearer token is minted from the [`auth::Credential`],
//! 3. the [`transport`] sends it on a connection used for that request only,
//! 4. the response status is classified into a body or an [`HttpError`],
//! 5. the body is decoded into a typed model (tagged unions resolved on
//!    their `type` field) and validated again.
//!
//! Each call returns exactly one success value or exactly one [`Error`].
//! There is no retry logic; [`Error::is_pdf_not_ready`] and
//! [`ErrorClass::transient`] tell a caller when polling makes sense.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notify_client::{NotifyClient, types::SmsRequest};
//! use uuid::Uuid;
//!
//! fn main() -> notify_client::Result<()> {
//!     let client = NotifyClient::builder()
//!         .api_key("my_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0")
//!         .build()?;
//!
//!     let request = SmsRequest::new(Uuid::new_v4(), "+447900900123")
//!         .with_personalisation_value("name", "Ada");
//!     let sent = client.send_sms(&request)?;
//!     println!("sent {}", sent.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | API key parsing and token issuing/validation |
//! | [`client`] | [`NotifyClient`], its builder, status classification, pagination |
//! | [`codec`] | Validate-then-encode and decode-then-validate |
//! | [`types`] | Request envelopes and response models |
//! | [`transport`] | Blocking HTTP transport behind the [`transport::HttpSend`] seam |
//! | [`telemetry`] | Injected [`telemetry::LogSink`] implementations |
//! | [`error_code`] | [`ErrorClass`] taxonomy of service errors |

pub mod auth;
pub mod client;
pub mod codec;
pub mod error_code;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use auth::{Credential, Token, TokenError, TokenIssuer, ValidationWindow};
pub use client::{ApiErrorItem, HttpError, NotifyClient, NotifyClientBuilder};
pub use codec::rules::{Violation, Violations};
pub use codec::{Codec, CodecConfig, LetterAddressPolicy};
pub use error_code::ErrorClass;
pub use telemetry::{ClientEvent, LogSink};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
