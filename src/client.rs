//! Notification service client.
//!
//! [`NotifyClient`] composes the codec, token issuer, transport and status
//! classifier for each endpoint. Implementation details are split into
//! submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;
pub mod pagination;

pub use builder::{NotifyClientBuilder, DEFAULT_BASE_URL};
pub use core::NotifyClient;
pub use error_classification::{ApiErrorItem, HttpError};
pub use pagination::{Page, Pages};
