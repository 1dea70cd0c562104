//! Combined API key parsing.

use crate::{Error, ErrorContext, Result};
use std::fmt;
use uuid::Uuid;

const UUID_LEN: usize = 36;
/// Service id, separator, secret.
const TAIL_LEN: usize = UUID_LEN * 2 + 1;

/// Service identifier and signing secret extracted from a combined key.
///
/// Both parts keep their original text: the secret is signed as raw UTF-8
/// bytes, so re-formatting it would change every signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    service_id: String,
    secret: String,
}

impl Credential {
    /// Parse `<name>-<service_id>-<secret>`.
    ///
    /// Extraction is positional: the secret is the last 36 characters and
    /// the service id the 36 before the separating hyphen. The name prefix
    /// may contain anything, hyphens included.
    pub fn from_api_key(key: &str) -> Result<Self> {
        let key = key.trim();
        if key.len() < TAIL_LEN {
            return Err(Error::configuration_with_context(
                format!(
                    "API key must end with <service_id>-<secret> ({} characters), got {}",
                    TAIL_LEN,
                    key.len()
                ),
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("credential"),
            ));
        }

        let len = key.len();
        let service_id = Self::slice(key, len - TAIL_LEN, len - UUID_LEN - 1, "service_id")?;
        let separator = Self::slice(key, len - UUID_LEN - 1, len - UUID_LEN, "api_key")?;
        let secret = Self::slice(key, len - UUID_LEN, len, "secret")?;

        if separator != "-" {
            return Err(Error::configuration_with_context(
                "API key service id and secret must be separated by '-'",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("credential"),
            ));
        }

        Self::new(service_id, secret)
    }

    /// Build from already separated parts. Both must be UUID strings.
    pub fn new(service_id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let service_id = service_id.into();
        let secret = secret.into();
        Self::check_uuid(&service_id, "service_id")?;
        Self::check_uuid(&secret, "secret")?;
        Ok(Self { service_id, secret })
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    fn slice<'a>(key: &'a str, start: usize, end: usize, field: &str) -> Result<&'a str> {
        key.get(start..end).ok_or_else(|| {
            Error::configuration_with_context(
                "API key tail is not ASCII",
                ErrorContext::new()
                    .with_field_path(field)
                    .with_source("credential"),
            )
        })
    }

    fn check_uuid(value: &str, field: &str) -> Result<()> {
        if value.len() != UUID_LEN || Uuid::try_parse(value).is_err() {
            return Err(Error::configuration_with_context(
                format!("{} is not a 36 character UUID", field),
                ErrorContext::new()
                    .with_field_path(field)
                    .with_source("credential"),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("service_id", &self.service_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
