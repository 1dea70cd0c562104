//! Bearer token minting and verification.
//!
//! Tokens are HS256 JWTs carrying only `iss` (the service id) and `iat`
//! (seconds since the epoch). There is no `exp` claim: the verifier decides
//! how old a token may be.

use crate::{Error, ErrorContext, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
}

/// A signed, dot-separated `header.claims.signature` string.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Why a token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token issuer does not match")]
    WrongIssuer,

    #[error("token issued {age_secs}s ago, more than the allowed {max_secs}s")]
    IssuedTooFarInPast { age_secs: i64, max_secs: u64 },

    #[error("token issued {ahead_secs}s in the future, more than the allowed {max_secs}s")]
    IssuedInFuture { ahead_secs: i64, max_secs: u64 },
}

/// Accepted distance between a token's `iat` and the verifier's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationWindow {
    pub max_future_skew: Duration,
    pub max_past_age: Duration,
}

impl Default for ValidationWindow {
    fn default() -> Self {
        Self {
            max_future_skew: Duration::from_secs(60),
            max_past_age: Duration::from_secs(180),
        }
    }
}

pub struct TokenIssuer;

impl TokenIssuer {
    /// Mint a token for `issuer` signed with `secret`.
    ///
    /// `issued_at_millis` pins the clock; `None` uses the current time.
    /// Signing failures are configuration errors and are not retried.
    pub fn create(issuer: &str, secret: &str, issued_at_millis: Option<i64>) -> Result<Token> {
        if issuer.is_empty() || secret.is_empty() {
            return Err(Error::configuration_with_context(
                "issuer and secret must be non-empty",
                ErrorContext::new().with_source("token_issuer"),
            ));
        }

        let iat = match issued_at_millis {
            Some(ms) => ms.div_euclid(1000),
            None => now_secs(),
        };
        let claims = Claims {
            iss: issuer.to_string(),
            iat,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map(Token)
        .map_err(|e| {
            Error::configuration_with_context(
                format!("failed to sign token: {}", e),
                ErrorContext::new().with_source("token_issuer"),
            )
        })
    }

    /// Verify a token against the current clock.
    pub fn validate(
        token: &str,
        issuer: &str,
        secret: &str,
        window: ValidationWindow,
    ) -> std::result::Result<Claims, TokenError> {
        Self::validate_at(token, issuer, secret, window, now_secs())
    }

    /// Verify a token against an explicit clock (seconds since the epoch).
    pub fn validate_at(
        token: &str,
        issuer: &str,
        secret: &str,
        window: ValidationWindow,
        now: i64,
    ) -> std::result::Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["iss".to_string()]);
        validation.set_issuer(&[issuer]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
            _ => TokenError::Malformed(e.to_string()),
        })?
        .claims;

        let max_past = window.max_past_age.as_secs();
        let max_future = window.max_future_skew.as_secs();
        let age = now - claims.iat;
        if age > 0 && age as u64 > max_past {
            return Err(TokenError::IssuedTooFarInPast {
                age_secs: age,
                max_secs: max_past,
            });
        }
        if age < 0 && age.unsigned_abs() > max_future {
            return Err(TokenError::IssuedInFuture {
                ahead_secs: -age,
                max_secs: max_future,
            });
        }

        Ok(claims)
    }
}

fn now_secs() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
