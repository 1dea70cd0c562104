//! Credentials and bearer tokens.
//!
//! A combined API key carries the service id and the signing secret. Each
//! request gets a freshly minted token signed with that secret; tokens are
//! never cached.

pub mod credential;
pub mod token;

pub use credential::Credential;
pub use token::{Claims, Token, TokenError, TokenIssuer, ValidationWindow};
