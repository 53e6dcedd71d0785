//! Token issuance and verification ports.

use crate::auth::domain::{IssuedToken, Principal, UserName};
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Issues signed access tokens.
pub trait AccessTokenIssuer: Send + Sync {
    /// Issues a token for `subject`, valid from `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when the token cannot be produced.
    fn issue(&self, subject: &UserName, issued_at: DateTime<Utc>)
    -> Result<IssuedToken, TokenError>;
}

/// Verifies access tokens presented by callers.
pub trait AccessTokenVerifier: Send + Sync {
    /// Verifies `token` and returns the caller it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Rejected`] when the token is malformed, expired,
    /// tampered with, or issued for another issuer or audience.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}

/// Errors returned by token adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The presented token is not acceptable.
    #[error("access token rejected: {0}")]
    Rejected(String),
    /// A token could not be signed.
    #[error("access token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(_) => ErrorKind::Unauthenticated,
            Self::Signing(_) => ErrorKind::Internal,
        }
    }
}
