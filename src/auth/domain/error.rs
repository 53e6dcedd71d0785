//! Errors for authentication input and configuration.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors raised while validating sign-in input or authentication settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthDomainError {
    /// The user name is empty after trimming.
    #[error("user name cannot be empty")]
    EmptyUserName,

    /// No bearer token was presented.
    #[error("missing bearer token")]
    MissingCredentials,

    /// A required authentication setting is absent or blank.
    #[error("configuration missing for auth.{0}")]
    MissingSetting(&'static str),

    /// The token lifetime is zero.
    #[error("token lifetime must be at least one hour")]
    InvalidTokenLifetime,
}

impl AuthDomainError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyUserName => ErrorKind::Validation,
            Self::MissingCredentials => ErrorKind::Unauthenticated,
            Self::MissingSetting(_) | Self::InvalidTokenLifetime => ErrorKind::Internal,
        }
    }
}
