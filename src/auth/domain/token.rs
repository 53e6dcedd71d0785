//! Sign-in subjects, authenticated principals, and issued tokens.

use super::AuthDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, trimmed user name presented at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Validates a user name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::EmptyUserName`] when `value` is blank.
    pub fn new(value: &str) -> Result<Self, AuthDomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AuthDomainError::EmptyUserName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the user name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    subject: String,
}

impl Principal {
    /// Creates a principal for `subject`.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Returns the token subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Access token returned from sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Encoded bearer token.
    pub access_token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}
