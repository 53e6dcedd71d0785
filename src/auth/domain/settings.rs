//! Token signing configuration.

use super::AuthDomainError;
use chrono::Duration;
use serde::Deserialize;
use std::fmt;

/// Lifetime of issued tokens when none is configured: seven days.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: u32 = 168;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_LIFETIME_HOURS: u32 = 87_600;

/// Symmetric signing secret plus the issuer and audience stamped into and
/// required of every token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSettings {
    /// HMAC signing secret.
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token audience.
    pub audience: String,
    /// Hours an issued token stays valid.
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: u32,
}

const fn default_token_lifetime_hours() -> u32 {
    DEFAULT_TOKEN_LIFETIME_HOURS
}

impl AuthSettings {
    /// Creates settings with the default token lifetime.
    #[must_use]
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            token_lifetime_hours: DEFAULT_TOKEN_LIFETIME_HOURS,
        }
    }

    /// Overrides the token lifetime.
    #[must_use]
    pub const fn with_token_lifetime_hours(mut self, hours: u32) -> Self {
        self.token_lifetime_hours = hours;
        self
    }

    /// Returns the token lifetime.
    #[must_use]
    pub fn token_lifetime(&self) -> Duration {
        Duration::hours(i64::from(self.token_lifetime_hours))
    }

    /// Checks that every setting is present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::MissingSetting`] naming the first blank
    /// setting, or [`AuthDomainError::InvalidTokenLifetime`] for a lifetime
    /// of zero or above [`MAX_TOKEN_LIFETIME_HOURS`].
    pub fn validate(&self) -> Result<(), AuthDomainError> {
        let required = [
            ("secret", &self.secret),
            ("issuer", &self.issuer),
            ("audience", &self.audience),
        ];
        if let Some(&(name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthDomainError::MissingSetting(name));
        }
        if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&self.token_lifetime_hours) {
            return Err(AuthDomainError::InvalidTokenLifetime);
        }
        Ok(())
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_lifetime_hours", &self.token_lifetime_hours)
            .finish()
    }
}
