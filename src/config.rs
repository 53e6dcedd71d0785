//! Layered application settings.
//!
//! Settings are read from an optional TOML file and then from environment
//! variables prefixed with `GROPIUS`, using `__` to separate nesting levels:
//! `GROPIUS__DATABASE__URL`, `GROPIUS__AUTH__SECRET`, and so on.

use crate::auth::domain::{AuthDomainError, AuthSettings};
use crate::error::ErrorKind;
use crate::planning::adapters::postgres::PlanningPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// File consulted by [`Settings::load`], relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gropius.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GROPIUS";

/// Pool size used when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Relational store connection settings.
    pub database: DatabaseSettings,
    /// Token signing settings.
    pub auth: AuthSettings,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// Connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Authentication settings are incomplete.
    #[error(transparent)]
    Auth(#[from] AuthDomainError),
}

impl SettingsError {
    /// Classifies the failure. Settings problems are never the caller's
    /// fault.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

impl Settings {
    /// Loads settings from [`DEFAULT_CONFIG_FILE`] and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source cannot be parsed, a required
    /// value is absent, or authentication settings are blank.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads settings from `path`, if it exists, and the environment.
    /// Environment variables take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source cannot be parsed, a required
    /// value is absent, or authentication settings are blank.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.auth.validate()?;
        Ok(settings)
    }
}

impl DatabaseSettings {
    /// Builds a connection pool for the configured database.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolError`] when the pool cannot open its initial
    /// connections.
    pub fn build_pool(&self) -> Result<PlanningPgPool, PoolError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.url);
        Pool::builder()
            .max_size(self.max_connections)
            .build(manager)
    }
}
