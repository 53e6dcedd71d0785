//! Sign-in and bearer-token authentication.

use crate::auth::{
    domain::{AuthDomainError, IssuedToken, Principal, UserName},
    ports::{AccessTokenIssuer, AccessTokenVerifier, TokenError},
};
use crate::error::ErrorKind;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

const BEARER_SCHEME: &str = "bearer";

/// Request payload for signing in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// User name to stamp into the token subject.
    pub user_name: String,
}

impl SignInRequest {
    /// Creates a sign-in request.
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }
}

/// Service-level errors for authentication.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Input or configuration was invalid.
    #[error(transparent)]
    Domain(#[from] AuthDomainError),
    /// Token issuance or verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Token(err) => err.kind(),
        }
    }
}

/// Result type for authentication operations.
pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// Issues tokens at sign-in and resolves bearer tokens to principals.
#[derive(Clone)]
pub struct SignInService<T, C>
where
    T: AccessTokenIssuer + AccessTokenVerifier,
    C: Clock + Send + Sync,
{
    tokens: Arc<T>,
    clock: Arc<C>,
}

impl<T, C> SignInService<T, C>
where
    T: AccessTokenIssuer + AccessTokenVerifier,
    C: Clock + Send + Sync,
{
    /// Creates a new sign-in service.
    #[must_use]
    pub const fn new(tokens: Arc<T>, clock: Arc<C>) -> Self {
        Self { tokens, clock }
    }

    /// Issues an access token for the requested user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::EmptyUserName`] for a blank user name or a
    /// signing failure from the token adapter.
    #[instrument(name = "SignInService::sign_in", skip(self, request))]
    pub fn sign_in(&self, request: &SignInRequest) -> AuthServiceResult<IssuedToken> {
        let issued = UserName::new(&request.user_name)
            .map_err(AuthServiceError::from)
            .and_then(|user_name| {
                let token = self.tokens.issue(&user_name, self.clock.utc())?;
                info!(subject = %user_name, expires_at = %token.expires_at, "access token issued");
                Ok(token)
            });
        issued.inspect_err(|err| warn!(kind = %err.kind(), error = %err, "sign-in failed"))
    }

    /// Resolves an `Authorization` header value, with or without the
    /// `Bearer` scheme, to the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::MissingCredentials`] when no token is
    /// present or [`TokenError::Rejected`] when verification fails.
    #[instrument(name = "SignInService::authenticate", skip_all)]
    pub fn authenticate(&self, authorization: &str) -> AuthServiceResult<Principal> {
        let token = strip_bearer_scheme(authorization);
        if token.is_empty() {
            warn!("request carried no bearer token");
            return Err(AuthDomainError::MissingCredentials.into());
        }
        self.tokens
            .verify(token)
            .map_err(AuthServiceError::from)
            .inspect_err(|err| warn!(error = %err, "bearer token rejected"))
    }
}

fn strip_bearer_scheme(authorization: &str) -> &str {
    let trimmed = authorization.trim();
    match trimmed.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ => trimmed,
    }
}
