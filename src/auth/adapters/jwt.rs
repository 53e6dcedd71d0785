//! HS256 JSON Web Token adapter.

use crate::auth::{
    domain::{AuthDomainError, AuthSettings, IssuedToken, Principal, UserName},
    ports::{AccessTokenIssuer, AccessTokenVerifier, TokenError},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed tokens bound to one issuer and audience.
#[derive(Clone)]
pub struct JwtTokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl JwtTokenAuthority {
    /// Builds an authority from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthDomainError`] when a setting is missing.
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthDomainError> {
        settings.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            lifetime: settings.token_lifetime(),
        })
    }
}

impl fmt::Debug for JwtTokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenAuthority")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl AccessTokenIssuer for JwtTokenAuthority {
    fn issue(
        &self,
        subject: &UserName,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Signing("token expiry is out of range".to_owned()))?;
        let claims = Claims {
            sub: subject.as_str().to_owned(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
                .map_err(|error| TokenError::Signing(error.to_string()))?;
        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }
}

impl AccessTokenVerifier for JwtTokenAuthority {
    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| TokenError::Rejected(error.to_string()))?;
        Ok(Principal::new(data.claims.sub))
    }
}
