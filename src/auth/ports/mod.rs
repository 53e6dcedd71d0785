//! Port contracts for issuing and verifying access tokens.

mod token;

pub use token::{AccessTokenIssuer, AccessTokenVerifier, TokenError};
