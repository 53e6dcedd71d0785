//! Authentication domain types.

mod error;
mod settings;
mod token;

pub use error::AuthDomainError;
pub use settings::{AuthSettings, DEFAULT_TOKEN_LIFETIME_HOURS, MAX_TOKEN_LIFETIME_HOURS};
pub use token::{IssuedToken, Principal, UserName};
