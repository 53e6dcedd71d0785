//! Adapter implementations for the token ports.

mod jwt;

pub use jwt::JwtTokenAuthority;
