//! Bearer-token authentication.
//!
//! Callers sign in with a user name and receive a signed access token; every
//! other operation presents that token and is resolved to a [`Principal`].
//! The planning core only needs to know that a caller is authenticated, so
//! this context stays independent of it.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! [`Principal`]: domain::Principal

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
