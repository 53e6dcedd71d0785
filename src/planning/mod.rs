//! Project and activity lifecycle management.
//!
//! Projects own activities. Both aggregates move through the `pending`,
//! `active`, and `closed` states, and every write re-validates the invariants
//! that couple an activity to its owning project. The module follows
//! hexagonal architecture:
//!
//! - Domain types and invariant guards in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
