//! Gropius: project and activity lifecycle management.
//!
//! This crate provides the core of a small project tracker: projects own
//! activities, both move through a `pending` → `active` → `closed` lifecycle,
//! and the rules coupling an activity's status to its owning project's status
//! are enforced on every write.
//!
//! # Architecture
//!
//! Gropius follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, token signing)
//! - **Services**: Orchestration of ports around domain guards
//!
//! # Modules
//!
//! - [`planning`]: Projects, activities, and their status invariants
//! - [`auth`]: Sign-in and bearer token verification
//! - [`config`]: Layered runtime settings
//! - [`error`]: Error classification shared by all modules

pub mod auth;
pub mod config;
pub mod error;
pub mod planning;
