//! Step definitions for project and activity lifecycle scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
