//! `PostgreSQL` adapters for planning persistence.

mod conversions;
mod models;
mod repository;
mod schema;

pub use repository::{PlanningPgPool, PostgresPlanningRepository};
