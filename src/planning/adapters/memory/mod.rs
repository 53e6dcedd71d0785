//! In-memory adapters for planning persistence.

mod repository;

pub use repository::InMemoryPlanningRepository;
