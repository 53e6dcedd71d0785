//! Port contracts for project and activity persistence.

mod repository;

pub use repository::{
    PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult, ProjectVersionCheck,
    VersionedEntity,
};
