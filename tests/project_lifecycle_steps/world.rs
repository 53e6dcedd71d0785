//! Shared world state for project lifecycle BDD scenarios.

use std::sync::Arc;

use gropius::error::ErrorKind;
use gropius::planning::{
    adapters::memory::InMemoryPlanningRepository,
    domain::{ActivityDetails, ProjectDetails},
    services::{ActivityService, ProjectService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Scenario world for project lifecycle behaviour tests.
pub struct ProjectLifecycleWorld {
    pub projects: ProjectService<InMemoryPlanningRepository, DefaultClock>,
    pub activities: ActivityService<InMemoryPlanningRepository, DefaultClock>,
    pub project: Option<ProjectDetails>,
    pub activity: Option<ActivityDetails>,
    pub last_outcome: Option<Result<(), ErrorKind>>,
}

impl ProjectLifecycleWorld {
    /// Creates a world over an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryPlanningRepository::new());
        let clock = Arc::new(DefaultClock);

        Self {
            projects: ProjectService::new(Arc::clone(&repository), Arc::clone(&clock)),
            activities: ActivityService::new(repository, clock),
            project: None,
            activity: None,
            last_outcome: None,
        }
    }

    /// Returns the project created by a given step.
    ///
    /// # Errors
    ///
    /// Fails when no project has been created yet.
    pub fn project(&self) -> Result<&ProjectDetails, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the activity created by a given step.
    ///
    /// # Errors
    ///
    /// Fails when no activity has been created yet.
    pub fn activity(&self) -> Result<&ActivityDetails, eyre::Report> {
        self.activity
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing activity in scenario world"))
    }
}

impl Default for ProjectLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProjectLifecycleWorld {
    ProjectLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
