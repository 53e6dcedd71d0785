//! Repository port for projects and their activities.
//!
//! Writes are compare-and-swap on each aggregate's [`Version`]. The project
//! is the consistency root for its activities: every activity write also
//! bumps the version of each project listed in its [`ProjectVersionCheck`]s,
//! so a concurrent writer that validated against an older snapshot of the
//! project fails instead of committing a state the guards never saw.

use crate::error::ErrorKind;
use crate::planning::domain::{
    Activity, ActivityId, ActivityQuery, ActivitySummary, Project, ProjectId, ProjectQuery,
    ProjectSummary, Version,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning repository operations.
pub type PlanningRepositoryResult<T> = Result<T, PlanningRepositoryError>;

/// Expected version of a project that an activity write relied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectVersionCheck {
    /// Project whose version is checked and bumped.
    pub project_id: ProjectId,
    /// Version the project was loaded at.
    pub expected: Version,
}

impl ProjectVersionCheck {
    /// Builds a check against the version `project` was loaded at.
    #[must_use]
    pub const fn of(project: &Project) -> Self {
        Self {
            project_id: project.id(),
            expected: project.version(),
        }
    }
}

/// Persistence contract for projects and activities.
#[async_trait]
pub trait PlanningRepository: Send + Sync {
    /// Stores a new project. Owned activities are not written.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn insert_project(&self, project: &Project) -> PlanningRepositoryResult<()>;

    /// Loads a project together with its activities, ordered by creation
    /// time and then identifier.
    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>>;

    /// Writes the project's own fields if its stored version still equals
    /// `project.version()`, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::ProjectNotFound`] when the project
    /// does not exist or [`PlanningRepositoryError::ConcurrentModification`]
    /// when the stored version differs.
    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<Version>;

    /// Deletes a project and all of its activities. Returns `false` when
    /// nothing was deleted.
    async fn delete_project(&self, id: ProjectId) -> PlanningRepositoryResult<bool>;

    /// Returns one page of projects matching `query`.
    async fn search_projects(
        &self,
        query: &ProjectQuery,
    ) -> PlanningRepositoryResult<Vec<ProjectSummary>>;

    /// Stores a new activity and bumps the owning project's version.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::DuplicateActivity`] when the
    /// identifier already exists, [`PlanningRepositoryError::ProjectNotFound`]
    /// when the owner does not exist, or
    /// [`PlanningRepositoryError::ConcurrentModification`] when the owner's
    /// version differs from `owner.expected`.
    async fn insert_activity(
        &self,
        activity: &Activity,
        owner: ProjectVersionCheck,
    ) -> PlanningRepositoryResult<()>;

    /// Loads an activity by identifier.
    async fn find_activity(&self, id: ActivityId) -> PlanningRepositoryResult<Option<Activity>>;

    /// Writes the activity if its stored version still equals
    /// `activity.version()`, bumping every project in `projects` under the
    /// same check. Returns the activity's new version.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::ActivityNotFound`] or
    /// [`PlanningRepositoryError::ProjectNotFound`] for missing rows, or
    /// [`PlanningRepositoryError::ConcurrentModification`] when any version
    /// differs. Nothing is written on failure.
    async fn update_activity(
        &self,
        activity: &Activity,
        projects: &[ProjectVersionCheck],
    ) -> PlanningRepositoryResult<Version>;

    /// Deletes an activity and bumps its owner's version. Returns `false`
    /// when nothing was deleted.
    async fn delete_activity(&self, id: ActivityId) -> PlanningRepositoryResult<bool>;

    /// Returns one page of activities matching `query`.
    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> PlanningRepositoryResult<Vec<ActivitySummary>>;
}

/// Aggregate named in a concurrency failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionedEntity {
    /// A project.
    Project(ProjectId),
    /// An activity.
    Activity(ActivityId),
}

impl fmt::Display for VersionedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(id) => write!(f, "project {id}"),
            Self::Activity(id) => write!(f, "activity {id}"),
        }
    }
}

/// Errors returned by planning repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanningRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// An activity with the same identifier already exists.
    #[error("duplicate activity identifier: {0}")]
    DuplicateActivity(ActivityId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The activity was not found.
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),

    /// The stored version no longer matches the version that was loaded.
    #[error("{entity} was modified concurrently (expected version {expected})")]
    ConcurrentModification {
        /// Aggregate whose version differed.
        entity: VersionedEntity,
        /// Version the writer loaded.
        expected: Version,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted planning data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanningRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns a concurrency failure for `project_id`.
    #[must_use]
    pub const fn stale_project(project_id: ProjectId, expected: Version) -> Self {
        Self::ConcurrentModification {
            entity: VersionedEntity::Project(project_id),
            expected,
        }
    }

    /// Returns a concurrency failure for `activity_id`.
    #[must_use]
    pub const fn stale_activity(activity_id: ActivityId, expected: Version) -> Self {
        Self::ConcurrentModification {
            entity: VersionedEntity::Activity(activity_id),
            expected,
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateProject(_)
            | Self::DuplicateActivity(_)
            | Self::ConcurrentModification { .. } => ErrorKind::Conflict,
            Self::ProjectNotFound(_) | Self::ActivityNotFound(_) => ErrorKind::NotFound,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}
