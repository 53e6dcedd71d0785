//! Error types for planning domain validation and parsing.

use super::{ActivityId, ActivityStatus, ProjectId, ProjectStatus};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors raised by the project and activity invariant guards.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningDomainError {
    /// The project identifier is the nil UUID.
    #[error("project id cannot be empty")]
    EmptyProjectId,

    /// The activity identifier is the nil UUID.
    #[error("activity id cannot be empty")]
    EmptyActivityId,

    /// The project already carries a different identifier.
    #[error("project {current} cannot change its id to {requested}")]
    ProjectIdAlreadyAssigned {
        /// Identifier already assigned.
        current: ProjectId,
        /// Identifier the caller attempted to assign.
        requested: ProjectId,
    },

    /// The activity already carries a different identifier.
    #[error("activity {current} cannot change its id to {requested}")]
    ActivityIdAlreadyAssigned {
        /// Identifier already assigned.
        current: ActivityId,
        /// Identifier the caller attempted to assign.
        requested: ActivityId,
    },

    /// The project name is empty after trimming.
    #[error("project name cannot be empty")]
    EmptyProjectName,

    /// The activity name is empty after trimming.
    #[error("activity name cannot be empty")]
    EmptyActivityName,

    /// The requested project status can never be assigned.
    #[error("project status cannot be {0}")]
    UnassignableProjectStatus(ProjectStatus),

    /// The requested activity status can never be assigned.
    #[error("activity status has invalid value {0}")]
    UnassignableActivityStatus(ActivityStatus),

    /// The project is closed and therefore frozen.
    #[error("project {0} cannot be updated when it has status closed")]
    ProjectClosed(ProjectId),

    /// The activity is closed and therefore frozen.
    #[error("activity {0} cannot be updated when it has status closed")]
    ActivityClosed(ActivityId),

    /// A project status change is blocked by the statuses of its activities.
    #[error(
        "project status cannot be changed to {target} because project has {count} activities with status other than {required}"
    )]
    ActivitiesBlockProjectStatus {
        /// Project being updated.
        project_id: ProjectId,
        /// Requested project status.
        target: ProjectStatus,
        /// Status every activity must have for the change to be legal.
        required: ActivityStatus,
        /// Number of activities with a different status.
        count: usize,
    },

    /// An active activity must have an assignee.
    #[error("activity {0} must be assigned when status is active")]
    ActiveActivityRequiresAssignee(ActivityId),

    /// An active activity can only belong to an active project.
    #[error(
        "activity {activity_id} cannot be active in project {project_id} with status {project_status}"
    )]
    ActiveActivityRequiresActiveProject {
        /// Activity being updated or moved.
        activity_id: ActivityId,
        /// Project the activity belongs to or is moving to.
        project_id: ProjectId,
        /// Status of that project.
        project_status: ProjectStatus,
    },

    /// The project passed as owner is not the activity's owning project.
    #[error("activity {activity_id} belongs to project {expected} but project {actual} was loaded")]
    OwningProjectNotLoaded {
        /// Activity being updated.
        activity_id: ActivityId,
        /// Project the activity references.
        expected: ProjectId,
        /// Project that was supplied.
        actual: ProjectId,
    },
}

impl PlanningDomainError {
    /// Classifies the error for response mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyProjectId
            | Self::EmptyActivityId
            | Self::EmptyProjectName
            | Self::EmptyActivityName
            | Self::UnassignableProjectStatus(_)
            | Self::UnassignableActivityStatus(_) => ErrorKind::Validation,
            Self::ProjectIdAlreadyAssigned { .. }
            | Self::ActivityIdAlreadyAssigned { .. }
            | Self::ProjectClosed(_)
            | Self::ActivityClosed(_)
            | Self::ActivitiesBlockProjectStatus { .. }
            | Self::ActiveActivityRequiresAssignee(_)
            | Self::ActiveActivityRequiresActiveProject { .. } => ErrorKind::Conflict,
            Self::OwningProjectNotLoaded { .. } => ErrorKind::Internal,
        }
    }
}

/// Error returned while parsing a project status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

impl ParseProjectStatusError {
    /// Classifies the error for response mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Error returned while parsing an activity status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity status: {0}")]
pub struct ParseActivityStatusError(pub String);

impl ParseActivityStatusError {
    /// Classifies the error for response mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
