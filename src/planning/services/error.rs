//! Service-level errors for planning operations.

use crate::error::ErrorKind;
use crate::planning::{
    domain::{ActivityId, PlanningDomainError, ProjectId},
    ports::PlanningRepositoryError,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by [`ProjectService`](super::ProjectService) and
/// [`ActivityService`](super::ActivityService).
#[derive(Debug, Error)]
pub enum PlanningServiceError {
    /// An invariant guard rejected the change.
    #[error(transparent)]
    Domain(#[from] PlanningDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PlanningRepositoryError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// No activity exists with the given identifier.
    #[error("activity {0} not found")]
    ActivityNotFound(ActivityId),
}

/// Result type for planning service operations.
pub type PlanningServiceResult<T> = Result<T, PlanningServiceError>;

impl PlanningServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::ProjectNotFound(_) | Self::ActivityNotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Records the failure of `operation`.
    pub(super) fn log(&self, operation: &'static str) {
        let kind = self.kind();
        if kind.is_client_error() {
            warn!(operation, kind = %kind, error = %self, "planning request rejected");
        } else {
            error!(operation, kind = %kind, error = %self, "planning request failed");
        }
    }
}
