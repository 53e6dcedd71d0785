//! Project aggregate root and its invariant guard.

use super::{
    Activity, ActivityId, ActivityStatus, PlanningDomainError, ProjectId, ProjectStatus, Version,
    text::non_blank,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Number of owned activities in each lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTally {
    /// Activities in `pending`.
    pub pending: usize,
    /// Activities in `active`.
    pub active: usize,
    /// Activities in `closed`.
    pub closed: usize,
}

/// Project aggregate root.
///
/// A project owns the activities loaded with it. Activities refer back to
/// their project by identifier only, so the guards that need both sides take
/// the other side as an argument.
///
/// Stored projects come back through [`Project::from_persisted`]. There is no
/// serde path into the aggregate; [`ProjectDetails`](super::ProjectDetails) is
/// the wire shape.
///
/// ```compile_fail
/// let _: gropius::planning::domain::Project =
///     serde_json::from_str(r#"{"name":"  ","status":"undefined"}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    activities: Vec<Activity>,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Activities owned by the project, in creation order.
    pub activities: Vec<Activity>,
    /// Persisted concurrency token.
    pub version: Version,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a pending project with a generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyProjectName`] when `name` is blank.
    pub fn new(name: &str, clock: &impl Clock) -> Result<Self, PlanningDomainError> {
        Self::with_id(ProjectId::new(), name, clock)
    }

    /// Creates a pending project with a caller-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyProjectId`] for the nil identifier
    /// and [`PlanningDomainError::EmptyProjectName`] when `name` is blank.
    pub fn with_id(
        id: ProjectId,
        name: &str,
        clock: &impl Clock,
    ) -> Result<Self, PlanningDomainError> {
        let timestamp = clock.utc();
        let mut project = Self {
            id: ProjectId::unset(),
            name: String::new(),
            description: None,
            status: ProjectStatus::Pending,
            activities: Vec::new(),
            version: Version::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        };
        project.set_id(id, clock)?;
        project.set_name(name, clock)?;
        Ok(project)
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            activities: data.activities,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the owned activities in creation order.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Returns the owned activity with the given identifier.
    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id() == id)
    }

    /// Returns the version the project was loaded at.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Counts owned activities by status.
    #[must_use]
    pub fn activity_tally(&self) -> ActivityTally {
        self.activities
            .iter()
            .fold(ActivityTally::default(), |mut tally, activity| {
                match activity.status() {
                    ActivityStatus::Pending => tally.pending += 1,
                    ActivityStatus::Active => tally.active += 1,
                    ActivityStatus::Closed => tally.closed += 1,
                    ActivityStatus::Undefined => {}
                }
                tally
            })
    }

    /// Fails when the project is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] when the status is
    /// `closed`.
    pub const fn ensure_can_update(&self) -> Result<(), PlanningDomainError> {
        if self.status.is_terminal() {
            return Err(PlanningDomainError::ProjectClosed(self.id));
        }
        Ok(())
    }

    /// Fails when an activity with `status` cannot be attached to this
    /// project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] when the project is
    /// closed, or
    /// [`PlanningDomainError::ActiveActivityRequiresActiveProject`] when an
    /// active activity would join a project that is not active.
    pub fn ensure_accepts_activity(
        &self,
        activity_id: ActivityId,
        status: ActivityStatus,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        if status == ActivityStatus::Active && self.status != ProjectStatus::Active {
            return Err(PlanningDomainError::ActiveActivityRequiresActiveProject {
                activity_id,
                project_id: self.id,
                project_status: self.status,
            });
        }
        Ok(())
    }

    /// Assigns the project identifier.
    ///
    /// Re-assigning the current identifier is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] for a closed project,
    /// [`PlanningDomainError::EmptyProjectId`] for the nil identifier, or
    /// [`PlanningDomainError::ProjectIdAlreadyAssigned`] when a different
    /// identifier is already set.
    pub fn set_id(&mut self, id: ProjectId, clock: &impl Clock) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        if id.is_unset() {
            return Err(PlanningDomainError::EmptyProjectId);
        }
        if !self.id.is_unset() && self.id != id {
            return Err(PlanningDomainError::ProjectIdAlreadyAssigned {
                current: self.id,
                requested: id,
            });
        }
        self.id = id;
        self.touch(clock);
        Ok(())
    }

    /// Renames the project. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] for a closed project or
    /// [`PlanningDomainError::EmptyProjectName`] when `name` is blank.
    pub fn set_name(&mut self, name: &str, clock: &impl Clock) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        self.name = non_blank(name).ok_or(PlanningDomainError::EmptyProjectName)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description. A blank description clears it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] for a closed project.
    pub fn set_description(
        &mut self,
        description: &str,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        self.description = non_blank(description);
        self.touch(clock);
        Ok(())
    }

    /// Changes the lifecycle status.
    ///
    /// Moving to `pending` requires every owned activity to be pending;
    /// moving to `closed` requires every owned activity to be closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ProjectClosed`] for a closed project,
    /// [`PlanningDomainError::UnassignableProjectStatus`] for `undefined`, or
    /// [`PlanningDomainError::ActivitiesBlockProjectStatus`] when owned
    /// activities do not allow the change.
    pub fn set_status(
        &mut self,
        status: ProjectStatus,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        let required = match status {
            ProjectStatus::Undefined => {
                return Err(PlanningDomainError::UnassignableProjectStatus(status));
            }
            ProjectStatus::Pending => Some(ActivityStatus::Pending),
            ProjectStatus::Closed => Some(ActivityStatus::Closed),
            ProjectStatus::Active => None,
        };

        if let Some(required_status) = required {
            let count = self
                .activities
                .iter()
                .filter(|activity| activity.status() != required_status)
                .count();
            if count > 0 {
                return Err(PlanningDomainError::ActivitiesBlockProjectStatus {
                    project_id: self.id,
                    target: status,
                    required: required_status,
                    count,
                });
            }
        }

        self.status = status;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl From<&Project> for PersistedProjectData {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            activities: project.activities.clone(),
            version: project.version,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
