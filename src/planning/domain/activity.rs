//! Activity aggregate and its invariant guard.

use super::{
    ActivityId, ActivityStatus, PlanningDomainError, Project, ProjectId, ProjectStatus, Version,
    text::non_blank,
};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Activity aggregate.
///
/// An activity references its owning project by identifier. Guards that
/// depend on the project's status receive the project explicitly and verify
/// that it is the owner.
///
/// Stored activities come back through [`Activity::from_persisted`]. There is
/// no serde path into the aggregate; [`ActivityDetails`](super::ActivityDetails)
/// is the wire shape.
///
/// ```compile_fail
/// let _: gropius::planning::domain::Activity =
///     serde_json::from_str(r#"{"name":"","status":"active"}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: ActivityId,
    name: String,
    description: Option<String>,
    assigned_to: Option<String>,
    status: ActivityStatus,
    project_id: ProjectId,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedActivityData {
    /// Persisted activity identifier.
    pub id: ActivityId,
    /// Persisted name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted assignee, if any.
    pub assigned_to: Option<String>,
    /// Persisted lifecycle status.
    pub status: ActivityStatus,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted concurrency token.
    pub version: Version,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Creates a pending activity with a generated identifier inside
    /// `project`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyActivityName`] when `name` is blank
    /// or [`PlanningDomainError::ProjectClosed`] when `project` is closed.
    pub fn new(
        name: &str,
        project: &Project,
        clock: &impl Clock,
    ) -> Result<Self, PlanningDomainError> {
        Self::with_id(ActivityId::new(), name, project, clock)
    }

    /// Creates a pending activity with a caller-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyActivityId`] for the nil
    /// identifier, [`PlanningDomainError::EmptyActivityName`] when `name` is
    /// blank, or [`PlanningDomainError::ProjectClosed`] when `project` is
    /// closed.
    pub fn with_id(
        id: ActivityId,
        name: &str,
        project: &Project,
        clock: &impl Clock,
    ) -> Result<Self, PlanningDomainError> {
        let timestamp = clock.utc();
        let mut activity = Self {
            id: ActivityId::unset(),
            name: String::new(),
            description: None,
            assigned_to: None,
            status: ActivityStatus::Pending,
            project_id: ProjectId::unset(),
            version: Version::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        };
        activity.set_id(id, clock)?;
        activity.set_name(name, clock)?;
        project.ensure_accepts_activity(activity.id, activity.status)?;
        activity.attach_to(project);
        Ok(activity)
    }

    /// Reconstructs an activity from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActivityData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            assigned_to: data.assigned_to,
            status: data.status,
            project_id: data.project_id,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the activity identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the activity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ActivityStatus {
        self.status
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the version the activity was loaded at.
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

    /// Fails when the activity is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] when the status is
    /// `closed`.
    pub const fn ensure_can_update(&self) -> Result<(), PlanningDomainError> {
        if self.status.is_terminal() {
            return Err(PlanningDomainError::ActivityClosed(self.id));
        }
        Ok(())
    }

    /// Assigns the activity identifier.
    ///
    /// Re-assigning the current identifier is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity,
    /// [`PlanningDomainError::EmptyActivityId`] for the nil identifier, or
    /// [`PlanningDomainError::ActivityIdAlreadyAssigned`] when a different
    /// identifier is already set.
    pub fn set_id(
        &mut self,
        id: ActivityId,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        if id.is_unset() {
            return Err(PlanningDomainError::EmptyActivityId);
        }
        if !self.id.is_unset() && self.id != id {
            return Err(PlanningDomainError::ActivityIdAlreadyAssigned {
                current: self.id,
                requested: id,
            });
        }
        self.id = id;
        self.touch(clock);
        Ok(())
    }

    /// Renames the activity. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity
    /// or [`PlanningDomainError::EmptyActivityName`] when `name` is blank.
    pub fn set_name(&mut self, name: &str, clock: &impl Clock) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        self.name = non_blank(name).ok_or(PlanningDomainError::EmptyActivityName)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description. A blank description clears it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity.
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

    /// Replaces the assignee. A blank assignee unassigns the activity.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity
    /// or [`PlanningDomainError::ActiveActivityRequiresAssignee`] when
    /// unassigning an active activity.
    pub fn set_assigned_to(
        &mut self,
        assigned_to: &str,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        let normalized = non_blank(assigned_to);
        if normalized.is_none() && self.status == ActivityStatus::Active {
            return Err(PlanningDomainError::ActiveActivityRequiresAssignee(
                self.id,
            ));
        }
        self.assigned_to = normalized;
        self.touch(clock);
        Ok(())
    }

    /// Changes the lifecycle status.
    ///
    /// `owner` must be the project this activity belongs to; its status
    /// decides whether the activity may become active.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity,
    /// [`PlanningDomainError::UnassignableActivityStatus`] for `undefined`,
    /// [`PlanningDomainError::OwningProjectNotLoaded`] when `owner` is not the
    /// owning project, and for `active`:
    /// [`PlanningDomainError::ActiveActivityRequiresAssignee`] without an
    /// assignee or
    /// [`PlanningDomainError::ActiveActivityRequiresActiveProject`] when the
    /// owner is not active.
    pub fn set_status(
        &mut self,
        status: ActivityStatus,
        owner: &Project,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        if !status.is_assignable() {
            return Err(PlanningDomainError::UnassignableActivityStatus(status));
        }
        self.ensure_owned_by(owner)?;

        if status == ActivityStatus::Active {
            if self.assigned_to.is_none() {
                return Err(PlanningDomainError::ActiveActivityRequiresAssignee(
                    self.id,
                ));
            }
            if owner.status() != ProjectStatus::Active {
                return Err(PlanningDomainError::ActiveActivityRequiresActiveProject {
                    activity_id: self.id,
                    project_id: owner.id(),
                    project_status: owner.status(),
                });
            }
        }

        self.status = status;
        self.touch(clock);
        Ok(())
    }

    /// Moves the activity from `current_owner` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::ActivityClosed`] for a closed activity,
    /// [`PlanningDomainError::OwningProjectNotLoaded`] when `current_owner` is
    /// not the owning project, [`PlanningDomainError::ProjectClosed`] when
    /// either project is closed, or
    /// [`PlanningDomainError::ActiveActivityRequiresActiveProject`] when an
    /// active activity would move to a project that is not active.
    pub fn set_project(
        &mut self,
        current_owner: &Project,
        target: &Project,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.ensure_can_update()?;
        self.ensure_owned_by(current_owner)?;
        current_owner.ensure_can_update()?;
        target.ensure_accepts_activity(self.id, self.status)?;
        self.attach_to(target);
        self.touch(clock);
        Ok(())
    }

    fn ensure_owned_by(&self, project: &Project) -> Result<(), PlanningDomainError> {
        if project.id() != self.project_id {
            return Err(PlanningDomainError::OwningProjectNotLoaded {
                activity_id: self.id,
                expected: self.project_id,
                actual: project.id(),
            });
        }
        Ok(())
    }

    const fn attach_to(&mut self, project: &Project) {
        self.project_id = project.id();
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl From<&Activity> for PersistedActivityData {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            description: activity.description.clone(),
            assigned_to: activity.assigned_to.clone(),
            status: activity.status,
            project_id: activity.project_id,
            version: activity.version,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}
