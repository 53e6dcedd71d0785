//! Activity request handling.

use super::{PlanningServiceError, PlanningServiceResult};
use crate::planning::{
    domain::{
        Activity, ActivityDetails, ActivityId, ActivityQuery, ActivityStatus, ActivitySummary,
        Project, ProjectId,
    },
    ports::{PlanningRepository, ProjectVersionCheck},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Request payload for creating an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateActivityRequest {
    /// Activity name.
    pub name: String,
    /// Project that will own the activity.
    pub project_id: ProjectId,
}

impl CreateActivityRequest {
    /// Creates a request for an activity called `name` inside `project_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            name: name.into(),
            project_id,
        }
    }
}

/// Request payload for updating an activity. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description; blank clears it.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement assignee; blank unassigns.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Target status.
    #[serde(default)]
    pub status: Option<ActivityStatus>,
    /// Project to move the activity to.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// Activity application service.
#[derive(Clone)]
pub struct ActivityService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ActivityService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new activity service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    async fn find_project_or_error(&self, id: ProjectId) -> PlanningServiceResult<Project> {
        self.repository
            .find_project(id)
            .await?
            .ok_or(PlanningServiceError::ProjectNotFound(id))
    }

    async fn find_activity_or_error(&self, id: ActivityId) -> PlanningServiceResult<Activity> {
        self.repository
            .find_activity(id)
            .await?
            .ok_or(PlanningServiceError::ActivityNotFound(id))
    }

    /// Creates a pending activity inside an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ProjectNotFound`] when the project does
    /// not exist, [`PlanningServiceError::Domain`] when the name is blank or
    /// the project is closed, or repository errors.
    #[instrument(
        name = "ActivityService::create",
        skip(self, request),
        fields(project_id = %request.project_id)
    )]
    pub async fn create(
        &self,
        request: CreateActivityRequest,
    ) -> PlanningServiceResult<ActivityDetails> {
        async {
            let project = self.find_project_or_error(request.project_id).await?;
            let activity = Activity::new(&request.name, &project, &*self.clock)?;
            self.repository
                .insert_activity(&activity, ProjectVersionCheck::of(&project))
                .await?;
            info!(
                activity_id = %activity.id(),
                project_id = %project.id(),
                "activity created"
            );
            Ok::<_, PlanningServiceError>(ActivityDetails::from(&activity))
        }
        .await
        .inspect_err(|err| err.log("activity.create"))
    }

    /// Returns an activity.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ActivityNotFound`] when no activity has
    /// the given identifier, or repository errors.
    #[instrument(name = "ActivityService::get", skip(self), fields(activity_id = %id))]
    pub async fn get(&self, id: ActivityId) -> PlanningServiceResult<ActivityDetails> {
        self.find_activity_or_error(id)
            .await
            .map(|activity| ActivityDetails::from(&activity))
            .inspect_err(|err| err.log("activity.get"))
    }

    /// Returns one page of activities matching `query`.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    #[instrument(name = "ActivityService::search", skip(self, query))]
    pub async fn search(
        &self,
        query: &ActivityQuery,
    ) -> PlanningServiceResult<Vec<ActivitySummary>> {
        self.repository
            .search_activities(query)
            .await
            .map_err(PlanningServiceError::from)
            .inspect_err(|err| err.log("activity.search"))
    }

    /// Applies `request` to an activity.
    ///
    /// Fields are applied in the order name, description, assignee, status,
    /// project, so an assignee given alongside `active` is in place before
    /// the status guard runs. The owning project's version is always checked;
    /// a move also checks the target project's version.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ActivityNotFound`] or
    /// [`PlanningServiceError::ProjectNotFound`] for missing aggregates,
    /// [`PlanningServiceError::Domain`] when a guard rejects the change, or
    /// repository errors including concurrent modification. Because status is
    /// applied before the move, a new status is judged against the current
    /// owner: activating while moving out of a pending project fails even if
    /// the target is active, and deactivating while moving into a pending
    /// project succeeds.
    #[instrument(
        name = "ActivityService::update",
        skip(self, request),
        fields(activity_id = %id)
    )]
    pub async fn update(
        &self,
        id: ActivityId,
        request: UpdateActivityRequest,
    ) -> PlanningServiceResult<ActivityDetails> {
        async {
            let mut activity = self.find_activity_or_error(id).await?;
            let owner = self.find_project_or_error(activity.project_id()).await?;
            let clock = &*self.clock;

            if let Some(name) = request.name.as_deref() {
                activity.set_name(name, clock)?;
            }
            if let Some(description) = request.description.as_deref() {
                activity.set_description(description, clock)?;
            }
            if let Some(assigned_to) = request.assigned_to.as_deref() {
                activity.set_assigned_to(assigned_to, clock)?;
            }
            if let Some(status) = request.status {
                activity.set_status(status, &owner, clock)?;
            }

            let mut checks = vec![ProjectVersionCheck::of(&owner)];
            match request.project_id {
                Some(target_id) if target_id != owner.id() => {
                    let target = self.find_project_or_error(target_id).await?;
                    activity.set_project(&owner, &target, clock)?;
                    checks.push(ProjectVersionCheck::of(&target));
                }
                Some(_) => activity.set_project(&owner, &owner, clock)?,
                None => {}
            }

            let version = self.repository.update_activity(&activity, &checks).await?;
            info!(
                activity_id = %id,
                project_id = %activity.project_id(),
                %version,
                status = %activity.status(),
                "activity updated"
            );
            Ok::<_, PlanningServiceError>(ActivityDetails::from(&activity))
        }
        .await
        .inspect_err(|err| err.log("activity.update"))
    }

    /// Deletes an activity.
    ///
    /// Deleting an activity that does not exist succeeds and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    #[instrument(name = "ActivityService::delete", skip(self), fields(activity_id = %id))]
    pub async fn delete(&self, id: ActivityId) -> PlanningServiceResult<bool> {
        let deleted = self
            .repository
            .delete_activity(id)
            .await
            .map_err(PlanningServiceError::from)
            .inspect_err(|err| err.log("activity.delete"))?;
        info!(activity_id = %id, deleted, "activity delete handled");
        Ok(deleted)
    }
}
