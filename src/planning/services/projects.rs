//! Project request handling.

use super::{PlanningServiceError, PlanningServiceResult};
use crate::planning::{
    domain::{Project, ProjectDetails, ProjectId, ProjectQuery, ProjectStatus, ProjectSummary},
    ports::PlanningRepository,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
}

impl CreateProjectRequest {
    /// Creates a request for a project called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request payload for updating a project. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description; blank clears it.
    #[serde(default)]
    pub description: Option<String>,
    /// Target status.
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// Project application service.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
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

    /// Creates a pending project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Domain`] when the name is blank, or
    /// repository errors.
    #[instrument(name = "ProjectService::create", skip(self, request))]
    pub async fn create(
        &self,
        request: CreateProjectRequest,
    ) -> PlanningServiceResult<ProjectDetails> {
        async {
            let project = Project::new(&request.name, &*self.clock)?;
            self.repository.insert_project(&project).await?;
            info!(project_id = %project.id(), "project created");
            Ok::<_, PlanningServiceError>(ProjectDetails::from(&project))
        }
        .await
        .inspect_err(|err| err.log("project.create"))
    }

    /// Returns a project with its activity counts.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ProjectNotFound`] when no project has
    /// the given identifier, or repository errors.
    #[instrument(name = "ProjectService::get", skip(self), fields(project_id = %id))]
    pub async fn get(&self, id: ProjectId) -> PlanningServiceResult<ProjectDetails> {
        self.find_project_or_error(id)
            .await
            .map(|project| ProjectDetails::from(&project))
            .inspect_err(|err| err.log("project.get"))
    }

    /// Returns one page of projects matching `query`.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    #[instrument(name = "ProjectService::search", skip(self, query))]
    pub async fn search(&self, query: &ProjectQuery) -> PlanningServiceResult<Vec<ProjectSummary>> {
        self.repository
            .search_projects(query)
            .await
            .map_err(PlanningServiceError::from)
            .inspect_err(|err| err.log("project.search"))
    }

    /// Applies `request` to a project.
    ///
    /// The name and description are applied before the status so that the
    /// status guard sees the final field values.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ProjectNotFound`] when no project has
    /// the given identifier, [`PlanningServiceError::Domain`] when a guard
    /// rejects the change, or repository errors including concurrent
    /// modification.
    #[instrument(name = "ProjectService::update", skip(self, request), fields(project_id = %id))]
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> PlanningServiceResult<ProjectDetails> {
        async {
            let mut project = self.find_project_or_error(id).await?;
            let clock = &*self.clock;
            if let Some(name) = request.name.as_deref() {
                project.set_name(name, clock)?;
            }
            if let Some(description) = request.description.as_deref() {
                project.set_description(description, clock)?;
            }
            if let Some(status) = request.status {
                project.set_status(status, clock)?;
            }

            let version = self.repository.update_project(&project).await?;
            info!(project_id = %id, %version, status = %project.status(), "project updated");
            Ok::<_, PlanningServiceError>(ProjectDetails::from(&project))
        }
        .await
        .inspect_err(|err| err.log("project.update"))
    }

    /// Deletes a project and its activities.
    ///
    /// Deleting a project that does not exist succeeds and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    #[instrument(name = "ProjectService::delete", skip(self), fields(project_id = %id))]
    pub async fn delete(&self, id: ProjectId) -> PlanningServiceResult<bool> {
        let deleted = self
            .repository
            .delete_project(id)
            .await
            .map_err(PlanningServiceError::from)
            .inspect_err(|err| err.log("project.delete"))?;
        info!(project_id = %id, deleted, "project delete handled");
        Ok(deleted)
    }
}
