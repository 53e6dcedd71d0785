//! In-memory repository for projects and activities.
//!
//! Each write takes the state lock once, runs every version check, and only
//! then mutates, so a failed check leaves the state untouched.
//!
//! Name sorts compare lowercased names and break ties by id, the same order
//! the `PostgreSQL` adapter produces with `lower(name)` under a `C` collation.

use crate::planning::{
    domain::{
        Activity, ActivityId, ActivityQuery, ActivitySortField, ActivitySummary,
        PersistedActivityData, PersistedProjectData, Project, ProjectId, ProjectQuery,
        ProjectSortField, ProjectSummary, Sort, Version,
    },
    ports::{
        PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult,
        ProjectVersionCheck,
    },
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory planning repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningRepository {
    state: Arc<RwLock<InMemoryPlanningState>>,
}

#[derive(Debug, Default)]
struct InMemoryPlanningState {
    /// Project rows; `activities` is always empty here.
    projects: HashMap<ProjectId, PersistedProjectData>,
    activities: HashMap<ActivityId, PersistedActivityData>,
}

impl InMemoryPlanningState {
    fn check_project(&self, check: ProjectVersionCheck) -> PlanningRepositoryResult<()> {
        let stored = self
            .projects
            .get(&check.project_id)
            .ok_or(PlanningRepositoryError::ProjectNotFound(check.project_id))?;
        if stored.version != check.expected {
            return Err(PlanningRepositoryError::stale_project(
                check.project_id,
                check.expected,
            ));
        }
        Ok(())
    }

    fn ensure_project_exists(&self, project_id: ProjectId) -> PlanningRepositoryResult<()> {
        if self.projects.contains_key(&project_id) {
            Ok(())
        } else {
            Err(PlanningRepositoryError::ProjectNotFound(project_id))
        }
    }

    fn bump_project(&mut self, project_id: ProjectId) {
        if let Some(stored) = self.projects.get_mut(&project_id) {
            stored.version = stored.version.next();
        }
    }

    fn load_project(&self, project_id: ProjectId) -> Option<Project> {
        let mut data = self.projects.get(&project_id)?.clone();
        let mut owned: Vec<&PersistedActivityData> = self
            .activities
            .values()
            .filter(|activity| activity.project_id == project_id)
            .collect();
        owned.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        data.activities = owned
            .into_iter()
            .cloned()
            .map(Activity::from_persisted)
            .collect();
        Some(Project::from_persisted(data))
    }
}

impl InMemoryPlanningRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PlanningRepositoryResult<RwLockReadGuard<'_, InMemoryPlanningState>> {
        self.state.read().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> PlanningRepositoryResult<RwLockWriteGuard<'_, InMemoryPlanningState>> {
        self.state.write().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl PlanningRepository for InMemoryPlanningRepository {
    async fn insert_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id()) {
            return Err(PlanningRepositoryError::DuplicateProject(project.id()));
        }

        let mut data = PersistedProjectData::from(project);
        data.activities.clear();
        state.projects.insert(project.id(), data);
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.load_project(id))
    }

    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<Version> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(PlanningRepositoryError::ProjectNotFound(project.id()))?;
        if stored.version != project.version() {
            return Err(PlanningRepositoryError::stale_project(
                project.id(),
                project.version(),
            ));
        }

        stored.name = project.name().to_owned();
        stored.description = project.description().map(str::to_owned);
        stored.status = project.status();
        stored.updated_at = project.updated_at();
        stored.version = stored.version.next();
        Ok(stored.version)
    }

    async fn delete_project(&self, id: ProjectId) -> PlanningRepositoryResult<bool> {
        let mut state = self.write()?;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.activities.retain(|_, activity| activity.project_id != id);
        Ok(true)
    }

    async fn search_projects(
        &self,
        query: &ProjectQuery,
    ) -> PlanningRepositoryResult<Vec<ProjectSummary>> {
        let state = self.read()?;
        let mut matches: Vec<Project> = state
            .projects
            .values()
            .cloned()
            .map(Project::from_persisted)
            .filter(|project| query.matches(project))
            .collect();
        matches.sort_by(|left, right| compare_projects(query.sort(), left, right));

        Ok(page(matches, query.skip(), query.take())
            .iter()
            .map(ProjectSummary::from)
            .collect())
    }

    async fn insert_activity(
        &self,
        activity: &Activity,
        owner: ProjectVersionCheck,
    ) -> PlanningRepositoryResult<()> {
        let mut state = self.write()?;
        if state.activities.contains_key(&activity.id()) {
            return Err(PlanningRepositoryError::DuplicateActivity(activity.id()));
        }
        state.check_project(owner)?;
        state.ensure_project_exists(activity.project_id())?;

        state
            .activities
            .insert(activity.id(), PersistedActivityData::from(activity));
        state.bump_project(owner.project_id);
        Ok(())
    }

    async fn find_activity(&self, id: ActivityId) -> PlanningRepositoryResult<Option<Activity>> {
        let state = self.read()?;
        Ok(state.activities.get(&id).cloned().map(Activity::from_persisted))
    }

    async fn update_activity(
        &self,
        activity: &Activity,
        projects: &[ProjectVersionCheck],
    ) -> PlanningRepositoryResult<Version> {
        let mut state = self.write()?;
        let stored_version = state
            .activities
            .get(&activity.id())
            .ok_or(PlanningRepositoryError::ActivityNotFound(activity.id()))?
            .version;
        if stored_version != activity.version() {
            return Err(PlanningRepositoryError::stale_activity(
                activity.id(),
                activity.version(),
            ));
        }
        for check in projects {
            state.check_project(*check)?;
        }
        state.ensure_project_exists(activity.project_id())?;

        let mut data = PersistedActivityData::from(activity);
        data.version = stored_version.next();
        let new_version = data.version;
        state.activities.insert(activity.id(), data);
        for check in projects {
            state.bump_project(check.project_id);
        }
        Ok(new_version)
    }

    async fn delete_activity(&self, id: ActivityId) -> PlanningRepositoryResult<bool> {
        let mut state = self.write()?;
        let Some(removed) = state.activities.remove(&id) else {
            return Ok(false);
        };
        state.bump_project(removed.project_id);
        Ok(true)
    }

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> PlanningRepositoryResult<Vec<ActivitySummary>> {
        let state = self.read()?;
        let mut matches: Vec<Activity> = state
            .activities
            .values()
            .cloned()
            .map(Activity::from_persisted)
            .filter(|activity| query.matches(activity))
            .collect();
        matches.sort_by(|left, right| compare_activities(query.sort(), left, right));

        Ok(page(matches, query.skip(), query.take())
            .iter()
            .map(ActivitySummary::from)
            .collect())
    }
}

fn compare_projects(sort: Sort<ProjectSortField>, left: &Project, right: &Project) -> Ordering {
    let by_field = match sort.field() {
        ProjectSortField::Id => left.id().cmp(&right.id()),
        ProjectSortField::Name => compare_names(left.name(), right.name()),
        ProjectSortField::Status => left.status().as_str().cmp(right.status().as_str()),
    };
    sort.direction()
        .apply(by_field)
        .then_with(|| left.id().cmp(&right.id()))
}

fn compare_activities(
    sort: Sort<ActivitySortField>,
    left: &Activity,
    right: &Activity,
) -> Ordering {
    let by_field = match sort.field() {
        ActivitySortField::Id => left.id().cmp(&right.id()),
        ActivitySortField::Name => compare_names(left.name(), right.name()),
        ActivitySortField::Status => left.status().as_str().cmp(right.status().as_str()),
        // Unassigned sorts last when ascending, matching SQL `NULLS LAST`.
        ActivitySortField::AssignedTo => (left.assigned_to().is_none(), left.assigned_to())
            .cmp(&(right.assigned_to().is_none(), right.assigned_to())),
    };
    sort.direction()
        .apply(by_field)
        .then_with(|| left.id().cmp(&right.id()))
}

fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

fn page<T>(items: Vec<T>, skip: u32, take: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(take).unwrap_or(usize::MAX))
        .collect()
}
