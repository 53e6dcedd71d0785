//! Conversions between diesel rows and planning domain types.

use super::models::{ActivityRow, NewActivityRow, NewProjectRow, ProjectRow};
use crate::planning::{
    domain::{
        Activity, ActivityId, ActivityStatus, PersistedActivityData, PersistedProjectData,
        Project, ProjectId, ProjectStatus, Version,
    },
    ports::{PlanningRepositoryError, PlanningRepositoryResult},
};

pub(super) fn version_to_db(version: Version) -> PlanningRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(PlanningRepositoryError::persistence)
}

pub(super) fn version_from_db(value: i64) -> PlanningRepositoryResult<Version> {
    u64::try_from(value)
        .map(Version::new)
        .map_err(PlanningRepositoryError::invalid_persisted_data)
}

pub(super) fn to_new_project_row(project: &Project) -> PlanningRepositoryResult<NewProjectRow> {
    Ok(NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        status: project.status().as_str().to_owned(),
        version: version_to_db(project.version())?,
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

pub(super) fn to_new_activity_row(activity: &Activity) -> PlanningRepositoryResult<NewActivityRow> {
    Ok(NewActivityRow {
        id: activity.id().into_inner(),
        project_id: activity.project_id().into_inner(),
        name: activity.name().to_owned(),
        description: activity.description().map(str::to_owned),
        assigned_to: activity.assigned_to().map(str::to_owned),
        status: activity.status().as_str().to_owned(),
        version: version_to_db(activity.version())?,
        created_at: activity.created_at(),
        updated_at: activity.updated_at(),
    })
}

pub(super) fn row_to_activity(row: ActivityRow) -> PlanningRepositoryResult<Activity> {
    let ActivityRow {
        id,
        project_id,
        name,
        description,
        assigned_to,
        status,
        version,
        created_at,
        updated_at,
    } = row;

    let parsed_status = ActivityStatus::try_from(status.as_str())
        .map_err(PlanningRepositoryError::invalid_persisted_data)?;

    Ok(Activity::from_persisted(PersistedActivityData {
        id: ActivityId::from_uuid(id),
        name,
        description,
        assigned_to,
        status: parsed_status,
        project_id: ProjectId::from_uuid(project_id),
        version: version_from_db(version)?,
        created_at,
        updated_at,
    }))
}

pub(super) fn row_to_project(
    row: ProjectRow,
    activity_rows: Vec<ActivityRow>,
) -> PlanningRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        description,
        status,
        version,
        created_at,
        updated_at,
    } = row;

    let parsed_status = ProjectStatus::try_from(status.as_str())
        .map_err(PlanningRepositoryError::invalid_persisted_data)?;
    let activities = activity_rows
        .into_iter()
        .map(row_to_activity)
        .collect::<PlanningRepositoryResult<Vec<_>>>()?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name,
        description,
        status: parsed_status,
        activities,
        version: version_from_db(version)?,
        created_at,
        updated_at,
    }))
}

/// Builds an `ILIKE` pattern matching `text` anywhere, with wildcards in
/// `text` taken literally.
pub(super) fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
