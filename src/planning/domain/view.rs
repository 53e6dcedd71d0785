//! Read models returned to callers.
//!
//! These are plain data holders with public fields, kept apart from the
//! invariant-bearing aggregates they are projected from.

use super::{
    Activity, ActivityId, ActivityStatus, ActivityTally, Project, ProjectId, ProjectStatus,
};
use serde::{Deserialize, Serialize};

/// Compact project listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project status.
    pub status: ProjectStatus,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            status: project.status(),
        }
    }
}

/// Full project view including activity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project description, if any.
    pub description: Option<String>,
    /// Project status.
    pub status: ProjectStatus,
    /// Owned activities counted by status.
    pub activities: ActivityTally,
}

impl From<&Project> for ProjectDetails {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            description: project.description().map(str::to_owned),
            status: project.status(),
            activities: project.activity_tally(),
        }
    }
}

/// Compact activity listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Activity identifier.
    pub id: ActivityId,
    /// Activity name.
    pub name: String,
    /// Activity status.
    pub status: ActivityStatus,
    /// Assignee, if any.
    pub assigned_to: Option<String>,
    /// Owning project.
    pub project_id: ProjectId,
}

impl From<&Activity> for ActivitySummary {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id(),
            name: activity.name().to_owned(),
            status: activity.status(),
            assigned_to: activity.assigned_to().map(str::to_owned),
            project_id: activity.project_id(),
        }
    }
}

/// Full activity view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    /// Activity identifier.
    pub id: ActivityId,
    /// Activity name.
    pub name: String,
    /// Activity description, if any.
    pub description: Option<String>,
    /// Activity status.
    pub status: ActivityStatus,
    /// Assignee, if any.
    pub assigned_to: Option<String>,
    /// Owning project.
    pub project_id: ProjectId,
}

impl From<&Activity> for ActivityDetails {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id(),
            name: activity.name().to_owned(),
            description: activity.description().map(str::to_owned),
            status: activity.status(),
            assigned_to: activity.assigned_to().map(str::to_owned),
            project_id: activity.project_id(),
        }
    }
}
