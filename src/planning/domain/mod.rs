//! Domain model for projects and activities.
//!
//! The aggregates keep their fields private; every mutation goes through a
//! guard that checks field constraints, the closed-state freeze, and the
//! status coupling between an activity and its owning project. Nothing in
//! this module touches storage.

mod activity;
mod error;
mod ids;
mod project;
mod query;
mod status;
mod text;
mod view;

pub use activity::{Activity, PersistedActivityData};
pub use error::{ParseActivityStatusError, ParseProjectStatusError, PlanningDomainError};
pub use ids::{ActivityId, ProjectId, Version};
pub use project::{ActivityTally, PersistedProjectData, Project};
pub use query::{
    ActivityQuery, ActivitySortField, DEFAULT_PAGE_SIZE, ProjectQuery, ProjectSortField, Sort,
    SortDirection,
};
pub use status::{ActivityStatus, ProjectStatus};
pub use view::{ActivityDetails, ActivitySummary, ProjectDetails, ProjectSummary};
