//! Application services for project and activity requests.

mod activities;
mod error;
mod projects;

pub use activities::{ActivityService, CreateActivityRequest, UpdateActivityRequest};
pub use error::{PlanningServiceError, PlanningServiceResult};
pub use projects::{CreateProjectRequest, ProjectService, UpdateProjectRequest};
