//! Project lifecycle tests through the planning services.

use super::helpers::{Planning, activity_status, planning, project_status};
use gropius::error::ErrorKind;
use gropius::planning::{
    domain::{ActivityStatus, ActivityTally, PlanningDomainError, ProjectStatus},
    ports::PlanningRepository,
    services::{CreateActivityRequest, PlanningServiceError, UpdateProjectRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_runs_from_pending_to_closed(planning: Planning) {
    let project = planning
        .project("Weimar school", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .assigned_activity(project.id, "Draft curriculum", "gropius")
        .await
        .expect("assigned activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Active))
        .await
        .expect("activate activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Closed))
        .await
        .expect("close activity");

    let closed = planning
        .projects
        .update(project.id, project_status(ProjectStatus::Closed))
        .await
        .expect("close project");

    assert_eq!(closed.status, ProjectStatus::Closed);
    assert_eq!(
        closed.activities,
        ActivityTally {
            pending: 0,
            active: 0,
            closed: 1,
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_activities_block_closing_the_project(planning: Planning) {
    let project = planning
        .project("Dessau campus", ProjectStatus::Active)
        .await
        .expect("active project");
    planning
        .activities
        .create(CreateActivityRequest::new("Pour foundations", project.id))
        .await
        .expect("pending activity");

    let err = planning
        .projects
        .update(project.id, project_status(ProjectStatus::Closed))
        .await
        .expect_err("pending activity blocks close");

    assert!(matches!(
        err,
        PlanningServiceError::Domain(PlanningDomainError::ActivitiesBlockProjectStatus {
            target: ProjectStatus::Closed,
            required: ActivityStatus::Closed,
            count: 1,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let stored = planning.projects.get(project.id).await.expect("get project");
    assert_eq!(stored.status, ProjectStatus::Active);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_returns_to_pending_only_with_pending_activities(planning: Planning) {
    let project = planning
        .project("Masters' houses", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .assigned_activity(project.id, "Survey plot", "meyer")
        .await
        .expect("assigned activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Active))
        .await
        .expect("activate activity");

    let blocked = planning
        .projects
        .update(project.id, project_status(ProjectStatus::Pending))
        .await;
    assert!(matches!(
        blocked,
        Err(PlanningServiceError::Domain(
            PlanningDomainError::ActivitiesBlockProjectStatus {
                required: ActivityStatus::Pending,
                ..
            }
        ))
    ));

    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Pending))
        .await
        .expect("deactivate activity");
    let pending = planning
        .projects
        .update(project.id, project_status(ProjectStatus::Pending))
        .await
        .expect("back to pending");
    assert_eq!(pending.status, ProjectStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_project_rejects_every_change(planning: Planning) {
    let project = planning
        .project("Archive", ProjectStatus::Closed)
        .await
        .expect("closed project");

    let rename = planning
        .projects
        .update(
            project.id,
            UpdateProjectRequest {
                name: Some("Reopened archive".to_owned()),
                ..UpdateProjectRequest::default()
            },
        )
        .await;
    let new_activity = planning
        .activities
        .create(CreateActivityRequest::new("Late addition", project.id))
        .await;

    assert!(matches!(
        rename,
        Err(PlanningServiceError::Domain(PlanningDomainError::ProjectClosed(id))) if id == project.id
    ));
    assert!(matches!(
        new_activity,
        Err(PlanningServiceError::Domain(PlanningDomainError::ProjectClosed(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_fields_are_normalised(planning: Planning) {
    let project = planning
        .project("  Fagus factory  ", ProjectStatus::Pending)
        .await
        .expect("project");

    let described = planning
        .projects
        .update(
            project.id,
            UpdateProjectRequest {
                description: Some("  Shoe-last works in Alfeld ".to_owned()),
                ..UpdateProjectRequest::default()
            },
        )
        .await
        .expect("describe project");
    let cleared = planning
        .projects
        .update(
            project.id,
            UpdateProjectRequest {
                description: Some("   ".to_owned()),
                ..UpdateProjectRequest::default()
            },
        )
        .await
        .expect("clear description");

    assert_eq!(project.name, "Fagus factory");
    assert_eq!(
        described.description.as_deref(),
        Some("Shoe-last works in Alfeld")
    );
    assert_eq!(cleared.description, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_activities(planning: Planning) {
    let project = planning
        .project("Temporary pavilion", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .assigned_activity(project.id, "Raise frame", "breuer")
        .await
        .expect("assigned activity");

    let deleted = planning
        .projects
        .delete(project.id)
        .await
        .expect("delete project");

    assert!(deleted);
    let orphan = planning
        .repository
        .find_activity(activity.id)
        .await
        .expect("find activity");
    assert_eq!(orphan, None);
    let err = planning
        .activities
        .get(activity.id)
        .await
        .expect_err("activity removed with project");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(
        !planning
            .projects
            .delete(project.id)
            .await
            .expect("repeat delete")
    );
}
