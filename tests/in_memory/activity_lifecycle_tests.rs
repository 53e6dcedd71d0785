//! Activity lifecycle tests, including moves between projects.

use super::helpers::{Planning, activity_status, planning, project_status};
use gropius::error::ErrorKind;
use gropius::planning::{
    domain::{ActivityStatus, PlanningDomainError, ProjectId, ProjectStatus, Version},
    ports::PlanningRepository,
    services::{CreateActivityRequest, PlanningServiceError, UpdateActivityRequest},
};
use rstest::rstest;

fn move_to(project_id: ProjectId) -> UpdateActivityRequest {
    UpdateActivityRequest {
        project_id: Some(project_id),
        ..UpdateActivityRequest::default()
    }
}

async fn project_version(planning: &Planning, id: ProjectId) -> Version {
    planning
        .repository
        .find_project(id)
        .await
        .expect("find project")
        .expect("project exists")
        .version()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activity_needs_assignee_and_active_project_to_start(planning: Planning) {
    let project = planning
        .project("Bauhaus building", ProjectStatus::Pending)
        .await
        .expect("pending project");
    let unassigned = planning
        .activities
        .create(CreateActivityRequest::new("Glass curtain wall", project.id))
        .await
        .expect("pending activity");

    let without_assignee = planning
        .activities
        .update(unassigned.id, activity_status(ActivityStatus::Active))
        .await
        .expect_err("no assignee");
    let in_pending_project = planning
        .activities
        .update(
            unassigned.id,
            UpdateActivityRequest {
                assigned_to: Some("gropius".to_owned()),
                status: Some(ActivityStatus::Active),
                ..UpdateActivityRequest::default()
            },
        )
        .await
        .expect_err("project not active");

    assert!(matches!(
        without_assignee,
        PlanningServiceError::Domain(PlanningDomainError::ActiveActivityRequiresAssignee(_))
    ));
    assert!(matches!(
        in_pending_project,
        PlanningServiceError::Domain(
            PlanningDomainError::ActiveActivityRequiresActiveProject {
                project_status: ProjectStatus::Pending,
                ..
            }
        )
    ));
    assert_eq!(in_pending_project.kind(), ErrorKind::Conflict);
    let stored = planning
        .activities
        .get(unassigned.id)
        .await
        .expect("get activity");
    assert_eq!(stored.assigned_to, None);
    assert_eq!(stored.status, ActivityStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_activity_cannot_be_unassigned(planning: Planning) {
    let project = planning
        .project("Törten estate", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .assigned_activity(project.id, "Prefabricate walls", "meyer")
        .await
        .expect("assigned activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Active))
        .await
        .expect("activate");

    let err = planning
        .activities
        .update(
            activity.id,
            UpdateActivityRequest {
                assigned_to: Some("  ".to_owned()),
                ..UpdateActivityRequest::default()
            },
        )
        .await
        .expect_err("active activity keeps its assignee");

    assert!(matches!(
        err,
        PlanningServiceError::Domain(PlanningDomainError::ActiveActivityRequiresAssignee(id))
            if id == activity.id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_activity_is_frozen(planning: Planning) {
    let project = planning
        .project("Exhibition", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .activities
        .create(CreateActivityRequest::new("Hang posters", project.id))
        .await
        .expect("activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Closed))
        .await
        .expect("close pending activity");

    let err = planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Pending))
        .await
        .expect_err("closed activity is frozen");

    assert!(matches!(
        err,
        PlanningServiceError::Domain(PlanningDomainError::ActivityClosed(id)) if id == activity.id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_an_activity_bumps_both_projects(planning: Planning) {
    let source = planning
        .project("Source", ProjectStatus::Active)
        .await
        .expect("source project");
    let target = planning
        .project("Target", ProjectStatus::Pending)
        .await
        .expect("target project");
    let activity = planning
        .assigned_activity(source.id, "Relocate", "albers")
        .await
        .expect("assigned activity");
    let source_before = project_version(&planning, source.id).await;
    let target_before = project_version(&planning, target.id).await;

    let moved = planning
        .activities
        .update(activity.id, move_to(target.id))
        .await
        .expect("move pending activity");

    assert_eq!(moved.project_id, target.id);
    assert_eq!(project_version(&planning, source.id).await, source_before.next());
    assert_eq!(project_version(&planning, target.id).await, target_before.next());
    let source_details = planning.projects.get(source.id).await.expect("source");
    let target_details = planning.projects.get(target.id).await.expect("target");
    assert_eq!(source_details.activities.pending, 0);
    assert_eq!(target_details.activities.pending, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_activity_cannot_move_to_inactive_project(planning: Planning) {
    let source = planning
        .project("Running", ProjectStatus::Active)
        .await
        .expect("source project");
    let target = planning
        .project("Waiting", ProjectStatus::Pending)
        .await
        .expect("target project");
    let activity = planning
        .assigned_activity(source.id, "Keep going", "klee")
        .await
        .expect("assigned activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Active))
        .await
        .expect("activate");

    let err = planning
        .activities
        .update(activity.id, move_to(target.id))
        .await
        .expect_err("target is not active");

    assert!(matches!(
        err,
        PlanningServiceError::Domain(
            PlanningDomainError::ActiveActivityRequiresActiveProject { project_id, .. }
        ) if project_id == target.id
    ));
    let stored = planning.activities.get(activity.id).await.expect("get");
    assert_eq!(stored.project_id, source.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activity_cannot_move_into_closed_project(planning: Planning) {
    let source = planning
        .project("Open", ProjectStatus::Pending)
        .await
        .expect("source project");
    let closed = planning
        .project("Done", ProjectStatus::Closed)
        .await
        .expect("closed project");
    let activity = planning
        .activities
        .create(CreateActivityRequest::new("Wander", source.id))
        .await
        .expect("activity");

    let err = planning
        .activities
        .update(activity.id, move_to(closed.id))
        .await
        .expect_err("closed projects accept nothing");

    assert!(matches!(
        err,
        PlanningServiceError::Domain(PlanningDomainError::ProjectClosed(id)) if id == closed.id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_to_a_missing_project_is_not_found(planning: Planning) {
    let source = planning
        .project("Home", ProjectStatus::Pending)
        .await
        .expect("source project");
    let activity = planning
        .activities
        .create(CreateActivityRequest::new("Stray", source.id))
        .await
        .expect("activity");
    let missing = ProjectId::new();

    let err = planning
        .activities
        .update(activity.id, move_to(missing))
        .await
        .expect_err("target does not exist");

    assert!(matches!(err, PlanningServiceError::ProjectNotFound(id) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activity_of_closed_project_can_still_be_deleted(planning: Planning) {
    let project = planning
        .project("Finished", ProjectStatus::Active)
        .await
        .expect("active project");
    let activity = planning
        .activities
        .create(CreateActivityRequest::new("Wrap up", project.id))
        .await
        .expect("activity");
    planning
        .activities
        .update(activity.id, activity_status(ActivityStatus::Closed))
        .await
        .expect("close activity");
    planning
        .projects
        .update(project.id, project_status(ProjectStatus::Closed))
        .await
        .expect("close project");

    let deleted = planning
        .activities
        .delete(activity.id)
        .await
        .expect("delete activity");

    assert!(deleted);
    let details = planning.projects.get(project.id).await.expect("project");
    assert_eq!(details.activities.closed, 0);
}
