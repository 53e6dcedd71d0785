//! Optimistic concurrency tests.
//!
//! Two writers load the same project, each passes its guards against that
//! snapshot, and only the first commit wins.

use std::sync::Arc;

use super::helpers::{Planning, activity_status, planning};
use gropius::error::ErrorKind;
use gropius::planning::{
    adapters::memory::InMemoryPlanningRepository,
    domain::{Activity, ActivityStatus, Project, ProjectId, ProjectStatus},
    ports::{PlanningRepository, PlanningRepositoryError, ProjectVersionCheck, VersionedEntity},
    services::{ActivityService, PlanningServiceError},
};
use mockable::DefaultClock;
use rstest::rstest;

async fn load(repository: &InMemoryPlanningRepository, id: ProjectId) -> Project {
    repository
        .find_project(id)
        .await
        .expect("find project")
        .expect("project exists")
}

fn is_stale_project(err: &PlanningRepositoryError, id: ProjectId) -> bool {
    matches!(
        err,
        PlanningRepositoryError::ConcurrentModification {
            entity: VersionedEntity::Project(stale),
            ..
        } if *stale == id
    )
}

#[rstest]
#[case::close_commits_first(true)]
#[case::activation_commits_first(false)]
#[tokio::test(flavor = "multi_thread")]
async fn close_and_activate_race_has_one_winner(
    planning: Planning,
    #[case] close_first: bool,
) {
    let clock = DefaultClock;
    let project = planning
        .project("Contested", ProjectStatus::Active)
        .await
        .expect("active project");
    let seeded = planning
        .assigned_activity(project.id, "Contested work", "itten")
        .await
        .expect("assigned activity");
    let repository = &planning.repository;

    // Writer A takes the project back to pending; every activity is pending.
    let mut pausing = load(repository, project.id).await;
    pausing
        .set_status(ProjectStatus::Pending, &clock)
        .expect("pending guard passes on snapshot");

    // Writer B activates the activity against the same active snapshot.
    let owner = load(repository, project.id).await;
    let mut activating = repository
        .find_activity(seeded.id)
        .await
        .expect("find activity")
        .expect("activity exists");
    activating
        .set_status(ActivityStatus::Active, &owner, &clock)
        .expect("activation guard passes on snapshot");

    let (winner, loser) = if close_first {
        let first = repository.update_project(&pausing).await.map(|_| ());
        let second = repository
            .update_activity(&activating, &[ProjectVersionCheck::of(&owner)])
            .await
            .map(|_| ());
        (first, second)
    } else {
        let first = repository
            .update_activity(&activating, &[ProjectVersionCheck::of(&owner)])
            .await
            .map(|_| ());
        let second = repository.update_project(&pausing).await.map(|_| ());
        (first, second)
    };

    winner.expect("first writer commits");
    let err = loser.expect_err("second writer is stale");
    assert!(is_stale_project(&err, project.id), "unexpected error: {err}");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = load(repository, project.id).await;
    let stored_activity = stored
        .activity(seeded.id)
        .expect("activity still owned")
        .status();
    // Never an active activity inside a pending project.
    assert!(
        !(stored.status() == ProjectStatus::Pending && stored_activity == ActivityStatus::Active)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_into_a_project_being_closed_is_rejected(planning: Planning) {
    let clock = DefaultClock;
    let project = planning
        .project("Closing", ProjectStatus::Active)
        .await
        .expect("active project");
    let repository = &planning.repository;

    let snapshot = load(repository, project.id).await;
    let late = Activity::new("Late arrival", &snapshot, &clock).expect("guard passes");
    let mut closing = snapshot.clone();
    closing
        .set_status(ProjectStatus::Closed, &clock)
        .expect("no activities block close");
    repository
        .update_project(&closing)
        .await
        .expect("close commits");

    let err = repository
        .insert_activity(&late, ProjectVersionCheck::of(&snapshot))
        .await
        .expect_err("stale owner version");

    assert!(is_stale_project(&err, project.id));
    let stored = load(repository, project.id).await;
    assert!(stored.activities().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_project_update_is_rejected(planning: Planning) {
    let clock = DefaultClock;
    let project = planning
        .project("Twice edited", ProjectStatus::Pending)
        .await
        .expect("project");
    let repository = &planning.repository;

    let mut first = load(repository, project.id).await;
    let mut second = first.clone();
    first.set_name("First edit", &clock).expect("rename");
    second.set_name("Second edit", &clock).expect("rename");

    let version = repository.update_project(&first).await.expect("first wins");
    let err = repository
        .update_project(&second)
        .await
        .expect_err("second is stale");

    assert_eq!(version, first.version().next());
    assert!(is_stale_project(&err, project.id));
    assert_eq!(load(repository, project.id).await.name(), "First edit");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_service_activations_leave_consistent_state(planning: Planning) {
    let project = planning
        .project("Busy", ProjectStatus::Active)
        .await
        .expect("project");
    let mut ids = Vec::new();
    for index in 0..8 {
        let activity = planning
            .assigned_activity(project.id, &format!("Task {index}"), "moholy-nagy")
            .await
            .expect("activity");
        ids.push(activity.id);
    }
    let activities = Arc::new(ActivityService::new(
        Arc::clone(&planning.repository),
        Arc::new(DefaultClock),
    ));

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let service = Arc::clone(&activities);
            tokio::spawn(async move {
                service
                    .update(id, activity_status(ActivityStatus::Active))
                    .await
            })
        })
        .collect();

    let mut committed = 0_usize;
    for handle in handles {
        match handle.await.expect("task joins") {
            Ok(_) => committed += 1,
            Err(PlanningServiceError::Repository(
                PlanningRepositoryError::ConcurrentModification { .. },
            )) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert!(committed >= 1);
    let details = planning.projects.get(project.id).await.expect("project");
    assert_eq!(details.activities.active, committed);
    assert_eq!(details.activities.pending, 8 - committed);
}
