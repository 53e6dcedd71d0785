//! Then steps for project lifecycle BDD scenarios.

use super::world::{ProjectLifecycleWorld, run_async};
use gropius::error::ErrorKind;
use gropius::planning::domain::{ActivityStatus, ProjectStatus};
use rstest_bdd_macros::then;

fn expect_rejection(
    world: &ProjectLifecycleWorld,
    expected: ErrorKind,
) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing outcome"))?;

    if outcome != &Err(expected) {
        return Err(eyre::eyre!("expected {expected} rejection, got {outcome:?}"));
    }

    Ok(())
}

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &ProjectLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ProjectStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let project_id = world.project()?.id;

    let stored = run_async(world.projects.get(project_id))?;
    if stored.status != expected {
        return Err(eyre::eyre!(
            "expected project status {expected}, found {}",
            stored.status
        ));
    }

    Ok(())
}

#[then(r#"the activity status is "{status}""#)]
fn activity_status_is(world: &ProjectLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ActivityStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let activity_id = world.activity()?.id;

    let stored = run_async(world.activities.get(activity_id))?;
    if stored.status != expected {
        return Err(eyre::eyre!(
            "expected activity status {expected}, found {}",
            stored.status
        ));
    }

    Ok(())
}

#[then("the project has {count:u64} closed activity")]
fn project_has_closed_activities(
    world: &ProjectLifecycleWorld,
    count: u64,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id;

    let stored = run_async(world.projects.get(project_id))?;
    let closed = u64::try_from(stored.activities.closed)?;
    if closed != count {
        return Err(eyre::eyre!("expected {count} closed activities, found {closed}"));
    }

    Ok(())
}

#[then("the change is rejected as a conflict")]
fn change_rejected_as_conflict(world: &ProjectLifecycleWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, ErrorKind::Conflict)
}

#[then("the change is rejected as invalid")]
fn change_rejected_as_invalid(world: &ProjectLifecycleWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, ErrorKind::Validation)
}
