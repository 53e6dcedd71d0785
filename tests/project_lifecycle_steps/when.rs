//! When steps for project lifecycle BDD scenarios.

use super::world::{ProjectLifecycleWorld, run_async};
use gropius::planning::{
    domain::{ActivityStatus, ProjectStatus},
    services::{UpdateActivityRequest, UpdateProjectRequest},
};
use rstest_bdd_macros::when;

#[when(r#"the activity status is changed to "{status}""#)]
fn change_activity_status(
    world: &mut ProjectLifecycleWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let activity_id = world.activity()?.id;
    let parsed = match ActivityStatus::try_from(status) {
        Ok(parsed) => parsed,
        Err(err) => {
            world.last_outcome = Some(Err(err.kind()));
            return Ok(());
        }
    };

    let result = run_async(world.activities.update(
        activity_id,
        UpdateActivityRequest {
            status: Some(parsed),
            ..UpdateActivityRequest::default()
        },
    ));
    world.last_outcome = Some(match result {
        Ok(updated) => {
            world.activity = Some(updated);
            Ok(())
        }
        Err(err) => Err(err.kind()),
    });
    Ok(())
}

#[when(r#"the project status is changed to "{status}""#)]
fn change_project_status(
    world: &mut ProjectLifecycleWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id;
    let parsed = match ProjectStatus::try_from(status) {
        Ok(parsed) => parsed,
        Err(err) => {
            world.last_outcome = Some(Err(err.kind()));
            return Ok(());
        }
    };

    let result = run_async(world.projects.update(
        project_id,
        UpdateProjectRequest {
            status: Some(parsed),
            ..UpdateProjectRequest::default()
        },
    ));
    world.last_outcome = Some(match result {
        Ok(updated) => {
            world.project = Some(updated);
            Ok(())
        }
        Err(err) => Err(err.kind()),
    });
    Ok(())
}
