//! Given steps for project lifecycle BDD scenarios.

use super::world::{ProjectLifecycleWorld, run_async};
use eyre::WrapErr;
use gropius::planning::{
    domain::ProjectStatus,
    services::{
        CreateActivityRequest, CreateProjectRequest, UpdateActivityRequest, UpdateProjectRequest,
    },
};
use rstest_bdd_macros::given;

fn create_project(
    world: &mut ProjectLifecycleWorld,
    name: String,
    status: ProjectStatus,
) -> Result<(), eyre::Report> {
    let created = run_async(world.projects.create(CreateProjectRequest::new(name)))
        .wrap_err("create project for scenario")?;
    let project = if status == ProjectStatus::Pending {
        created
    } else {
        run_async(world.projects.update(
            created.id,
            UpdateProjectRequest {
                status: Some(status),
                ..UpdateProjectRequest::default()
            },
        ))
        .wrap_err("set project status for scenario")?
    };
    world.project = Some(project);
    Ok(())
}

#[given(r#"an active project named "{name}""#)]
fn active_project(world: &mut ProjectLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    create_project(world, name, ProjectStatus::Active)
}

#[given(r#"a pending project named "{name}""#)]
fn pending_project(world: &mut ProjectLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    create_project(world, name, ProjectStatus::Pending)
}

#[given(r#"the project has an activity "{name}" assigned to "{assignee}""#)]
fn project_has_assigned_activity(
    world: &mut ProjectLifecycleWorld,
    name: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id;
    let created = run_async(
        world
            .activities
            .create(CreateActivityRequest::new(name, project_id)),
    )
    .wrap_err("create activity for scenario")?;
    let assigned = run_async(world.activities.update(
        created.id,
        UpdateActivityRequest {
            assigned_to: Some(assignee),
            ..UpdateActivityRequest::default()
        },
    ))
    .wrap_err("assign activity for scenario")?;
    world.activity = Some(assigned);
    Ok(())
}
