//! `PostgreSQL` repository implementation for projects and activities.
//!
//! Every write runs in a single transaction. Version checks are expressed as
//! `WHERE version = $expected` on the `UPDATE`, so a zero-row result means
//! either the row is missing or another writer got there first.
//!
//! Name sorts order by `lower(name)` and then by id, which matches the
//! in-memory adapter under a `C` collation.

use super::{
    conversions::{
        contains_pattern, row_to_activity, row_to_project, to_new_activity_row,
        to_new_project_row, version_from_db, version_to_db,
    },
    models::{ActivityRow, ProjectRow},
    schema::{activities, projects},
};
use crate::planning::{
    domain::{
        Activity, ActivityId, ActivityQuery, ActivitySortField, ActivitySummary, Project,
        ProjectId, ProjectQuery, ProjectSortField, ProjectSummary, SortDirection, Version,
    },
    ports::{
        PlanningRepository, PlanningRepositoryError, PlanningRepositoryResult,
        ProjectVersionCheck,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: Text) -> Text;
}

/// `PostgreSQL` connection pool type for planning adapters.
pub type PlanningPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for PlanningRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed repository for projects and activities.
#[derive(Debug, Clone)]
pub struct PostgresPlanningRepository {
    pool: PlanningPgPool,
}

impl PostgresPlanningRepository {
    /// Creates a new repository from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: PlanningPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> PlanningRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanningRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PlanningRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(PlanningRepositoryError::persistence)?
    }
}

#[async_trait]
impl PlanningRepository for PostgresPlanningRepository {
    async fn insert_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_project_row(project)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        PlanningRepositoryError::DuplicateProject(project_id)
                    }
                    _ => PlanningRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, PlanningRepositoryError, _>(|tx| {
                    let Some(row) = projects::table
                        .filter(projects::id.eq(id.into_inner()))
                        .select(ProjectRow::as_select())
                        .first::<ProjectRow>(tx)
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let activity_rows = activities::table
                        .filter(activities::project_id.eq(id.into_inner()))
                        .order((activities::created_at.asc(), activities::id.asc()))
                        .select(ActivityRow::as_select())
                        .load::<ActivityRow>(tx)?;
                    row_to_project(row, activity_rows).map(Some)
                })
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<Version> {
        let check = ProjectVersionCheck::of(project);
        let expected = version_to_db(check.expected)?;
        let name = project.name().to_owned();
        let description = project.description().map(str::to_owned);
        let status = project.status().as_str().to_owned();
        let updated_at = project.updated_at();

        self.run_blocking(move |connection| {
            let new_version = diesel::update(
                projects::table
                    .filter(projects::id.eq(check.project_id.into_inner()))
                    .filter(projects::version.eq(expected)),
            )
            .set((
                projects::name.eq(&name),
                projects::description.eq(&description),
                projects::status.eq(&status),
                projects::updated_at.eq(updated_at),
                projects::version.eq(projects::version + 1),
            ))
            .returning(projects::version)
            .get_result::<i64>(connection)
            .optional()?;

            match new_version {
                Some(value) => version_from_db(value),
                None => Err(project_write_failure(connection, check)),
            }
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> PlanningRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                .execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn search_projects(
        &self,
        query: &ProjectQuery,
    ) -> PlanningRepositoryResult<Vec<ProjectSummary>> {
        let criteria = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = projects::table
                .select(ProjectRow::as_select())
                .into_boxed();

            if let Some(text) = criteria.text() {
                let pattern = contains_pattern(text);
                statement = statement.filter(
                    projects::name
                        .ilike(pattern.clone())
                        .nullable()
                        .or(projects::description.ilike(pattern)),
                );
            }
            if let Some(status) = criteria.status() {
                statement = statement.filter(projects::status.eq(status.as_str()));
            }

            let sort = criteria.sort();
            statement = match (sort.field(), sort.direction()) {
                (ProjectSortField::Id, SortDirection::Ascending) => {
                    statement.order_by(projects::id.asc())
                }
                (ProjectSortField::Id, SortDirection::Descending) => {
                    statement.order_by(projects::id.desc())
                }
                (ProjectSortField::Name, SortDirection::Ascending) => {
                    statement.order_by(lower(projects::name).asc())
                }
                (ProjectSortField::Name, SortDirection::Descending) => {
                    statement.order_by(lower(projects::name).desc())
                }
                (ProjectSortField::Status, SortDirection::Ascending) => {
                    statement.order_by(projects::status.asc())
                }
                (ProjectSortField::Status, SortDirection::Descending) => {
                    statement.order_by(projects::status.desc())
                }
            };

            let rows = statement
                .then_order_by(projects::id.asc())
                .offset(i64::from(criteria.skip()))
                .limit(i64::from(criteria.take()))
                .load::<ProjectRow>(connection)?;

            rows.into_iter()
                .map(|row| {
                    row_to_project(row, Vec::new()).map(|project| ProjectSummary::from(&project))
                })
                .collect()
        })
        .await
    }

    async fn insert_activity(
        &self,
        activity: &Activity,
        owner: ProjectVersionCheck,
    ) -> PlanningRepositoryResult<()> {
        let activity_id = activity.id();
        let project_id = activity.project_id();
        let new_row = to_new_activity_row(activity)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, PlanningRepositoryError, _>(|tx| {
                bump_project(tx, owner)?;
                diesel::insert_into(activities::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            PlanningRepositoryError::DuplicateActivity(activity_id)
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            PlanningRepositoryError::ProjectNotFound(project_id)
                        }
                        _ => PlanningRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn find_activity(&self, id: ActivityId) -> PlanningRepositoryResult<Option<Activity>> {
        self.run_blocking(move |connection| {
            let row = activities::table
                .filter(activities::id.eq(id.into_inner()))
                .select(ActivityRow::as_select())
                .first::<ActivityRow>(connection)
                .optional()?;
            row.map(row_to_activity).transpose()
        })
        .await
    }

    async fn update_activity(
        &self,
        activity: &Activity,
        project_checks: &[ProjectVersionCheck],
    ) -> PlanningRepositoryResult<Version> {
        let activity_id = activity.id();
        let expected_version = activity.version();
        let expected = version_to_db(expected_version)?;
        let row = to_new_activity_row(activity)?;
        let checks = project_checks.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, PlanningRepositoryError, _>(|tx| {
                for check in &checks {
                    bump_project(tx, *check)?;
                }

                let new_version = diesel::update(
                    activities::table
                        .filter(activities::id.eq(row.id))
                        .filter(activities::version.eq(expected)),
                )
                .set((
                    activities::project_id.eq(row.project_id),
                    activities::name.eq(&row.name),
                    activities::description.eq(&row.description),
                    activities::assigned_to.eq(&row.assigned_to),
                    activities::status.eq(&row.status),
                    activities::updated_at.eq(row.updated_at),
                    activities::version.eq(activities::version + 1),
                ))
                .returning(activities::version)
                .get_result::<i64>(tx)
                .optional()
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        PlanningRepositoryError::ProjectNotFound(ProjectId::from_uuid(
                            row.project_id,
                        ))
                    }
                    _ => PlanningRepositoryError::persistence(err),
                })?;

                match new_version {
                    Some(value) => version_from_db(value),
                    None => Err(activity_write_failure(tx, activity_id, expected_version)),
                }
            })
        })
        .await
    }

    async fn delete_activity(&self, id: ActivityId) -> PlanningRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, PlanningRepositoryError, _>(|tx| {
                let owner = diesel::delete(
                    activities::table.filter(activities::id.eq(id.into_inner())),
                )
                .returning(activities::project_id)
                .get_result::<uuid::Uuid>(tx)
                .optional()?;

                let Some(project_id) = owner else {
                    return Ok(false);
                };
                diesel::update(projects::table.filter(projects::id.eq(project_id)))
                    .set(projects::version.eq(projects::version + 1))
                    .execute(tx)?;
                Ok(true)
            })
        })
        .await
    }

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> PlanningRepositoryResult<Vec<ActivitySummary>> {
        let criteria = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = activities::table
                .select(ActivityRow::as_select())
                .into_boxed();

            if let Some(text) = criteria.text() {
                let pattern = contains_pattern(text);
                statement = statement.filter(
                    activities::name
                        .ilike(pattern.clone())
                        .nullable()
                        .or(activities::description.ilike(pattern)),
                );
            }
            if let Some(status) = criteria.status() {
                statement = statement.filter(activities::status.eq(status.as_str()));
            }
            if let Some(project_id) = criteria.project_id() {
                statement = statement.filter(activities::project_id.eq(project_id.into_inner()));
            }
            if let Some(assignee) = criteria.assigned_to() {
                statement = statement.filter(activities::assigned_to.eq(assignee.to_owned()));
            }

            let sort = criteria.sort();
            statement = match (sort.field(), sort.direction()) {
                (ActivitySortField::Id, SortDirection::Ascending) => {
                    statement.order_by(activities::id.asc())
                }
                (ActivitySortField::Id, SortDirection::Descending) => {
                    statement.order_by(activities::id.desc())
                }
                (ActivitySortField::Name, SortDirection::Ascending) => {
                    statement.order_by(lower(activities::name).asc())
                }
                (ActivitySortField::Name, SortDirection::Descending) => {
                    statement.order_by(lower(activities::name).desc())
                }
                (ActivitySortField::Status, SortDirection::Ascending) => {
                    statement.order_by(activities::status.asc())
                }
                (ActivitySortField::Status, SortDirection::Descending) => {
                    statement.order_by(activities::status.desc())
                }
                (ActivitySortField::AssignedTo, SortDirection::Ascending) => {
                    statement.order_by(activities::assigned_to.asc())
                }
                (ActivitySortField::AssignedTo, SortDirection::Descending) => {
                    statement.order_by(activities::assigned_to.desc())
                }
            };

            let rows = statement
                .then_order_by(activities::id.asc())
                .offset(i64::from(criteria.skip()))
                .limit(i64::from(criteria.take()))
                .load::<ActivityRow>(connection)?;

            rows.into_iter()
                .map(|row| row_to_activity(row).map(|activity| ActivitySummary::from(&activity)))
                .collect()
        })
        .await
    }
}

/// Increments a project's version if it still matches `check.expected`.
fn bump_project(
    connection: &mut PgConnection,
    check: ProjectVersionCheck,
) -> PlanningRepositoryResult<()> {
    let expected = version_to_db(check.expected)?;
    let bumped = diesel::update(
        projects::table
            .filter(projects::id.eq(check.project_id.into_inner()))
            .filter(projects::version.eq(expected)),
    )
    .set(projects::version.eq(projects::version + 1))
    .execute(connection)?;

    if bumped == 0 {
        return Err(project_write_failure(connection, check));
    }
    Ok(())
}

/// Explains why a version-checked project write matched no rows.
fn project_write_failure(
    connection: &mut PgConnection,
    check: ProjectVersionCheck,
) -> PlanningRepositoryError {
    let exists = diesel::select(diesel::dsl::exists(
        projects::table.filter(projects::id.eq(check.project_id.into_inner())),
    ))
    .get_result::<bool>(connection);

    match exists {
        Ok(true) => PlanningRepositoryError::stale_project(check.project_id, check.expected),
        Ok(false) => PlanningRepositoryError::ProjectNotFound(check.project_id),
        Err(err) => PlanningRepositoryError::persistence(err),
    }
}

/// Explains why a version-checked activity write matched no rows.
fn activity_write_failure(
    connection: &mut PgConnection,
    activity_id: ActivityId,
    expected: Version,
) -> PlanningRepositoryError {
    let exists = diesel::select(diesel::dsl::exists(
        activities::table.filter(activities::id.eq(activity_id.into_inner())),
    ))
    .get_result::<bool>(connection);

    match exists {
        Ok(true) => PlanningRepositoryError::stale_activity(activity_id, expected),
        Ok(false) => PlanningRepositoryError::ActivityNotFound(activity_id),
        Err(err) => PlanningRepositoryError::persistence(err),
    }
}
