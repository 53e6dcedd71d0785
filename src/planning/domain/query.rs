//! Search criteria for projects and activities.
//!
//! Queries support a free-text filter, exact-match filters, a single sort
//! key, and offset/limit paging. Sort expressions use the `field:direction`
//! form (`name:desc`); a malformed or unknown expression falls back to
//! ascending identifier order.

use super::{Activity, ActivityStatus, Project, ProjectId, ProjectStatus, text::non_blank};
use std::cmp::Ordering;

/// Number of results returned when the caller does not specify a page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Orients an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort<F> {
    field: F,
    direction: SortDirection,
}

impl<F: Copy> Sort<F> {
    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn field(&self) -> F {
        self.field
    }

    /// Returns the direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Parses a `field:direction` expression.
    ///
    /// Returns `None` when the expression does not have exactly two
    /// non-empty parts, the direction is not `asc`/`desc`, or `field_from_name`
    /// does not recognise the field.
    pub fn parse(expression: &str, field_from_name: impl Fn(&str) -> Option<F>) -> Option<Self> {
        let mut parts = expression
            .split(':')
            .map(str::trim)
            .filter(|part| !part.is_empty());
        let field_name = parts.next()?;
        let direction_name = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let direction = match direction_name.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            _ => return None,
        };
        Some(Self::new(field_from_name(field_name)?, direction))
    }
}

/// Lower-cases a field name and strips separators so that `assignedTo`,
/// `assigned_to`, and `AssignedTo` compare equal.
fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|character| *character != '_')
        .map(|character| character.to_ascii_lowercase())
        .collect()
}

/// Sortable project fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectSortField {
    /// Project identifier.
    Id,
    /// Project name.
    Name,
    /// Project status.
    Status,
}

impl ProjectSortField {
    /// Resolves a field name, ignoring case and underscores.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_field_name(name).as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Sortable activity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivitySortField {
    /// Activity identifier.
    Id,
    /// Activity name.
    Name,
    /// Activity status.
    Status,
    /// Activity assignee.
    AssignedTo,
}

impl ActivitySortField {
    /// Resolves a field name, ignoring case and underscores.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize_field_name(name).as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "status" => Some(Self::Status),
            "assignedto" => Some(Self::AssignedTo),
            _ => None,
        }
    }
}

/// Case-insensitive substring match over a name and optional description.
fn text_matches(needle: &str, name: &str, description: Option<&str>) -> bool {
    let lowered = needle.to_lowercase();
    name.to_lowercase().contains(&lowered)
        || description.is_some_and(|text| text.to_lowercase().contains(&lowered))
}

/// Project search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    text: Option<String>,
    status: Option<ProjectStatus>,
    skip: u32,
    take: u32,
    sort: Sort<ProjectSortField>,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            text: None,
            status: None,
            skip: 0,
            take: DEFAULT_PAGE_SIZE,
            sort: Sort::new(ProjectSortField::Id, SortDirection::Ascending),
        }
    }
}

impl ProjectQuery {
    /// Creates a query matching every project, first page, by identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by a substring of the name or description. Blank text is
    /// ignored.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = non_blank(text);
        self
    }

    /// Filters by status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Skips the first `skip` matches.
    #[must_use]
    pub const fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Returns at most `take` matches.
    #[must_use]
    pub const fn with_take(mut self, take: u32) -> Self {
        self.take = take;
        self
    }

    /// Applies a `field:direction` sort expression.
    #[must_use]
    pub fn with_sort(mut self, expression: &str) -> Self {
        self.sort = Sort::parse(expression, ProjectSortField::from_name)
            .unwrap_or_else(|| Sort::new(ProjectSortField::Id, SortDirection::Ascending));
        self
    }

    /// Returns the text filter.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> Option<ProjectStatus> {
        self.status
    }

    /// Returns the number of matches to skip.
    #[must_use]
    pub const fn skip(&self) -> u32 {
        self.skip
    }

    /// Returns the page size.
    #[must_use]
    pub const fn take(&self) -> u32 {
        self.take
    }

    /// Returns the sort specification.
    #[must_use]
    pub const fn sort(&self) -> Sort<ProjectSortField> {
        self.sort
    }

    /// Returns whether `project` satisfies the filters.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        let text_ok = self
            .text
            .as_deref()
            .is_none_or(|text| text_matches(text, project.name(), project.description()));
        let status_ok = self.status.is_none_or(|status| status == project.status());
        text_ok && status_ok
    }
}

/// Activity search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    text: Option<String>,
    status: Option<ActivityStatus>,
    project_id: Option<ProjectId>,
    assigned_to: Option<String>,
    skip: u32,
    take: u32,
    sort: Sort<ActivitySortField>,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            text: None,
            status: None,
            project_id: None,
            assigned_to: None,
            skip: 0,
            take: DEFAULT_PAGE_SIZE,
            sort: Sort::new(ActivitySortField::Id, SortDirection::Ascending),
        }
    }
}

impl ActivityQuery {
    /// Creates a query matching every activity, first page, by identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by a substring of the name or description. Blank text is
    /// ignored.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = non_blank(text);
        self
    }

    /// Filters by status.
    #[must_use]
    pub const fn with_status(mut self, status: ActivityStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by owning project.
    #[must_use]
    pub const fn with_project_id(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Filters by exact assignee. Blank values are ignored.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: &str) -> Self {
        self.assigned_to = non_blank(assigned_to);
        self
    }

    /// Skips the first `skip` matches.
    #[must_use]
    pub const fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Returns at most `take` matches.
    #[must_use]
    pub const fn with_take(mut self, take: u32) -> Self {
        self.take = take;
        self
    }

    /// Applies a `field:direction` sort expression.
    #[must_use]
    pub fn with_sort(mut self, expression: &str) -> Self {
        self.sort = Sort::parse(expression, ActivitySortField::from_name)
            .unwrap_or_else(|| Sort::new(ActivitySortField::Id, SortDirection::Ascending));
        self
    }

    /// Returns the text filter.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> Option<ActivityStatus> {
        self.status
    }

    /// Returns the owning-project filter.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the assignee filter.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the number of matches to skip.
    #[must_use]
    pub const fn skip(&self) -> u32 {
        self.skip
    }

    /// Returns the page size.
    #[must_use]
    pub const fn take(&self) -> u32 {
        self.take
    }

    /// Returns the sort specification.
    #[must_use]
    pub const fn sort(&self) -> Sort<ActivitySortField> {
        self.sort
    }

    /// Returns whether `activity` satisfies the filters.
    #[must_use]
    pub fn matches(&self, activity: &Activity) -> bool {
        let text_ok = self
            .text
            .as_deref()
            .is_none_or(|text| text_matches(text, activity.name(), activity.description()));
        let status_ok = self.status.is_none_or(|status| status == activity.status());
        let project_ok = self
            .project_id
            .is_none_or(|project_id| project_id == activity.project_id());
        let assignee_ok = self
            .assigned_to
            .as_deref()
            .is_none_or(|assignee| activity.assigned_to() == Some(assignee));
        text_ok && status_ok && project_ok && assignee_ok
    }
}
