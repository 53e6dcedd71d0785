//! Diesel schema for project and activity persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Trimmed, non-empty project name.
        name -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Lifecycle state (`pending`, `active`, `closed`).
        #[max_length = 20]
        status -> Varchar,
        /// Optimistic-concurrency token.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Activity records.
    activities (id) {
        /// Activity identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Trimmed, non-empty activity name.
        name -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional assignee.
        assigned_to -> Nullable<Text>,
        /// Lifecycle state (`pending`, `active`, `closed`).
        #[max_length = 20]
        status -> Varchar,
        /// Optimistic-concurrency token.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(activities -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, activities);
