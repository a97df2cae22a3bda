/// Task model and database operations
///
/// Tasks are delegated between team members: the *assigner* creates the
/// task, the *assignee* receives it. Either participant may update a
/// task; only the assigner may delete it.
///
/// # Vocabularies
///
/// Status and priority are constrained to small fixed sets:
///
/// ```text
/// status:   TODO | IN_PROGRESS | DONE
/// priority: LOW | MEDIUM | HIGH
/// ```
///
/// Inputs naming a value outside these sets are rejected before any SQL
/// is built.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(500) NOT NULL,
///     description TEXT,
///     company VARCHAR(255),
///     priority VARCHAR(20) NOT NULL DEFAULT 'MEDIUM',
///     status VARCHAR(20) NOT NULL DEFAULT 'TODO',
///     assigned_by_user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
///     assigned_to_user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskPriority};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Prepare quarterly deck".to_string(),
///     description: None,
///     company: Some("Internal".to_string()),
///     priority: TaskPriority::High,
///     assigned_by_user_id: 1,
///     assigned_to_user_id: 2,
///     due_date: None,
/// }).await?;
/// assert_eq!(task.status, "TODO");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet
    Todo,

    /// Actively being worked on
    InProgress,

    /// Completed
    Done,
}

impl TaskStatus {
    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Parses a status from its stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task priority vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }

    /// Parses a priority from its stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(TaskPriority::Low),
            "MEDIUM" => Some(TaskPriority::Medium),
            "HIGH" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Task row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i32,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: Option<String>,

    /// Company label, one of the seeded set
    pub company: Option<String>,

    /// Priority, one of the priority vocabulary
    pub priority: String,

    /// Status, one of the status vocabulary
    pub status: String,

    /// User who created the task (null if that user was deleted)
    pub assigned_by_user_id: Option<i32>,

    /// User the task is delegated to (null if that user was deleted)
    pub assigned_to_user_id: Option<i32>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task row joined with assigner and assignee summary fields
///
/// Produced by the list query; the join columns are nullable because
/// either user may have been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithUsers {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub company: Option<String>,
    pub priority: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Assigner summary
    pub assigned_by_id: Option<i32>,
    pub assigned_by_name: Option<String>,
    pub assigned_by_avatar: Option<String>,

    /// Assignee summary
    pub assigned_to_id: Option<i32>,
    pub assigned_to_name: Option<String>,
    pub assigned_to_avatar: Option<String>,
    pub assigned_to_designation: Option<String>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (required, non-empty)
    pub title: String,

    /// Free-form description, stored as empty string when absent
    pub description: Option<String>,

    /// Company label
    pub company: Option<String>,

    /// Priority (defaults to MEDIUM upstream)
    pub priority: TaskPriority,

    /// The session user creating the task
    pub assigned_by_user_id: i32,

    /// The user the task is delegated to (required)
    pub assigned_to_user_id: i32,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// A structured partial update for a task
///
/// Only fields present in the request are applied. For nullable columns
/// the outer `Option` distinguishes "absent" (skip) from the inner
/// `Option`'s "null" (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New description (explicit null clears)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New company label (explicit null clears)
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,

    /// New due date (explicit null clears)
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Deserializes a present-but-possibly-null field into `Some(Option<T>)`,
/// leaving absent fields to `#[serde(default)]` (`None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateTask {
    /// Whether the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.description.is_none()
            && self.company.is_none()
            && self.due_date.is_none()
    }
}

/// View selector for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    /// Tasks assigned to the caller (the default)
    My,

    /// Tasks the caller assigned to others
    Assigned,

    /// No participant filter
    All,
}

impl TaskView {
    /// Maps the `type` query parameter to a view
    ///
    /// Absent defaults to `My`; any unrecognized value means unfiltered.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("my") => TaskView::My,
            Some("assigned") => TaskView::Assigned,
            Some(_) => TaskView::All,
        }
    }
}

/// Validated filters for the task list query
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Participant view selector
    pub view: TaskView,

    /// Equality filter on status
    pub status: Option<TaskStatus>,

    /// Equality filter on priority
    pub priority: Option<TaskPriority>,

    /// Equality filter on company label
    pub company: Option<String>,

    /// Case-insensitive substring filter on title
    pub search: Option<String>,
}

impl TaskFilter {
    /// Builds the WHERE clauses for this filter
    ///
    /// Clauses are appended to a `WHERE 1=1` base; bind placeholders are
    /// numbered in the same order `Task::list` binds values: view
    /// participant, status, priority, company, search.
    pub fn where_clauses(&self) -> String {
        let mut sql = String::new();
        let mut bind_count = 0;

        match self.view {
            TaskView::My => {
                bind_count += 1;
                sql.push_str(&format!(" AND t.assigned_to_user_id = ${}", bind_count));
            }
            TaskView::Assigned => {
                bind_count += 1;
                sql.push_str(&format!(" AND t.assigned_by_user_id = ${}", bind_count));
            }
            TaskView::All => {}
        }

        if self.status.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND t.status = ${}", bind_count));
        }
        if self.priority.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND t.priority = ${}", bind_count));
        }
        if self.company.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND t.company = ${}", bind_count));
        }
        if self.search.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND t.title ILIKE ${}", bind_count));
        }

        sql
    }
}

const TASK_COLUMNS: &str = "id, title, description, company, priority, status, \
     assigned_by_user_id, assigned_to_user_id, due_date, created_at, updated_at";

impl Task {
    /// Creates a new task in TODO status
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks
                (title, description, company, priority, status,
                 assigned_by_user_id, assigned_to_user_id, due_date)
            VALUES ($1, $2, $3, $4, 'TODO', $5, $6, $7)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description.unwrap_or_default())
            .bind(data.company)
            .bind(data.priority.as_str())
            .bind(data.assigned_by_user_id)
            .bind(data.assigned_to_user_id)
            .bind(data.due_date)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task the given user participates in
    ///
    /// Returns the task only when the user is its assigner or assignee.
    /// A missing row and a permission miss are indistinguishable here;
    /// callers surface both as the same not-found error.
    pub async fn find_for_participant(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1 AND (assigned_to_user_id = $2 OR assigned_by_user_id = $2)
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Applies a partial update to a task
    ///
    /// Only fields present in `data` are written; `updated_at` is bumped
    /// whenever at least one field is applied. The UPDATE is assembled
    /// from the fixed descriptor set, never from request-supplied names.
    ///
    /// # Returns
    ///
    /// The updated task if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.company.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(status) = data.status {
            q = q.bind(status.as_str());
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(company) = data.company {
            q = q.bind(company);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, restricted to its assigner
    ///
    /// # Returns
    ///
    /// True if a row was deleted; false covers both "no such task" and
    /// "caller is not the assigner".
    pub async fn delete_by_assigner(
        pool: &PgPool,
        id: i32,
        user_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND assigned_by_user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks matching a filter, newest first
    ///
    /// Each row is joined with assigner and assignee summary fields.
    pub async fn list(
        pool: &PgPool,
        user_id: i32,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskWithUsers>, sqlx::Error> {
        let mut query = String::from(
            r#"
            SELECT
                t.id, t.title, t.description, t.company, t.priority, t.status,
                t.due_date, t.created_at, t.updated_at,
                assigned_by.id AS assigned_by_id,
                assigned_by.name AS assigned_by_name,
                assigned_by.avatar_url AS assigned_by_avatar,
                assigned_to.id AS assigned_to_id,
                assigned_to.name AS assigned_to_name,
                assigned_to.avatar_url AS assigned_to_avatar,
                assigned_to.designation AS assigned_to_designation
            FROM tasks t
            LEFT JOIN users assigned_by ON t.assigned_by_user_id = assigned_by.id
            LEFT JOIN users assigned_to ON t.assigned_to_user_id = assigned_to.id
            WHERE 1=1
            "#,
        );
        query.push_str(&filter.where_clauses());
        query.push_str(" ORDER BY t.created_at DESC");

        let mut q = sqlx::query_as::<_, TaskWithUsers>(&query);

        match filter.view {
            TaskView::My | TaskView::Assigned => q = q.bind(user_id),
            TaskView::All => {}
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(company) = &filter.company {
            q = q.bind(company.as_str());
        }
        if let Some(search) = &filter.search {
            q = q.bind(format!("%{}%", search));
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary_roundtrip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("SHIPPED"), None);
        assert_eq!(TaskStatus::parse("todo"), None);
    }

    #[test]
    fn test_priority_vocabulary_roundtrip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::parse("URGENT"), None);
    }

    #[test]
    fn test_vocabulary_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_status_serde_matches_stored_form() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let parsed: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);

        assert!(serde_json::from_str::<TaskStatus>("\"shipped\"").is_err());
    }

    #[test]
    fn test_view_from_param() {
        assert_eq!(TaskView::from_param(None), TaskView::My);
        assert_eq!(TaskView::from_param(Some("my")), TaskView::My);
        assert_eq!(TaskView::from_param(Some("assigned")), TaskView::Assigned);
        assert_eq!(TaskView::from_param(Some("all")), TaskView::All);
        assert_eq!(TaskView::from_param(Some("garbage")), TaskView::All);
    }

    fn filter(view: TaskView) -> TaskFilter {
        TaskFilter {
            view,
            status: None,
            priority: None,
            company: None,
            search: None,
        }
    }

    #[test]
    fn test_where_clauses_my_view_only() {
        let sql = filter(TaskView::My).where_clauses();
        assert_eq!(sql, " AND t.assigned_to_user_id = $1");
    }

    #[test]
    fn test_where_clauses_assigned_view_only() {
        let sql = filter(TaskView::Assigned).where_clauses();
        assert_eq!(sql, " AND t.assigned_by_user_id = $1");
    }

    #[test]
    fn test_where_clauses_all_view_is_unfiltered() {
        assert_eq!(filter(TaskView::All).where_clauses(), "");
    }

    #[test]
    fn test_where_clauses_numbering_without_participant() {
        let mut f = filter(TaskView::All);
        f.status = Some(TaskStatus::Done);
        f.search = Some("deck".to_string());

        let sql = f.where_clauses();
        assert_eq!(sql, " AND t.status = $1 AND t.title ILIKE $2");
    }

    #[test]
    fn test_where_clauses_full_filter_ordering() {
        let f = TaskFilter {
            view: TaskView::My,
            status: Some(TaskStatus::Todo),
            priority: Some(TaskPriority::High),
            company: Some("Internal".to_string()),
            search: Some("deck".to_string()),
        };

        let sql = f.where_clauses();
        assert_eq!(
            sql,
            " AND t.assigned_to_user_id = $1 AND t.status = $2 \
             AND t.priority = $3 AND t.company = $4 AND t.title ILIKE $5"
        );
    }

    #[test]
    fn test_update_task_absent_vs_null_vs_value() {
        // Absent fields are skipped entirely
        let patch: UpdateTask = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(patch.description.is_none());
        assert!(patch.due_date.is_none());

        // Explicit null clears a nullable column
        let patch: UpdateTask = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));

        // A value sets it
        let patch: UpdateTask =
            serde_json::from_str(r#"{"due_date": "2026-08-10", "company": null}"#).unwrap();
        assert_eq!(
            patch.due_date,
            Some(Some(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()))
        );
        assert_eq!(patch.company, Some(None));
    }

    #[test]
    fn test_update_task_rejects_unknown_status() {
        let result = serde_json::from_str::<UpdateTask>(r#"{"status": "SHIPPED"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_task_is_empty() {
        let patch: UpdateTask = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        let patch: UpdateTask = serde_json::from_str(r#"{"status": "DONE"}"#).unwrap();
        assert!(!patch.is_empty());

        // A clearing null still counts as a field to apply
        let patch: UpdateTask = serde_json::from_str(r#"{"company": null}"#).unwrap();
        assert!(!patch.is_empty());
    }
}
