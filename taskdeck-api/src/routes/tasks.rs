/// Task endpoints
///
/// - `GET /api/tasks` - Filtered list, newest first
/// - `POST /api/tasks` - Create (assigner = session user)
/// - `PUT /api/tasks/:id` - Partial update by assigner or assignee
/// - `DELETE /api/tasks/:id` - Delete, assigner only
///
/// Update and delete answer a single merged 404 for both "no such task"
/// and "not your task", so task ids cannot be probed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::middleware::SessionUser,
    models::task::{
        CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, TaskView, TaskWithUsers,
        UpdateTask,
    },
};
use tracing::info;
use validator::Validate;

/// Query parameters for the task list
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// View selector: "my" (default), "assigned", or anything else for
    /// the unfiltered list
    #[serde(rename = "type")]
    pub view: Option<String>,

    /// Equality filter on status
    pub status: Option<String>,

    /// Equality filter on priority
    pub priority: Option<String>,

    /// Equality filter on company label
    pub company: Option<String>,

    /// Case-insensitive substring filter on title
    pub search: Option<String>,
}

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title (required)
    #[validate(length(max = 500, message = "Title must be at most 500 characters"))]
    pub title: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Company label
    pub company: Option<String>,

    /// Priority (defaults to MEDIUM)
    pub priority: Option<String>,

    /// The user the task is delegated to (required)
    pub assigned_to_user_id: Option<i32>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Task creation response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    /// Confirmation message
    pub message: String,

    /// ID of the new task
    pub id: i32,
}

/// Generic confirmation response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation message
    pub message: String,
}

/// The merged not-found/permission error for update and delete
fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found or permission denied".to_string())
}

/// Validates list query parameters into a task filter
///
/// Empty strings are treated as absent; status and priority values
/// outside their vocabulary are rejected.
fn parse_filter(query: TaskListQuery) -> Result<TaskFilter, ApiError> {
    let status = match query.status.filter(|s| !s.is_empty()) {
        Some(s) => Some(
            TaskStatus::parse(&s)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {}", s)))?,
        ),
        None => None,
    };

    let priority = match query.priority.filter(|p| !p.is_empty()) {
        Some(p) => Some(
            TaskPriority::parse(&p)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown priority: {}", p)))?,
        ),
        None => None,
    };

    Ok(TaskFilter {
        view: TaskView::from_param(query.view.as_deref()),
        status,
        priority,
        company: query.company.filter(|c| !c.is_empty()),
        search: query.search.filter(|s| !s.is_empty()),
    })
}

/// Filtered task list
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks?type=my&status=TODO&priority=HIGH&company=Internal&search=deck
/// ```
///
/// All parameters are optional; `type` defaults to "my".
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskWithUsers>>> {
    let filter = parse_filter(query)?;

    let tasks = Task::list(&state.db, user.id, &filter).await?;

    Ok(Json(tasks))
}

/// Task creation
///
/// The session user becomes the assigner; status starts as TODO and
/// priority defaults to MEDIUM.
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Prepare quarterly deck",
///   "assigned_to_user_id": 2,
///   "priority": "HIGH",
///   "company": "Internal",
///   "due_date": "2026-08-21"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing title or assignee, unknown priority
/// - `422 Unprocessable Entity`: title too long
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate()?;

    let title = req.title.filter(|t| !t.trim().is_empty());
    let (title, assigned_to_user_id) = match (title, req.assigned_to_user_id) {
        (Some(title), Some(assignee)) => (title, assignee),
        _ => {
            return Err(ApiError::BadRequest(
                "Title and assignee are required".to_string(),
            ))
        }
    };

    let priority = match req.priority.filter(|p| !p.is_empty()) {
        Some(p) => TaskPriority::parse(&p)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown priority: {}", p)))?,
        None => TaskPriority::default(),
    };

    let task = Task::create(
        &state.db,
        CreateTask {
            title,
            description: req.description,
            company: req.company,
            priority,
            assigned_by_user_id: user.id,
            assigned_to_user_id,
            due_date: req.due_date,
        },
    )
    .await?;

    info!(task_id = task.id, assigner = user.id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            message: "Task created successfully".to_string(),
            id: task.id,
        }),
    ))
}

/// Partial task update
///
/// Only fields present in the body are changed; explicit nulls clear
/// nullable fields. The caller must be the task's assigner or assignee.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tasks/42
/// Content-Type: application/json
///
/// { "status": "DONE" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no such task, or the caller is not a participant
/// - `422 Unprocessable Entity`: status/priority outside the vocabulary
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
    Json(patch): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_for_participant(&state.db, id, user.id)
        .await?
        .ok_or_else(task_not_found)?;

    if patch.is_empty() {
        return Ok(Json(task));
    }

    let updated = Task::update(&state.db, id, patch)
        .await?
        .ok_or_else(task_not_found)?;

    info!(task_id = id, user_id = user.id, "Task updated");

    Ok(Json(updated))
}

/// Task deletion, assigner only
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tasks/42
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no such task, or the caller is not the assigner
///   (an assignee cannot delete a task delegated to them)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete_by_assigner(&state.db, id, user.id).await?;

    if !deleted {
        return Err(task_not_found());
    }

    info!(task_id = id, user_id = user.id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_defaults_to_my_view() {
        let filter = parse_filter(TaskListQuery::default()).unwrap();
        assert_eq!(filter.view, TaskView::My);
        assert!(filter.status.is_none());
        assert!(filter.priority.is_none());
        assert!(filter.company.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_parse_filter_views() {
        let q = TaskListQuery {
            view: Some("assigned".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_filter(q).unwrap().view, TaskView::Assigned);

        let q = TaskListQuery {
            view: Some("everything".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_filter(q).unwrap().view, TaskView::All);
    }

    #[test]
    fn test_parse_filter_accepts_vocabulary_values() {
        let q = TaskListQuery {
            status: Some("IN_PROGRESS".to_string()),
            priority: Some("LOW".to_string()),
            company: Some("Internal".to_string()),
            search: Some("deck".to_string()),
            ..Default::default()
        };

        let filter = parse_filter(q).unwrap();
        assert_eq!(filter.status, Some(TaskStatus::InProgress));
        assert_eq!(filter.priority, Some(TaskPriority::Low));
        assert_eq!(filter.company.as_deref(), Some("Internal"));
        assert_eq!(filter.search.as_deref(), Some("deck"));
    }

    #[test]
    fn test_parse_filter_rejects_unknown_status() {
        let q = TaskListQuery {
            status: Some("SHIPPED".to_string()),
            ..Default::default()
        };
        assert!(matches!(parse_filter(q), Err(ApiError::BadRequest(_))));

        let q = TaskListQuery {
            priority: Some("URGENT".to_string()),
            ..Default::default()
        };
        assert!(matches!(parse_filter(q), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_filter_treats_empty_strings_as_absent() {
        let q = TaskListQuery {
            status: Some(String::new()),
            priority: Some(String::new()),
            company: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };

        let filter = parse_filter(q).unwrap();
        assert!(filter.status.is_none());
        assert!(filter.priority.is_none());
        assert!(filter.company.is_none());
        assert!(filter.search.is_none());
    }
}
