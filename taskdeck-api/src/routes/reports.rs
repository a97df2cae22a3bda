/// Report endpoints
///
/// The weekly report aggregates counts over the span from the most
/// recent Monday 00:00 (UTC) to now, scoped to the session user and
/// globally.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use taskdeck_shared::{auth::middleware::SessionUser, models::report::WeeklyReport};

/// Weekly aggregate report
///
/// # Endpoint
///
/// ```text
/// GET /api/reports/weekly
/// ```
///
/// # Response
///
/// ```json
/// {
///   "tasks_assigned_to_me_this_week": 3,
///   "tasks_i_assigned_this_week": 1,
///   "tasks_i_completed_this_week": 2,
///   "total_tasks_created_this_week": 9,
///   "total_tasks_completed_this_week": 4,
///   "tasks_by_status": { "TODO": 5, "DONE": 2 },
///   "tasks_by_priority": { "HIGH": 2, "MEDIUM": 5 }
/// }
/// ```
pub async fn weekly_report(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<WeeklyReport>> {
    let report = WeeklyReport::generate(&state.db, user.id).await?;

    Ok(Json(report))
}
