/// User endpoints
///
/// - `GET /api/me` - Current session user (answered from the token)
/// - `PUT /api/profile` - One-time profile completion
/// - `GET /api/users` - Users with completed profiles, for assignment
///
/// Profile completion re-issues the session cookie so the embedded
/// summary stays in sync with the database.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{middleware::SessionUser, session},
    models::user::{User, UserSummary},
};
use tracing::info;
use validator::Validate;

/// Profile completion request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// Job title
    #[validate(length(max = 255, message = "Designation must be at most 255 characters"))]
    pub designation: Option<String>,
}

/// Current session user
///
/// Returns the user summary embedded in the session token; no database
/// access is involved.
///
/// # Endpoint
///
/// ```text
/// GET /api/me
/// ```
pub async fn me(Extension(user): Extension<SessionUser>) -> Json<UserSummary> {
    Json(user.summary())
}

/// Profile completion
///
/// Sets name and designation and marks the profile complete, then
/// re-issues the session cookie with the updated summary.
///
/// # Endpoint
///
/// ```text
/// PUT /api/profile
/// Content-Type: application/json
///
/// { "name": "Jordan Doe", "designation": "Backend Engineer" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: name or designation missing/empty
/// - `422 Unprocessable Entity`: field too long
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let name = req.name.filter(|n| !n.trim().is_empty());
    let designation = req.designation.filter(|d| !d.trim().is_empty());

    let (name, designation) = match (name, designation) {
        (Some(name), Some(designation)) => (name, designation),
        _ => {
            return Err(ApiError::BadRequest(
                "Name and designation are required".to_string(),
            ))
        }
    };

    let updated = User::complete_profile(&state.db, user.id, &name, &designation)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Re-issue the cookie so the embedded summary reflects the update.
    let claims = session::SessionClaims::new(&updated.summary());
    let token = session::create_token(&claims, state.session_secret())?;

    let headers = AppendHeaders([(
        header::SET_COOKIE,
        session::build_cookie(
            session::SESSION_COOKIE,
            &token,
            session::SESSION_TTL_SECONDS,
            state.config.session.secure_cookies,
        ),
    )]);

    info!(user_id = updated.id, "Profile completed");

    Ok((headers, Json(updated.summary())))
}

/// Assignable users
///
/// Lists users who completed their profile, ordered by name.
///
/// # Endpoint
///
/// ```text
/// GET /api/users
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::list_completed(&state.db).await?;

    Ok(Json(users))
}
