/// Google OAuth login flow
///
/// This module provides the three endpoints of the login flow:
///
/// - `GET /login` - Redirect the browser to Google's consent screen
/// - `GET /auth` - OAuth callback: exchange the code, upsert the user,
///   issue the session cookie
/// - `GET /logout` - Expire the session cookie
///
/// Login and logout both end in a redirect to the frontend origin. A
/// random state nonce stored in a short-lived cookie ties the callback
/// to the browser that initiated the login (CSRF protection).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect},
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{google, session},
    models::user::{CreateUser, User},
};
use tracing::info;

/// Query parameters Google sends to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code (absent if the user denied consent)
    pub code: Option<String>,

    /// Echo of the state nonce from /login
    pub state: Option<String>,

    /// Error code when the authorization failed
    pub error: Option<String>,
}

/// Login entry point
///
/// Generates a state nonce, stores it in a short-lived cookie, and
/// redirects to Google's authorization screen.
///
/// # Endpoint
///
/// ```text
/// GET /login
/// ```
pub async fn login(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let nonce = google::generate_state();

    let url = google::authorize_url(
        &state.config.google.client_id,
        &state.config.redirect_uri(),
        &nonce,
    )?;

    let headers = AppendHeaders([(
        header::SET_COOKIE,
        session::build_cookie(
            session::STATE_COOKIE,
            &nonce,
            session::STATE_TTL_SECONDS,
            state.config.session.secure_cookies,
        ),
    )]);

    Ok((headers, Redirect::to(&url)))
}

/// OAuth callback
///
/// Verifies the state nonce, exchanges the authorization code, fetches
/// the Google profile, and creates or refreshes the user. First login
/// creates an account with an incomplete profile; returning logins
/// refresh the stored avatar. Ends by issuing the session cookie and
/// redirecting to the frontend.
///
/// # Endpoint
///
/// ```text
/// GET /auth?code=...&state=...
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: denied consent, missing code, state mismatch, or
///   Google did not report an email
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<impl IntoResponse> {
    if let Some(error) = query.error {
        return Err(ApiError::BadRequest(format!("Google login failed: {}", error)));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;
    let returned_state = query
        .state
        .ok_or_else(|| ApiError::BadRequest("Missing OAuth state".to_string()))?;

    // The nonce must match the one this browser was handed at /login.
    let expected_state = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| session::cookie_value(h, session::STATE_COOKIE));

    if expected_state != Some(returned_state.as_str()) {
        return Err(ApiError::BadRequest("OAuth state mismatch".to_string()));
    }

    let token = google::exchange_code(
        &state.http,
        &state.config.google.client_id,
        &state.config.google.client_secret,
        &state.config.redirect_uri(),
        &code,
    )
    .await?;

    let profile = google::fetch_userinfo(&state.http, &token.access_token).await?;

    let email = profile.email.ok_or_else(|| {
        ApiError::BadRequest("Could not retrieve user information from Google".to_string())
    })?;
    let name = profile.name.unwrap_or_else(|| email.clone());

    let user = match User::find_by_google_id(&state.db, &profile.sub).await? {
        Some(_) => User::refresh_avatar(&state.db, &profile.sub, profile.picture.as_deref())
            .await?
            .ok_or_else(|| ApiError::InternalError("User disappeared during login".to_string()))?,
        None => {
            let created = User::create(
                &state.db,
                CreateUser {
                    google_id: profile.sub,
                    email,
                    name,
                    avatar_url: profile.picture,
                },
            )
            .await?;
            info!(user_id = created.id, "Created user on first login");
            created
        }
    };

    let claims = session::SessionClaims::new(&user.summary());
    let session_token = session::create_token(&claims, state.session_secret())?;

    let secure = state.config.session.secure_cookies;
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            session::build_cookie(
                session::SESSION_COOKIE,
                &session_token,
                session::SESSION_TTL_SECONDS,
                secure,
            ),
        ),
        (
            header::SET_COOKIE,
            session::clear_cookie(session::STATE_COOKIE, secure),
        ),
    ]);

    info!(user_id = user.id, "User logged in");

    Ok((cookies, Redirect::to(&state.config.frontend_url)))
}

/// Logout
///
/// Expires the session cookie and redirects to the frontend's logged-out
/// page. The token itself simply stops being presented; it carries its
/// own expiry.
///
/// # Endpoint
///
/// ```text
/// GET /logout
/// ```
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let headers = AppendHeaders([(
        header::SET_COOKIE,
        session::clear_cookie(session::SESSION_COOKIE, state.config.session.secure_cookies),
    )]);

    let destination = format!("{}/logged-out", state.config.frontend_url);

    (headers, Redirect::to(&destination))
}
