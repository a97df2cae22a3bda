/// Request authentication
///
/// Every `/api/*` route requires a valid session cookie. `authenticate`
/// extracts and validates the cookie from request headers and produces
/// the `SessionUser` context; the API server wires it into an Axum
/// middleware layer that inserts the context into request extensions.
/// Rejection happens before any database access.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::SessionUser;
///
/// async fn handler(Extension(user): Extension<SessionUser>) -> String {
///     format!("Hello, {}!", user.name)
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::session::{self, SessionClaims, SessionError};
use crate::models::user::UserSummary;

/// Authenticated user context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID
    pub id: i32,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Profile picture URL
    pub avatar_url: Option<String>,

    /// Job title
    pub designation: Option<String>,

    /// Whether the profile completion step has been done
    pub profile_complete: bool,
}

impl SessionUser {
    /// Creates the context from validated session claims
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            name: claims.name.clone(),
            avatar_url: claims.avatar_url.clone(),
            designation: claims.designation.clone(),
            profile_complete: claims.profile_complete,
        }
    }

    /// Returns the wire-format user summary
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            designation: self.designation.clone(),
            is_profile_complete: self.profile_complete,
        }
    }
}

/// Error type for request authentication
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie on the request
    MissingSession,

    /// Session cookie failed validation
    InvalidSession(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingSession => "Unauthorized".to_string(),
            AuthError::InvalidSession(msg) => msg,
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized", "message": message })),
        )
            .into_response()
    }
}

/// Authenticates a request from its headers
///
/// Looks up the session cookie, validates the token, and returns the
/// session user context. No database access is involved.
///
/// # Errors
///
/// Returns 401-mapped errors if the cookie is absent, malformed, expired,
/// or carries a bad signature.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<SessionUser, AuthError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingSession)?;

    let token = session::cookie_value(cookie_header, session::SESSION_COOKIE)
        .ok_or(AuthError::MissingSession)?;

    let claims = session::validate_token(token, secret).map_err(|e| match e {
        SessionError::Expired => AuthError::InvalidSession("Session expired".to_string()),
        other => AuthError::InvalidSession(format!("Invalid session: {}", other)),
    })?;

    Ok(SessionUser::from_claims(&claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{create_token, SESSION_COOKIE};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn summary() -> UserSummary {
        UserSummary {
            id: 9,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            avatar_url: None,
            designation: Some("PM".to_string()),
            is_profile_complete: true,
        }
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_cookie() {
        let claims = SessionClaims::new(&summary());
        let token = create_token(&claims, SECRET).unwrap();
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, token));

        let user = authenticate(&headers, SECRET).expect("Should authenticate");
        assert_eq!(user.id, 9);
        assert_eq!(user.email, "sam@example.com");
        assert_eq!(user.summary(), summary());
    }

    #[test]
    fn test_authenticate_missing_cookie() {
        let result = authenticate(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingSession)));

        // Other cookies present but not ours
        let headers = headers_with_cookie("theme=dark");
        let result = authenticate(&headers, SECRET);
        assert!(matches!(result, Err(AuthError::MissingSession)));
    }

    #[test]
    fn test_authenticate_garbage_token() {
        let headers = headers_with_cookie(&format!("{}=not.a.token", SESSION_COOKIE));
        let result = authenticate(&headers, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidSession(_))));
    }

    #[test]
    fn test_authenticate_wrong_secret() {
        let claims = SessionClaims::new(&summary());
        let token = create_token(&claims, "another-secret-key-of-sufficient-len").unwrap();
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, token));

        assert!(authenticate(&headers, SECRET).is_err());
    }

    #[test]
    fn test_auth_error_maps_to_401() {
        let response = AuthError::MissingSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidSession("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
