/// Google OAuth client
///
/// Implements the three provider interactions of the login flow: building
/// the authorization redirect, exchanging the callback code for an access
/// token, and fetching the user's profile from the userinfo endpoint.
/// Scope is `openid email profile`.

use reqwest::Url;
use serde::Deserialize;
use uuid::Uuid;

/// Google authorization endpoint
pub const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google token exchange endpoint
pub const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";

/// OpenID Connect userinfo endpoint
pub const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Requested OAuth scopes
pub const SCOPE: &str = "openid email profile";

/// Error type for OAuth operations
#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    /// Network or protocol failure talking to Google
    #[error("OAuth request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Could not assemble a request URL
    #[error("Invalid OAuth URL: {0}")]
    BadUrl(String),

    /// Google rejected the code exchange
    #[error("Code exchange rejected ({status}): {body}")]
    Exchange { status: u16, body: String },

    /// Google rejected the userinfo request
    #[error("Userinfo request rejected ({status})")]
    Userinfo { status: u16 },
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for the userinfo request
    pub access_token: String,

    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,

    /// Token type (always "Bearer")
    #[serde(default)]
    pub token_type: Option<String>,

    /// OpenID Connect ID token
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Profile fields returned by the userinfo endpoint
///
/// Only `sub` is guaranteed; the handler rejects logins without an email.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Stable Google account identifier
    pub sub: String,

    /// Account email
    pub email: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Profile picture URL
    pub picture: Option<String>,
}

/// Generates a random state nonce for CSRF protection
pub fn generate_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Builds the authorization redirect URL
///
/// # Errors
///
/// Returns an error if the URL cannot be assembled
pub fn authorize_url(
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, GoogleAuthError> {
    let url = Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| GoogleAuthError::BadUrl(e.to_string()))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access token
///
/// # Errors
///
/// Returns an error if the request fails or Google rejects the code
pub async fn exchange_code(
    http: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, GoogleAuthError> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("redirect_uri", redirect_uri),
        ("grant_type", "authorization_code"),
        ("code", code),
    ];

    let response = http.post(TOKEN_URL).form(&params).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleAuthError::Exchange { status, body });
    }

    Ok(response.json().await?)
}

/// Fetches the user's profile with the exchanged access token
///
/// # Errors
///
/// Returns an error if the request fails or the token is rejected
pub async fn fetch_userinfo(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<GoogleUserInfo, GoogleAuthError> {
    let response = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GoogleAuthError::Userinfo {
            status: response.status().as_u16(),
        });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_carries_all_params() {
        let url = authorize_url(
            "client-123",
            "http://localhost:5001/auth",
            "state-abc",
        )
        .unwrap();

        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=state-abc"));
        // redirect_uri must be percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5001%2Fauth"));
        assert!(url.contains("scope=openid+email+profile") || url.contains("scope=openid%20email%20profile"));
    }

    #[test]
    fn test_generate_state_is_unique_and_opaque() {
        let a = generate_state();
        let b = generate_state();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_response_ignores_extra_fields() {
        let json = r#"{
            "access_token": "ya29.a0Af",
            "expires_in": 3599,
            "scope": "openid email profile",
            "token_type": "Bearer",
            "id_token": "eyJ..."
        }"#;

        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "ya29.a0Af");
        assert_eq!(parsed.expires_in, Some(3599));
        assert_eq!(parsed.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn test_userinfo_tolerates_missing_optional_fields() {
        let parsed: GoogleUserInfo = serde_json::from_str(r#"{"sub": "108"}"#).unwrap();
        assert_eq!(parsed.sub, "108");
        assert!(parsed.email.is_none());
        assert!(parsed.name.is_none());
        assert!(parsed.picture.is_none());
    }
}
