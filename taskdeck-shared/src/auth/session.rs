/// Session token generation and validation
///
/// Sessions are externally verifiable tokens (JWT, HS256) rather than
/// server-side state: the cookie value is self-describing, carries an
/// explicit expiry, and embeds the user summary so `/api/me` needs no
/// database round trip.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 7 days
/// - **Validation**: signature, expiration, issuer, and nbf checks
/// - **Secret management**: secrets must be at least 32 bytes
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::session::{create_token, validate_token, SessionClaims};
/// use taskdeck_shared::models::user::UserSummary;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = UserSummary {
///     id: 1,
///     name: "Jordan".to_string(),
///     email: "jordan@example.com".to_string(),
///     avatar_url: None,
///     designation: None,
///     is_profile_complete: false,
/// };
///
/// let claims = SessionClaims::new(&user);
/// let token = create_token(&claims, "a-secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "a-secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, 1);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::UserSummary;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "taskdeck_session";

/// Name of the short-lived OAuth CSRF state cookie
pub const STATE_COOKIE: &str = "taskdeck_oauth_state";

/// Session lifetime in seconds (7 days)
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// OAuth state cookie lifetime in seconds (10 minutes)
pub const STATE_TTL_SECONDS: i64 = 600;

const ISSUER: &str = "taskdeck";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid session token issuer")]
    InvalidIssuer,
}

/// Session token claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the user
/// summary the frontend needs, so a valid cookie is sufficient to answer
/// `/api/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: i32,

    /// Issuer - always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// User email
    pub email: String,

    /// User display name
    pub name: String,

    /// Profile picture URL
    pub avatar_url: Option<String>,

    /// Job title
    pub designation: Option<String>,

    /// Whether the profile completion step has been done
    pub profile_complete: bool,
}

impl SessionClaims {
    /// Creates claims for a user with the default session lifetime
    pub fn new(user: &UserSummary) -> Self {
        Self::with_expiration(user, Duration::seconds(SESSION_TTL_SECONDS))
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(user: &UserSummary, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user.id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            designation: user.designation.clone(),
            profile_complete: user.is_profile_complete,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Reconstructs the embedded user summary
    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.sub,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            designation: self.designation.clone(),
            is_profile_complete: self.profile_complete,
        }
    }
}

/// Creates a signed session token from claims
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, issuer, and nbf time.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired,
/// the issuer doesn't match, or the token is malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => SessionError::InvalidIssuer,
            _ => SessionError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

/// Builds a Set-Cookie value with the attributes used for all our cookies
///
/// `HttpOnly` keeps scripts away from the token; `SameSite=Lax` still
/// allows the OAuth redirect flow; `Secure` is appended in production.
pub fn build_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name, value, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds a Set-Cookie value that expires the named cookie
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}

/// Extracts a named cookie's value from a Cookie header
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        pair.split_once('=')
            .and_then(|(key, value)| (key == name).then_some(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn summary() -> UserSummary {
        UserSummary {
            id: 42,
            name: "Jordan Doe".to_string(),
            email: "jordan@example.com".to_string(),
            avatar_url: Some("https://img/avatar".to_string()),
            designation: Some("Engineer".to_string()),
            is_profile_complete: true,
        }
    }

    #[test]
    fn test_claims_creation() {
        let claims = SessionClaims::new(&summary());

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "taskdeck");
        assert_eq!(claims.email, "jordan@example.com");
        assert!(claims.profile_complete);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECONDS);
    }

    #[test]
    fn test_token_roundtrip_preserves_summary() {
        let user = summary();
        let claims = SessionClaims::new(&user);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.to_summary(), user);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = SessionClaims::new(&summary());
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "a-completely-different-secret-key").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = SessionClaims::with_expiration(&summary(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_validate_rejects_foreign_issuer() {
        let mut claims = SessionClaims::new(&summary());
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(SessionError::InvalidIssuer)));
    }

    #[test]
    fn test_build_cookie_attributes() {
        let cookie = build_cookie(SESSION_COOKIE, "tok", 3600, false);
        assert_eq!(
            cookie,
            "taskdeck_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );

        let secure = build_cookie(SESSION_COOKIE, "tok", 3600, true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_zeroes_max_age() {
        let cookie = clear_cookie(SESSION_COOKIE, false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("taskdeck_session=;"));
    }

    #[test]
    fn test_cookie_value_extraction() {
        let header = "other=1; taskdeck_session=abc.def.ghi; theme=dark";
        assert_eq!(cookie_value(header, SESSION_COOKIE), Some("abc.def.ghi"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_value_does_not_match_prefix_names() {
        let header = "taskdeck_session_old=stale; taskdeck_session=fresh";
        assert_eq!(cookie_value(header, SESSION_COOKIE), Some("fresh"));
    }
}
