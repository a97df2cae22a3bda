/// User model and database operations
///
/// Users are created on their first Google login with an incomplete
/// profile. Completing the profile (name + designation) is a one-time
/// step that gates appearing in the assignable-users list.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     google_id VARCHAR(255) UNIQUE NOT NULL,
///     email VARCHAR(255) UNIQUE NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     avatar_url TEXT,
///     designation VARCHAR(255),
///     is_profile_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // First login creates the user with an incomplete profile
/// let user = User::create(
///     &pool,
///     CreateUser {
///         google_id: "108234567890".to_string(),
///         email: "user@example.com".to_string(),
///         name: "Jordan Doe".to_string(),
///         avatar_url: Some("https://lh3.googleusercontent.com/a/x".to_string()),
///     },
/// )
/// .await?;
/// assert!(!user.is_profile_complete);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing a team member
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i32,

    /// Google account subject identifier
    pub google_id: String,

    /// Email address reported by Google
    pub email: String,

    /// Display name (Google name until the profile is completed)
    pub name: String,

    /// Profile picture URL, refreshed on every login
    pub avatar_url: Option<String>,

    /// Job title, set during profile completion
    pub designation: Option<String>,

    /// Whether the one-time profile completion step has been done
    pub is_profile_complete: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// The user summary exposed over the wire and embedded in session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    /// Unique user ID
    pub id: i32,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Profile picture URL
    pub avatar_url: Option<String>,

    /// Job title
    pub designation: Option<String>,

    /// Whether the profile has been completed
    pub is_profile_complete: bool,
}

/// Input for creating a new user on first login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Google account subject identifier
    pub google_id: String,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Profile picture URL
    pub avatar_url: Option<String>,
}

impl User {
    /// Returns the wire/session summary for this user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            designation: self.designation.clone(),
            is_profile_complete: self.is_profile_complete,
        }
    }

    /// Creates a new user with an incomplete profile
    ///
    /// # Errors
    ///
    /// Returns an error if the google_id or email already exists (unique
    /// constraint violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (google_id, email, name, avatar_url, is_profile_complete)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id, google_id, email, name, avatar_url, designation,
                      is_profile_complete, created_at, updated_at
            "#,
        )
        .bind(data.google_id)
        .bind(data.email)
        .bind(data.name)
        .bind(data.avatar_url)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by Google account identifier
    pub async fn find_by_google_id(
        pool: &PgPool,
        google_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, google_id, email, name, avatar_url, designation,
                   is_profile_complete, created_at, updated_at
            FROM users
            WHERE google_id = $1
            "#,
        )
        .bind(google_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Refreshes the avatar of a returning user
    ///
    /// Google may rotate profile picture URLs between logins, so the
    /// stored avatar is overwritten on every login.
    ///
    /// # Returns
    ///
    /// The updated user if found, None otherwise
    pub async fn refresh_avatar(
        pool: &PgPool,
        google_id: &str,
        avatar_url: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET avatar_url = $2, updated_at = NOW()
            WHERE google_id = $1
            RETURNING id, google_id, email, name, avatar_url, designation,
                      is_profile_complete, created_at, updated_at
            "#,
        )
        .bind(google_id)
        .bind(avatar_url)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Completes a user's profile
    ///
    /// Sets name and designation and marks the profile complete. This is
    /// the step that makes the user appear in the assignable-users list.
    ///
    /// # Returns
    ///
    /// The updated user if found, None otherwise
    pub async fn complete_profile(
        pool: &PgPool,
        id: i32,
        name: &str,
        designation: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, designation = $3, is_profile_complete = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, google_id, email, name, avatar_url, designation,
                      is_profile_complete, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(designation)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users with completed profiles, ordered by name
    pub async fn list_completed(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, email, avatar_url, designation, is_profile_complete
            FROM users
            WHERE is_profile_complete = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_carries_all_session_fields() {
        let user = User {
            id: 7,
            google_id: "g-123".to_string(),
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            avatar_url: Some("https://img".to_string()),
            designation: Some("Engineer".to_string()),
            is_profile_complete: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let summary = user.summary();
        assert_eq!(summary.id, 7);
        assert_eq!(summary.name, "A");
        assert_eq!(summary.email, "a@b.co");
        assert_eq!(summary.avatar_url.as_deref(), Some("https://img"));
        assert_eq!(summary.designation.as_deref(), Some("Engineer"));
        assert!(summary.is_profile_complete);
    }

    #[test]
    fn test_summary_does_not_leak_google_id() {
        let user = User {
            id: 1,
            google_id: "secret-subject".to_string(),
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            avatar_url: None,
            designation: None,
            is_profile_complete: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(user.summary()).unwrap();
        assert!(json.get("google_id").is_none());
    }
}
