/// Database models for Taskdeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Team members created via Google login
/// - `task`: Tasks delegated between team members
/// - `company`: Admin-seeded company labels tasks may reference
/// - `report`: Weekly aggregate report
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
/// let user = User::create(
///     &pool,
///     CreateUser {
///         google_id: "108234...".to_string(),
///         email: "user@example.com".to_string(),
///         name: "Jordan Doe".to_string(),
///         avatar_url: None,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod company;
pub mod report;
pub mod task;
pub mod user;
