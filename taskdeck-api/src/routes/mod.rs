/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Google OAuth login flow (login, callback, logout)
/// - `users`: Session user, profile completion, assignable users
/// - `companies`: Seeded company labels
/// - `tasks`: Task CRUD with filtering
/// - `reports`: Weekly aggregate report

pub mod auth;
pub mod companies;
pub mod health;
pub mod reports;
pub mod tasks;
pub mod users;
