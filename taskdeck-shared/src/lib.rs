//! # Taskdeck Shared Library
//!
//! This crate contains the types, database operations, and auth utilities
//! shared by the Taskdeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Sessions, Google OAuth, and request authentication
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
