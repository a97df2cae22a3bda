//! # Taskdeck API Server Library
//!
//! This library provides the core functionality for the Taskdeck API
//! server: Google OAuth login, user profiles, task CRUD with filtering,
//! and the weekly aggregate report.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response-shaping middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
