/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskdeck_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::no_cache::NoCacheLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::middleware::{authenticate, AuthError};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// HTTP client for talking to Google
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    /// Gets the session token signing secret
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health               # Health check (public)
/// ├── /login                # Redirect to Google (public)
/// ├── /auth                 # OAuth callback (public)
/// ├── /logout               # Clear session (public)
/// └── /api/                 # Session-guarded
///     ├── GET  /me
///     ├── PUT  /profile
///     ├── GET  /users
///     ├── GET  /companies
///     ├── GET  /tasks          POST /tasks
///     ├── PUT  /tasks/:id      DELETE /tasks/:id
///     └── GET  /reports/weekly
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Cache suppression on session-scoped paths
/// 2. CORS (frontend origin, credentials allowed)
/// 3. Logging (tower-http TraceLayer)
/// 4. Session authentication (on `/api` only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: health check and the OAuth flow
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/login", get(routes::auth::login))
        .route("/auth", get(routes::auth::callback))
        .route("/logout", get(routes::auth::logout));

    // Everything under /api requires an authenticated session
    let api_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/profile", put(routes::users::update_profile))
        .route("/users", get(routes::users::list_users))
        .route("/companies", get(routes::companies::list_companies))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/reports/weekly", get(routes::reports::weekly_report))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // The browser sends the session cookie cross-origin, so CORS must
    // name the frontend origin explicitly and allow credentials.
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in [state.config.frontend_url.as_str(), "http://localhost:3000"] {
        if let Ok(value) = origin.parse::<HeaderValue>() {
            if !origins.contains(&value) {
                origins.push(value);
            }
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(NoCacheLayer::new())
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Validates the session cookie and injects the `SessionUser` context
/// into request extensions. Requests without a valid session are rejected
/// before any data access.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(req.headers(), state.session_secret())?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
