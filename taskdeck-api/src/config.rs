/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5001)
/// - `SESSION_SECRET`: Secret key for session token signing (required,
///   at least 32 characters)
/// - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`: OAuth credentials
///   (required)
/// - `FRONTEND_URL`: Origin the browser is redirected back to
///   (default: http://localhost:3000)
/// - `BACKEND_URL`: Public base URL of this server, used to build the
///   OAuth redirect URI (default: http://localhost:5001)
/// - `APP_ENV`: "production" enables Secure cookies
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session cookie configuration
    pub session: SessionConfig,

    /// Google OAuth credentials
    pub google: GoogleConfig,

    /// Origin the browser is sent back to after login/logout
    pub frontend_url: String,

    /// Public base URL of this server
    pub backend_url: String,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for session token signing
    ///
    /// Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Whether cookies are marked Secure (production only)
    pub secure_cookies: bool,
}

/// Google OAuth credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// have invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if session_secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters long");
        }

        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("GOOGLE_CLIENT_ID environment variable is required"))?;
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").map_err(|_| {
            anyhow::anyhow!("GOOGLE_CLIENT_SECRET environment variable is required")
        })?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:5001".to_string());

        let secure_cookies = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret: session_secret,
                secure_cookies,
            },
            google: GoogleConfig {
                client_id: google_client_id,
                client_secret: google_client_secret,
            },
            frontend_url,
            backend_url,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Returns the OAuth redirect URI registered with Google
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth", self.backend_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 5001,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/taskdeck".to_string(),
                max_connections: 10,
            },
            session: SessionConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                secure_cookies: false,
            },
            google: GoogleConfig {
                client_id: "cid".to_string(),
                client_secret: "csecret".to_string(),
            },
            frontend_url: "http://localhost:3000".to_string(),
            backend_url: "http://localhost:5001".to_string(),
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:5001");
    }

    #[test]
    fn test_redirect_uri_appends_auth_path() {
        assert_eq!(test_config().redirect_uri(), "http://localhost:5001/auth");
    }
}
