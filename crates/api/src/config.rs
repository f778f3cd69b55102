use std::str::FromStr;

use kalamari_google::{DEFAULT_CALENDAR_API_URL, DEFAULT_TASKS_API_URL};

use crate::auth::jwt::JwtConfig;

/// Which store implementation backs templates and event groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx (requires `DATABASE_URL`).
    Postgres,
    /// Process-local maps; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Unknown STORE_BACKEND '{other}'. Must be one of: postgres, memory"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Template / event-group store backend (default: postgres).
    pub store_backend: StoreBackend,
    /// Base URL of the Calendar v3 API.
    pub google_calendar_api_url: String,
    /// Base URL of the Tasks v1 API.
    pub google_tasks_api_url: String,
    /// Per-call timeout for the external calendar service (default: `15`).
    pub external_request_timeout_secs: u64,
    /// Session token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                                   |
    /// |---------------------------------|-------------------------------------------|
    /// | `HOST`                          | `0.0.0.0`                                 |
    /// | `PORT`                          | `3000`                                    |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`                   |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `30`                                      |
    /// | `STORE_BACKEND`                 | `postgres`                                |
    /// | `GOOGLE_CALENDAR_API_URL`       | `https://www.googleapis.com/calendar/v3`  |
    /// | `GOOGLE_TASKS_API_URL`          | `https://tasks.googleapis.com/tasks/v1`   |
    /// | `EXTERNAL_REQUEST_TIMEOUT_SECS` | `15`                                      |
    ///
    /// `DATABASE_URL` is read separately at startup, and only for the
    /// postgres backend.
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parse("PORT", "3000");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", "30");
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", "30");
        let store_backend: StoreBackend = env_parse("STORE_BACKEND", "postgres");

        let google_calendar_api_url = std::env::var("GOOGLE_CALENDAR_API_URL")
            .unwrap_or_else(|_| DEFAULT_CALENDAR_API_URL.into());
        let google_tasks_api_url = std::env::var("GOOGLE_TASKS_API_URL")
            .unwrap_or_else(|_| DEFAULT_TASKS_API_URL.into());
        let external_request_timeout_secs: u64 =
            env_parse("EXTERNAL_REQUEST_TIMEOUT_SECS", "15");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store_backend,
            google_calendar_api_url,
            google_tasks_api_url,
            external_request_timeout_secs,
            jwt,
        }
    }
}

/// Read `key` (or `default`) and parse it, panicking with the key name on
/// failure.
fn env_parse<T>(key: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.into());
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}"))
}
