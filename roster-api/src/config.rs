/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. It is built once in `main` and shared
/// through [`AppState`](crate::app::AppState).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (default: postgresql://localhost:5432)
/// - `DATABASE_NAME`: Database selected on each connection (default: roster)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `TASK_COMPLETION_DELAY_MS`: Delay before the completion stamp (default: 2000)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use roster_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use roster_shared::db::pool::DatabaseConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Store configuration
    pub store: StoreConfig,

    /// Background side-effect configuration
    pub worker: WorkerSettings,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Which store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND '{}', expected postgres or memory", other),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Pool settings, used by the postgres backend
    pub database: DatabaseConfig,
}

/// Background side-effect configuration
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Delay before a completed task gets its `completed_at` stamp
    pub completion_delay: Duration,
}

fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value '{}' for {}: {}", raw, name, e))
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// Every variable has a default, so an empty environment yields a
    /// configuration for a local PostgreSQL database named `roster`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = parse_var::<u16>("API_PORT", "8080")?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let backend = parse_var::<StoreBackend>("STORE_BACKEND", "postgres")?;

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432".to_string()),
            database_name: Some(
                env::var("DATABASE_NAME").unwrap_or_else(|_| "roster".to_string()),
            ),
            max_connections: parse_var::<u32>("DATABASE_MAX_CONNECTIONS", "10")?,
            ..Default::default()
        };

        let completion_delay_ms = parse_var::<u64>("TASK_COMPLETION_DELAY_MS", "2000")?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            store: StoreConfig { backend, database },
            worker: WorkerSettings {
                completion_delay: Duration::from_millis(completion_delay_ms),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Returns true if any origin may call the API
    pub fn cors_permissive(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
