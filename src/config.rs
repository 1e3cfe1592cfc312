//! Configuration management for Microfibre.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `MICROFIBRE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use microfibre::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `MICROFIBRE_HOST` - Server bind address (default: 0.0.0.0)
//! - `MICROFIBRE_PORT` - Server port (default: 8787)
//! - `MICROFIBRE_DATABASE_URL` - SQLite URL (default: sqlite://microfibre.db)
//! - `MICROFIBRE_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `MICROFIBRE_AUTH_TOKEN` - Shared token for the `/v1` routes
//! - `MICROFIBRE_AUTH_ENABLED` - Enable the token gate (default: true)
//! - `MICROFIBRE_DEFAULT_PAGE_SIZE` - Posts per page when unspecified (default: 10)
//! - `MICROFIBRE_MAX_PAGE_SIZE` - Upper bound on `pageSize` (default: 100)
//! - `MICROFIBRE_CORS_ORIGINS` - Comma-separated allowed origins (default: any)

use clap::Parser;

use crate::posts::{PageLimits, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://microfibre.db";

/// Default number of pooled database connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Microfibre - a small personal micro-blogging API.
#[derive(Parser, Debug, Clone)]
#[command(name = "microfibre")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "MICROFIBRE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "MICROFIBRE_PORT")]
    pub port: u16,

    // =========================================================================
    // Database Configuration
    // =========================================================================
    /// SQLite database URL. The file is created if it does not exist.
    #[arg(long, default_value = DEFAULT_DATABASE_URL, env = "MICROFIBRE_DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, default_value_t = DEFAULT_DB_MAX_CONNECTIONS, env = "MICROFIBRE_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared token clients must send in the `x-auth-token` header.
    ///
    /// If not provided and auth is enabled, the server will fail to start.
    #[arg(long, env = "MICROFIBRE_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Require the auth token on the `/v1` routes.
    ///
    /// WARNING: Only disable authentication in development/testing.
    #[arg(long, default_value_t = true, env = "MICROFIBRE_AUTH_ENABLED", action = clap::ArgAction::Set)]
    pub auth_enabled: bool,

    // =========================================================================
    // Pagination Configuration
    // =========================================================================
    /// Posts per page when `pageSize` is absent or invalid.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, env = "MICROFIBRE_DEFAULT_PAGE_SIZE")]
    pub default_page_size: i64,

    /// Largest `pageSize` honoured; larger values are capped.
    #[arg(long, default_value_t = DEFAULT_MAX_PAGE_SIZE, env = "MICROFIBRE_MAX_PAGE_SIZE")]
    pub max_page_size: i64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "MICROFIBRE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_enabled {
            match self.auth_token.as_deref() {
                None => {
                    return Err(
                        "Authentication is enabled but no token provided. \
                         Set --auth-token or MICROFIBRE_AUTH_TOKEN, or disable auth with --auth-enabled=false"
                            .to_string(),
                    )
                }
                Some("") => return Err("auth_token must not be empty".to_string()),
                Some(_) => {}
            }
        }

        if self.database_url.trim().is_empty() {
            return Err(
                "Database URL is required. Set --database-url or MICROFIBRE_DATABASE_URL"
                    .to_string(),
            );
        }

        if self.db_max_connections == 0 {
            return Err("db_max_connections must be greater than 0".to_string());
        }

        if self.default_page_size <= 0 || self.max_page_size <= 0 {
            return Err("page sizes must be greater than 0".to_string());
        }
        if self.default_page_size > self.max_page_size {
            return Err("default_page_size must not exceed max_page_size".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the auth token, or "" when unset (call validate() first).
    pub fn auth_token_or_empty(&self) -> &str {
        self.auth_token.as_deref().unwrap_or("")
    }

    /// Page size bounds for list requests.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_size: self.default_page_size,
            max_size: self.max_page_size,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
