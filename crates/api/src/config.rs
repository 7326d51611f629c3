use docvault_core::document::DEFAULT_MAX_CONTENT_BYTES;
use docvault_core::lineage::{LineageConfig, DEFAULT_MAX_INSERT_ATTEMPTS, DEFAULT_MAX_LINEAGE_DEPTH};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development, except
/// the JWT secret which must always be provided.
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
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Lineage engine bounds.
    pub lineage: LineageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `LINEAGE_MAX_DEPTH`           | `1000`                  |
    /// | `LINEAGE_MAX_INSERT_ATTEMPTS` | `5`                     |
    /// | `LINEAGE_MAX_CONTENT_BYTES`   | `1048576`               |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            lineage: lineage_config_from_env(),
        }
    }
}

fn lineage_config_from_env() -> LineageConfig {
    let max_lineage_depth: usize = std::env::var("LINEAGE_MAX_DEPTH")
        .unwrap_or_else(|_| DEFAULT_MAX_LINEAGE_DEPTH.to_string())
        .parse()
        .expect("LINEAGE_MAX_DEPTH must be a valid usize");

    let max_insert_attempts: u32 = std::env::var("LINEAGE_MAX_INSERT_ATTEMPTS")
        .unwrap_or_else(|_| DEFAULT_MAX_INSERT_ATTEMPTS.to_string())
        .parse()
        .expect("LINEAGE_MAX_INSERT_ATTEMPTS must be a valid u32");
    assert!(
        max_insert_attempts > 0,
        "LINEAGE_MAX_INSERT_ATTEMPTS must be at least 1"
    );

    let max_content_bytes: usize = std::env::var("LINEAGE_MAX_CONTENT_BYTES")
        .unwrap_or_else(|_| DEFAULT_MAX_CONTENT_BYTES.to_string())
        .parse()
        .expect("LINEAGE_MAX_CONTENT_BYTES must be a valid usize");

    LineageConfig {
        max_lineage_depth,
        max_insert_attempts,
        max_content_bytes,
    }
}
