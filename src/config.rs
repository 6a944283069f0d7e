/// Configuration management for the EstatePro service
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
}

/// Authentication and lockout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// bcrypt work factor for credential hashing
    pub bcrypt_cost: u32,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
    /// Consecutive failed logins before the account locks
    pub lockout_threshold: i64,
    /// Lock duration in hours once the threshold is reached
    pub lockout_window_hours: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ESTATE_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("ESTATE_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("ESTATE_VERSION").unwrap_or_else(|_| "0.1.0".to_string());

        let data_directory: PathBuf = env::var("ESTATE_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("ESTATE_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("estatepro.sqlite"));

        let bcrypt_cost = env::var("ESTATE_BCRYPT_COST")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);
        let session_ttl_hours = env::var("ESTATE_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);
        let lockout_threshold = env::var("ESTATE_LOCKOUT_THRESHOLD")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let lockout_window_hours = env::var("ESTATE_LOCKOUT_WINDOW_HOURS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .unwrap_or(2);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                database,
            },
            auth: AuthConfig {
                bcrypt_cost,
                session_ttl_hours,
                lockout_threshold,
                lockout_window_hours,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if !(4..=16).contains(&self.auth.bcrypt_cost) {
            return Err(ApiError::Validation(
                "bcrypt cost must be between 4 and 16".to_string(),
            ));
        }

        if self.auth.lockout_threshold < 1 {
            return Err(ApiError::Validation(
                "Lockout threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
