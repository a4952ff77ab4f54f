//! Configuration management for the Farmstand POS backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FSP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token and allow-list configuration
    pub auth: AuthConfig,

    /// Report output configuration
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret key for signing app tokens
    pub jwt_secret: String,

    /// Token expiration in seconds
    pub token_expiry: i64,

    /// Comma-separated emails permitted to use the system
    pub allowed_users: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Directory report files are written under
    pub output_dir: String,
}

impl AuthConfig {
    /// The allow-list, trimmed and lowercased
    pub fn allowed_emails(&self) -> Vec<String> {
        self.allowed_users
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// Whether a verified identity may use the system
    pub fn is_allowed(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.allowed_emails().iter().any(|e| *e == email)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FSP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("auth.token_expiry", 43200)?
            .set_default("auth.allowed_users", "")?
            .set_default("reports.output_dir", "reports")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FSP_ prefix)
            .add_source(
                Environment::with_prefix("FSP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(list: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry: 3600,
            allowed_users: list.to_string(),
        }
    }

    #[test]
    fn test_allow_list_parsing() {
        let cfg = auth("boss@farmstand.tw, counter@farmstand.tw");
        assert_eq!(
            cfg.allowed_emails(),
            vec!["boss@farmstand.tw", "counter@farmstand.tw"]
        );
    }

    #[test]
    fn test_allow_list_case_insensitive() {
        let cfg = auth("Boss@Farmstand.tw");
        assert!(cfg.is_allowed("boss@farmstand.tw"));
        assert!(cfg.is_allowed(" BOSS@FARMSTAND.TW "));
        assert!(!cfg.is_allowed("other@farmstand.tw"));
    }

    #[test]
    fn test_empty_allow_list_denies_all() {
        let cfg = auth("");
        assert!(cfg.allowed_emails().is_empty());
        assert!(!cfg.is_allowed("boss@farmstand.tw"));
    }
}
