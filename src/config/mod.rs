use crate::core::{AppError, Result};
use crate::modules::gateways::SandboxSettings;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub sandbox: SandboxSettings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = SandboxSettings::default();
        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            sandbox: SandboxSettings {
                return_url: env::var("SANDBOX_RETURN_URL").unwrap_or(defaults.return_url),
                callback_base: env::var("SANDBOX_CALLBACK_BASE")
                    .unwrap_or(defaults.callback_base),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(AppError::configuration(
                "DATABASE_MAX_CONNECTIONS must be greater than 0",
            ));
        }

        for (name, url) in [
            ("SANDBOX_RETURN_URL", &self.sandbox.return_url),
            ("SANDBOX_CALLBACK_BASE", &self.sandbox.callback_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::configuration(format!(
                    "{} must be an absolute http(s) URL",
                    name
                )));
            }
        }

        Ok(())
    }
}
