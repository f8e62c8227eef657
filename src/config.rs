//! Application configuration module
//! Handles environment variable loading, configuration validation, and backend settings

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::payments::backend::BackendKind;
use crate::payments::providers::paystack::{PaystackConfig, DEFAULT_BASE_URL};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

/// Payment backend selection and gateway settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend: BackendKind,
    pub callback_timeout_secs: u64,
    pub paystack: PaystackConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
            gateway: GatewayConfig::from_env()?,
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logging.validate()?;
        self.gateway.validate()?;

        Ok(())
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue(
                "SERVER_PORT cannot be 0".to_string(),
            ));
        }

        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "plain".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        if !valid_levels.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue("LOG_LEVEL".to_string()));
        }

        Ok(())
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = BackendKind::from_str(
            &env::var("BRIDGE_BACKEND").unwrap_or_else(|_| "simulated".to_string()),
        )
        .map_err(|_| ConfigError::InvalidValue("BRIDGE_BACKEND".to_string()))?;

        let secret_key = match (backend, env::var("PAYSTACK_SECRET_KEY")) {
            (_, Ok(key)) => key,
            (BackendKind::Paystack, Err(_)) => {
                return Err(ConfigError::MissingVariable(
                    "PAYSTACK_SECRET_KEY".to_string(),
                ))
            }
            (BackendKind::Simulated, Err(_)) => String::new(),
        };

        Ok(GatewayConfig {
            backend,
            callback_timeout_secs: env::var("GATEWAY_CALLBACK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("GATEWAY_CALLBACK_TIMEOUT_SECS".to_string())
                })?,
            paystack: PaystackConfig {
                secret_key,
                base_url: env::var("PAYSTACK_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
                timeout_secs: env::var("PAYSTACK_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PAYSTACK_TIMEOUT_SECS".to_string()))?,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.callback_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_CALLBACK_TIMEOUT_SECS cannot be 0".to_string(),
            ));
        }

        if self.backend == BackendKind::Paystack {
            if self.paystack.secret_key.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "PAYSTACK_SECRET_KEY cannot be empty".to_string(),
                ));
            }

            if !self.paystack.base_url.starts_with("http://")
                && !self.paystack.base_url.starts_with("https://")
            {
                return Err(ConfigError::InvalidValue(
                    "PAYSTACK_BASE_URL must be a valid URL".to_string(),
                ));
            }
        }

        Ok(())
    }
}
