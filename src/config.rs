use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.quantix.example.com";

/// Deployment discriminator. `Test` builds the full application but never
/// binds the network listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: String,
    pub api_token: String,
    pub bind_addr: String,
    pub bind_port: u16,
    pub environment: Environment,
    pub upstream_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("QUANTIX_API_KEY is required and must not be empty")]
    MissingApiKey,
    #[error("MCP_API_TOKEN is required and must not be empty")]
    MissingApiToken,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_ENV must be one of: development, production, test")]
    InvalidEnvironment,
    #[error("API_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Env lookup is injected so tests can run without touching process
    /// environment (which is shared across the test binary).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let trimmed = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = trimmed("QUANTIX_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = trimmed("QUANTIX_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let api_token = trimmed("MCP_API_TOKEN").ok_or(ConfigError::MissingApiToken)?;

        let bind_addr = trimmed("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = trimmed("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(3001);

        let environment = match trimmed("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some("test") => Environment::Test,
            Some(_) => return Err(ConfigError::InvalidEnvironment),
        };

        let upstream_timeout_secs = trimmed("API_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(30);

        let config = Self {
            api_base_url,
            api_key,
            api_token,
            bind_addr,
            bind_port,
            environment,
            upstream_timeout_secs,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
