use std::env;

use thiserror::Error;

use crate::crux::DEFAULT_API_BASE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CRUX_API_KEY must be set — there is no default key")]
    MissingApiKey,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub crux_api_key: String,
    pub crux_api_base: String,
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // The CrUX API key is the one setting with no fallback: startup
        // fails when it is missing or blank.
        let crux_api_key = env::var("CRUX_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Config {
            crux_api_key,
            crux_api_base: env::var("CRUX_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5050".to_string())
                .parse()
                .unwrap_or(5050),
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_addr_joins_host_and_port() {
        let config = Config {
            crux_api_key: "k".into(),
            crux_api_base: DEFAULT_API_BASE.into(),
            server_host: "0.0.0.0".into(),
            server_port: 5050,
            is_dev: true,
        };
        assert_eq!(config.server_addr(), "0.0.0.0:5050");
    }
}
