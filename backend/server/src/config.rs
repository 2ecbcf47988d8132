use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: Option<String>,
    pub sheets_webhook_url: Option<String>,
    pub sheets_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            cors_origin: var("CORS_ORIGIN").ok(),
            sheets_webhook_url: read_secret("SHEETS_WEBHOOK_URL")
                .or_else(|| var("SHEETS_WEBHOOK_URL").ok()),
            sheets_timeout: Duration::from_millis(try_load("SHEETS_TIMEOUT_MS", "5000")?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            cors_origin: None,
            sheets_webhook_url: None,
            sheets_timeout: Duration::from_millis(5000),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse(
        key,
        var(key).unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }),
    )
}

fn parse<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret at {path}: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_port() {
        let port: u16 = parse("RUST_PORT", " 8080 ".to_string()).unwrap();

        assert_eq!(port, 8080);
    }

    #[test]
    fn rejects_bad_port() {
        let result: Result<u16, _> = parse("RUST_PORT", "70000".to_string());

        match result {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "RUST_PORT"),
            Ok(port) => panic!("expected error, got {port}"),
        }
    }

    #[test]
    fn missing_secret_is_none() {
        assert_eq!(read_secret("DOES_NOT_EXIST_FOR_TESTS"), None);
    }

    #[test]
    fn default_has_no_webhook() {
        let config = Config::default();

        assert_eq!(config.port, 1111);
        assert!(config.sheets_webhook_url.is_none());
    }
}
