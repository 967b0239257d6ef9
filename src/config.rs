use std::{env, str::FromStr};

use anyhow::Context;

/// Backing store selected with `APP_STORAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown APP_STORAGE value: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Password every newly created user starts with.
    pub default_user_password: String,
    pub require_forced_password_reset: bool,
    pub default_commission_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".to_string(),
            port: 3000,
            storage: StorageBackend::Memory,
            default_user_password: "ChangeMe123!".to_string(),
            require_forced_password_reset: true,
            default_commission_rate: 10.0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let storage = match env::var("APP_STORAGE") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };
        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when APP_STORAGE=postgres");
        }
        let host = env::var("APP_HOST").unwrap_or(defaults.host);
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let default_user_password =
            env::var("DEFAULT_USER_PASSWORD").unwrap_or(defaults.default_user_password);
        let require_forced_password_reset = match env::var("REQUIRE_FORCED_PASSWORD_RESET") {
            Ok(value) => parse_flag(&value)
                .with_context(|| format!("invalid REQUIRE_FORCED_PASSWORD_RESET: {value}"))?,
            Err(_) => defaults.require_forced_password_reset,
        };
        let default_commission_rate = match env::var("DEFAULT_COMMISSION_RATE") {
            Ok(value) => value
                .parse::<f64>()
                .with_context(|| format!("invalid DEFAULT_COMMISSION_RATE: {value}"))?,
            Err(_) => defaults.default_commission_rate,
        };
        Ok(Self {
            database_url,
            host,
            port,
            storage,
            default_user_password,
            require_forced_password_reset,
            default_commission_rate,
        })
    }

    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL is not set")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_and_flags_parse_loosely() {
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("pg".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
