//! Layered service configuration.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. `dictionary.toml` in the working directory when present, or the
//!    `--config` path, which must exist
//! 3. `PORT` (port only)
//! 4. `DICTIONARY_*` environment variables, `__` separating sections
//!    (`DICTIONARY_SERVER__PORT` -> `server.port`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderValue;
use dictionary::{StorageOptions, DEFAULT_DB_URL};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "dictionary.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_db_url() -> String {
    DEFAULT_DB_URL.to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_timeout_secs(),
            query_timeout_secs: default_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            url: self.url.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

const fn default_page_size() -> u32 {
    10
}

const fn default_max_page_size() -> u32 {
    100
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load from all sources and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let file = PathBuf::from(DEFAULT_CONFIG_FILE);
                if file.exists() {
                    figment = figment.merge(Toml::file(file));
                }
            }
        }

        figment
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::prefixed("DICTIONARY_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be between 1 and 65535"));
        }
        for origin in &self.server.cors_origins {
            if !is_valid_origin(origin) {
                return Err(invalid(
                    "server.cors_origins",
                    &format!("{origin:?} is not an http(s) origin"),
                ));
            }
        }
        if self.database.max_connections == 0 {
            return Err(invalid("database.max_connections", "must be at least 1"));
        }
        if self.database.acquire_timeout_secs == 0 {
            return Err(invalid("database.acquire_timeout_secs", "must be at least 1"));
        }
        if self.database.query_timeout_secs == 0 {
            return Err(invalid("database.query_timeout_secs", "must be at least 1"));
        }
        if self.listing.default_page_size == 0 {
            return Err(invalid("listing.default_page_size", "must be at least 1"));
        }
        if self.listing.default_page_size > self.listing.max_page_size {
            return Err(invalid(
                "listing.default_page_size",
                "must not exceed listing.max_page_size",
            ));
        }
        Ok(())
    }
}

fn is_valid_origin(origin: &str) -> bool {
    (origin.starts_with("http://") || origin.starts_with("https://"))
        && HeaderValue::from_str(origin).is_ok()
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_correct() {
        let config = Config::default();
        assert_eq!(config.server.socket_addr(), "0.0.0.0:3000");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.database.url, "sqlite://dictionary.db");
        assert_eq!(config.listing.default_page_size, 10);
        assert_eq!(config.logging.level, "info");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn file_then_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                    [server]
                    port = 8080
                    cors_origins = ["http://localhost:5173"]

                    [database]
                    url = "sqlite://words.db"
                "#,
            )?;
            jail.set_env("DICTIONARY_DATABASE__MAX_CONNECTIONS", "2");
            jail.set_env("DICTIONARY_LISTING__MAX_PAGE_SIZE", "50");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
            assert_eq!(config.database.url, "sqlite://words.db");
            assert_eq!(config.database.max_connections, 2);
            assert_eq!(config.listing.max_page_size, 50);
            assert_eq!(config.database.query_timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn port_variable_is_honoured() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "4000");
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 4000);

            jail.set_env("DICTIONARY_SERVER__PORT", "4100");
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 4100);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_used() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[logging]\nlevel = \"debug\"\n")?;
            let config = Config::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "[server]\nport = 8080\n")?;
            let error = Config::load(Some(Path::new("does-not-exist.toml"))).unwrap_err();
            assert!(matches!(error, ConfigError::MissingFile(ref path) if path == Path::new("does-not-exist.toml")));
            assert_eq!(
                error.to_string(),
                "Configuration file not found: does-not-exist.toml"
            );
            Ok(())
        });
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        Jail::expect_with(|_| {
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 3000);
            Ok(())
        });
    }

    #[test]
    fn malformed_cors_origins_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                "[server]\ncors_origins = [\"https://example.com\", \"localhost:5173\"]\n",
            )?;
            let error = Config::load(None).unwrap_err();
            assert!(matches!(error, ConfigError::InvalidValue { ref field, .. } if field == "server.cors_origins"));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("DICTIONARY_LISTING__DEFAULT_PAGE_SIZE", "500");
            let error = Config::load(None).unwrap_err();
            assert!(matches!(error, ConfigError::InvalidValue { ref field, .. } if field == "listing.default_page_size"));

            jail.set_env("DICTIONARY_LISTING__DEFAULT_PAGE_SIZE", "10");
            jail.set_env("DICTIONARY_DATABASE__QUERY_TIMEOUT_SECS", "0");
            let error = Config::load(None).unwrap_err();
            assert_eq!(
                error.to_string(),
                "Invalid configuration value for 'database.query_timeout_secs': must be at least 1"
            );
            Ok(())
        });
    }
}
