use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// The single origin allowed by the CORS layer
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Major API version, mounted as `/v{major}`
    #[serde(default = "default_api_version")]
    pub api_version: u32,
}

/// Relational store settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:8082".to_string()
}

fn default_api_version() -> u32 {
    1
}

fn default_database_url() -> String {
    "sqlite://restaurants.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            api_version: default_api_version(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn api_prefix(&self) -> String {
        format!("/v{}", self.api_version)
    }
}

impl AppConfig {
    /// Load configuration from `CONFIG_PATH` (default `config.toml`),
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("PORT") {
            match raw.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!("Invalid PORT value {:?}: {}, keeping {}", raw, e, self.server.port),
            }
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.socket_addr(), "0.0.0.0:8000");
        assert_eq!(config.server.api_prefix(), "/v1");
        assert_eq!(config.server.cors_origin, "http://localhost:8082");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [server]
            port = 9090
            api_version = 2

            [database]
            url = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.api_prefix(), "/v2");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        assert!(AppConfig::parse("[server]\nport = \"not a number\"").is_err());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "PORT" => Some("9191".to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "CORS_ORIGIN" => Some("https://ratings.example".to_string()),
            _ => None,
        });

        assert_eq!(config.server.port, 9191);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.cors_origin, "https://ratings.example");
    }

    #[test]
    fn test_unparsable_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.url, "sqlite://restaurants.db");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::from_file(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }
}
