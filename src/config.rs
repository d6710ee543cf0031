// Configuration module
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Base level or full `EnvFilter` directive string.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "postgres://postgres@localhost:5432/postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, apply environment overrides, then validate.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
            Self::from_toml(&content)?
        } else {
            ServerConfig::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Apply environment variable overrides
    ///
    /// - DATABASE_URL: Override database.url
    /// - DYNTABLES_HOST: Override server.host
    /// - DYNTABLES_PORT: Override server.port
    /// - DYNTABLES_LOG_LEVEL: Override logging.level
    /// - DYNTABLES_LOG_FORMAT: Override logging.format
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, var: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = var("DYNTABLES_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("DYNTABLES_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid DYNTABLES_PORT value: {}", port))?;
        }
        if let Some(level) = var("DYNTABLES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DYNTABLES_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port cannot be 0");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.format, "compact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            [server]
            port = 9000

            [database]
            url = "postgres://app@db/app"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "postgres://app@db/app");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(ServerConfig::from_toml("[server\nport = 1").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://other/db"),
            ("DYNTABLES_PORT", "7000"),
            ("DYNTABLES_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.database.url, "postgres://other/db");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ServerConfig::default();
        let result = config.apply_overrides(|k| (k == "DYNTABLES_PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = ServerConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
