use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection string from DATABASE_URL. `None` leaves the service without a database.
    pub url: Option<String>,
    /// Display name reported by diagnostics
    pub name: Option<String>,
}

/// Where the document database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parse a connection string: `memory://`, `redb://<path>`,
    /// `file://<path>` or a bare filesystem path.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "DATABASE_URL cannot be empty".to_string(),
            ));
        }

        match url.split_once("://") {
            Some(("memory", _)) => Ok(DatabaseTarget::Memory),
            Some(("redb" | "file", path)) if !path.is_empty() => {
                Ok(DatabaseTarget::File(PathBuf::from(path)))
            }
            Some(("redb" | "file", _)) => Err(ConfigError::ValidationError(format!(
                "DATABASE_URL '{url}' has no path"
            ))),
            Some((scheme, _)) => Err(ConfigError::UnsupportedScheme(scheme.to_string())),
            None if url == "memory" => Ok(DatabaseTarget::Memory),
            None => Ok(DatabaseTarget::File(PathBuf::from(url))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(p) => p.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got '{p}'"))
            })?,
            Err(_) => 8000,
        };

        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let name = std::env::var("DATABASE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let config = Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig { url, name },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "HOST cannot be empty".to_string(),
            ));
        }

        if self.database.url.is_none() {
            tracing::warn!("DATABASE_URL is not set; document routes will fail until it is");
        }

        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Parsed database target, or `None` if DATABASE_URL is unset.
    pub fn database_target(&self) -> Option<Result<DatabaseTarget, ConfigError>> {
        self.database.url.as_deref().map(DatabaseTarget::parse)
    }
}
