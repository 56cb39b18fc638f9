//! Application configuration
//!
//! Loaded from a TOML file, then overridden by a handful of environment
//! variables. Every section has defaults so a missing file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};

/// Environment variable pointing at the config file
pub const CONFIG_PATH_ENV: &str = "COMPLAINT_DESK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    /// Token lifetime: "30m", "1h", "7d", or a bare number of hours
    pub jwt_expiration: String,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration: "7d".to_string(),
            bcrypt_cost: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    pub demo_data: bool,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply PORT, DATABASE_URL, JWT_SECRET, JWT_EXPIRE and LOG_LEVEL.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(expire) = lookup("JWT_EXPIRE") {
            self.security.jwt_expiration = expire;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        parse_expiry(&self.security.jwt_expiration)?;
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "security.bcrypt_cost must be between 4 and 31".into(),
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn jwt_config(&self) -> Result<JwtConfig, ConfigError> {
        Ok(JwtConfig::new(
            self.security.jwt_secret.clone(),
            parse_expiry(&self.security.jwt_expiration)?,
        ))
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }
}

/// Config file location: `$COMPLAINT_DESK_CONFIG`, else
/// `~/.config/complaint-desk/config.toml`, else `./config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join("complaint-desk").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Longest accepted token lifetime
pub const MAX_JWT_EXPIRATION_SECS: i64 = 365 * 86_400;

/// Parse a token lifetime into seconds. At most [`MAX_JWT_EXPIRATION_SECS`].
pub fn parse_expiry(raw: &str) -> Result<i64, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::Invalid(format!("Invalid jwt_expiration '{}'", raw));

    let (digits, unit_secs) = match raw.chars().last() {
        Some('s') => (&raw[..raw.len() - 1], 1),
        Some('m') => (&raw[..raw.len() - 1], 60),
        Some('h') => (&raw[..raw.len() - 1], 3600),
        Some('d') => (&raw[..raw.len() - 1], 86_400),
        Some(c) if c.is_ascii_digit() => (raw, 3600),
        _ => return Err(invalid()),
    };

    let value: i64 = digits.trim().parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    value
        .checked_mul(unit_secs)
        .filter(|secs| *secs <= MAX_JWT_EXPIRATION_SECS)
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "jwt_expiration '{}' exceeds the 365 day maximum",
                raw
            ))
        })
}
