use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("can't parse config {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("unknown log level {level:?}")]
    LogLevel { level: String },
}

/// Server settings, read from a JSON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_base_path: String,
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub jwt_expires: u64,
    /// SQLite database file; the in-memory store is used when absent.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Mirror log output into this file, rotated at 5 MiB.
    pub log_file: Option<PathBuf>,
    pub bcrypt_cost: u32,
    pub seed_users: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_base_path: "/api/v1".to_string(),
            jwt_secret: "change-me".to_string(),
            jwt_expires: 60,
            database_path: None,
            log_level: "info".to_string(),
            log_file: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_users: false,
        }
    }
}

impl Config {
    /// Loads `path`, or the defaults if the file doesn't exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(raw) => {
                serde_json::from_slice(&raw).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_level(&self) -> Result<Level, ConfigError> {
        self.log_level.parse().map_err(|_| ConfigError::LogLevel { level: self.log_level.clone() })
    }
}
