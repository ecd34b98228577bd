//! Server, catalog and logging configuration from TOML

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[server]`: where the HTTP/WebSocket interface listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl FileServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[catalog]`: subject catalog location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub path: PathBuf,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/companies.json"),
        }
    }
}

/// `[logging]`: optional daily log file directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub directory: Option<PathBuf>,
}
