//! Configuration loading.
//!
//! Resolution order, first hit wins:
//! 1. Explicit file passed with `--config`
//! 2. `TASKLIST_CONFIG_PATH`
//! 3. `./tasklist.yaml`
//! 4. `~/.tasklist/config.yaml`
//! 5. Built-in defaults
//!
//! ## Environment Variables
//! Applied on top of whichever file was loaded:
//! - `TASKLIST_DB_PATH` - Database path
//! - `TASKLIST_HOST` - HTTP bind address
//! - `TASKLIST_PORT` - HTTP port
//! - `TASKLIST_ALLOWED_ORIGINS` - Comma-separated CORS origins

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "tasklist.yaml";

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Address to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (default: 8000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser. Credentials are
    /// permitted for these origins.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("todo.sql")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_allowed_origins() -> Vec<String> {
    // Vite dev server
    vec!["http://localhost:5173".to_string()]
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve configuration from the standard locations and the process
    /// environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Same as [`Config::resolve`], with the environment and home directory
    /// supplied by the caller.
    pub fn resolve_with<F>(explicit: Option<&Path>, env: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| env("TASKLIST_CONFIG_PATH").map(PathBuf::from));

        let mut config = if let Some(path) = explicit {
            debug!(path = %path.display(), "Loading config");
            Self::load(&path)?
        } else {
            let candidates = [
                Some(PathBuf::from(PROJECT_CONFIG_FILE)),
                home.map(|h| h.join(".tasklist").join("config.yaml")),
            ];
            match candidates.into_iter().flatten().find(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "Loading config");
                    Self::load(&path)?
                }
                None => Self::default(),
            }
        };

        config.apply_env(env)?;
        Ok(config)
    }

    /// Apply `TASKLIST_*` overrides.
    pub fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = env("TASKLIST_DB_PATH") {
            self.database.path = PathBuf::from(db_path);
        }
        if let Some(host) = env("TASKLIST_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env("TASKLIST_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("TASKLIST_PORT is not a valid port: {}", port))?;
        }
        if let Some(origins) = env("TASKLIST_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        Ok(())
    }
}
