//! Application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `MUHAJIRIN_*` environment variables, each layer overriding the previous one.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_PATH_VAR: &str = "MUHAJIRIN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "muhajirin.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub cors_origin: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:muhajirin.db".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            max_connections: 5,
        }
    }
}

impl AppConfig {
    /// Load the configuration for the running process
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let mut config = match &explicit {
            // A path given explicitly must exist
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {:?}", path))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Override values with whatever `lookup` returns for the `MUHAJIRIN_*` keys
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MUHAJIRIN_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = lookup("MUHAJIRIN_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(origin) = lookup("MUHAJIRIN_CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        if let Some(raw) = lookup("MUHAJIRIN_MAX_CONNECTIONS") {
            self.max_connections = raw
                .trim()
                .parse()
                .with_context(|| format!("MUHAJIRIN_MAX_CONNECTIONS must be a positive integer, got '{}'", raw))?;
        }
        Ok(())
    }
}
