use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub filters: FiltersConfig,
}

/// Database location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "boamp.db".to_string(),
        }
    }
}

/// Filter dropdown configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Cap on the distinct values returned for each dropdown
    pub max_options: usize,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self { max_options: 50 }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from the default location (boamp-dash.yml)
    pub fn load_default() -> Result<Self> {
        Self::load("boamp-dash.yml")
    }

    /// SQLite connection URL for the configured database path
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, "boamp.db");
        assert_eq!(config.filters.max_options, 50);
        assert_eq!(config.database_url(), "sqlite://boamp.db");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.database.path, "boamp.db");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
database:
  path: /var/data/boamp.db

filters:
  max_options: 20
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.path, "/var/data/boamp.db");
        assert_eq!(config.filters.max_options, 20);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("database:\n  path: other.db\n").unwrap();
        assert_eq!(config.database.path, "other.db");
        assert_eq!(config.filters.max_options, 50);
    }
}
