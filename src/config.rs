use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths::{config_file_path, database_file_path};
use crate::timeline::transforms::DEFAULT_WEIGHT;

pub const DEFAULT_MAX_PROGRAMS: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: Option<PathBuf>,
    pub max_programs: usize,
    pub default_weight: u32,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            max_programs: DEFAULT_MAX_PROGRAMS,
            default_weight: DEFAULT_WEIGHT,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => database_file_path(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// An explicit path must exist; the default location may be missing.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }
    let path = config_file_path()?;
    if path.exists() {
        return load_config(&path);
    }
    Ok(Config::default())
}

fn validate_config(config: &Config) -> Result<()> {
    if config.max_programs == 0 {
        anyhow::bail!("max_programs must be at least 1");
    }
    if config.default_weight == 0 {
        anyhow::bail!("default_weight must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("max_programs = 1000").expect("config should parse");
        assert_eq!(config.max_programs, 1000);
        assert_eq!(config.default_weight, DEFAULT_WEIGHT);
        assert_eq!(config.database, None);
    }

    #[test]
    fn load_config_reads_and_validates_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"/tmp/channels.db\"\ndefault_weight = 5\nlog_filter = \"chanplan=trace\"\n",
        )
        .expect("write config");

        let config = load_config(&path).expect("config should load");
        assert_eq!(config.database, Some(PathBuf::from("/tmp/channels.db")));
        assert_eq!(config.default_weight, 5);
        assert_eq!(config.log_filter.as_deref(), Some("chanplan=trace"));

        std::fs::write(&path, "max_programs = 0\n").expect("write config");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_config_or_default(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
