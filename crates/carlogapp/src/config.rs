//! # Configuration
//!
//! Carlog configuration is managed by [`confique`], which handles layered loading from
//! environment variables and a TOML file.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `CARLOG_DATA_DIR`, `CARLOG_BACKUP_INTERVAL_DAYS`, etc.
//! 2. **Config file**: `carlog.toml` in the OS-appropriate config directory (via the
//!    `directories` crate), or an explicit path.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `CARLOG_DATA_DIR` | platform data dir | Where the JSON documents live |
//! | `backup_interval_days` | `CARLOG_BACKUP_INTERVAL_DAYS` | `7` | Age at which the rolling backup is refreshed |
//! | `upcoming_days` | `CARLOG_UPCOMING_DAYS` | `30` | Reminder look-ahead window |
//! | `urgent_days` | `CARLOG_URGENT_DAYS` | `3` | Reminders due this soon are urgent |
//! | `currency` | `CARLOG_CURRENCY` | `SAR` | Label printed next to amounts |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::commands::dashboard::DashboardOptions;
use crate::error::{CarlogError, Result};

pub const CONFIG_FILE: &str = "carlog.toml";

/// Configuration for carlog, stored in `carlog.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CarlogConfig {
    /// Directory holding the data documents. Platform data dir when unset.
    #[config(env = "CARLOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Refresh the rolling backup when it is older than this many days.
    #[config(env = "CARLOG_BACKUP_INTERVAL_DAYS", default = 7)]
    pub backup_interval_days: u32,

    /// Reminders due within this many days count as upcoming.
    #[config(env = "CARLOG_UPCOMING_DAYS", default = 30)]
    pub upcoming_days: u32,

    /// Upcoming reminders due within this many days are urgent.
    #[config(env = "CARLOG_URGENT_DAYS", default = 3)]
    pub urgent_days: u32,

    #[config(env = "CARLOG_CURRENCY", default = "SAR")]
    pub currency: String,
}

impl Default for CarlogConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            backup_interval_days: 7,
            upcoming_days: 30,
            urgent_days: 3,
            currency: "SAR".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "carlog", "carlog")
}

impl CarlogConfig {
    /// Load from the environment, then `file` (or the default config file), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let path = file
            .map(Path::to_path_buf)
            .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE)));

        let mut builder = Self::builder().env();
        if let Some(path) = &path {
            debug!(path = %path.display(), "config file");
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| CarlogError::Config(e.to_string()))
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| CarlogError::Config("Could not determine data directory".to_string()))
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            upcoming_days: self.upcoming_days,
            urgent_days: self.urgent_days,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CarlogConfig::default();
        assert_eq!(config.backup_interval_days, 7);
        assert_eq!(config.upcoming_days, 30);
        assert_eq!(config.urgent_days, 3);
        assert_eq!(config.currency, "SAR");
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = CarlogConfig {
            data_dir: Some(PathBuf::from("/tmp/carlog-data")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/carlog-data"));
    }

    #[test]
    fn test_dashboard_options_follow_config() {
        let config = CarlogConfig {
            upcoming_days: 10,
            urgent_days: 1,
            ..Default::default()
        };
        let options = config.dashboard_options();
        assert_eq!(options.upcoming_days, 10);
        assert_eq!(options.urgent_days, 1);
        assert_eq!(options.months, 6);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "upcoming_days = 14\ncurrency = \"EUR\"\n").unwrap();

        let config = CarlogConfig::load(Some(&path)).unwrap();
        assert_eq!(config.upcoming_days, 14);
        assert_eq!(config.currency, "EUR");
    }
}
