//! Configuration file support for the rehab tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rehab/config.toml`.

use crate::catalog::get_default_catalog;
use crate::schedule::get_default_schedule;
use crate::{Catalog, Error, Phase, Result, ScheduleTable};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub program: ProgramConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub schedule: ScheduleFileConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join("progress.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.jsonl")
    }

    pub fn weekly_path(&self) -> PathBuf {
        self.data_dir.join("weekly_assessments.jsonl")
    }

    pub fn monthly_path(&self) -> PathBuf {
        self.data_dir.join("monthly_assessments.jsonl")
    }
}

/// Which phase of the program the user is in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramConfig {
    #[serde(default = "default_phase")]
    pub phase: Phase,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            phase: default_phase(),
        }
    }
}

/// Optional replacement for the built-in catalog (JSON)
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Optional replacement for the built-in schedule table (TOML)
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ScheduleFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn home_or_cwd() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_or_cwd().join(".local/share"));
    base.join("rehab")
}

fn default_phase() -> Phase {
    Phase::One
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_or_cwd().join(".config"));
        base.join("rehab").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The configured catalog, validated, or the built-in one
    pub fn load_catalog(&self) -> Result<Cow<'static, Catalog>> {
        match &self.catalog.path {
            Some(path) => Ok(Cow::Owned(Catalog::load_from(path)?.validated()?)),
            None => Ok(Cow::Borrowed(get_default_catalog())),
        }
    }

    /// The configured schedule table validated against `catalog`, or the built-in one
    ///
    /// The built-in table is only checked when the catalog is a custom one.
    pub fn load_schedule(&self, catalog: &Catalog) -> Result<Cow<'static, ScheduleTable>> {
        match (&self.schedule.path, &self.catalog.path) {
            (Some(path), _) => Ok(Cow::Owned(ScheduleTable::load_from(path)?.validated(catalog)?)),
            (None, Some(_)) => Ok(Cow::Owned(get_default_schedule().clone().validated(catalog)?)),
            (None, None) => Ok(Cow::Borrowed(get_default_schedule())),
        }
    }
}
