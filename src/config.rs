use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ai;
use crate::cycle;
use crate::storage::FileStore;

pub const DEFAULT_CONFIG_FILE: &str = "femhealth.toml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DATA_DIR_ENV: &str = "FEMHEALTH_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("data directory not found")]
    NoDataDir,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiSettings,
    pub storage: StorageSettings,
    pub cycle: CycleSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: ai::DEFAULT_ENDPOINT.to_string(),
            model: ai::DEFAULT_MODEL.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSettings {
    pub default_length: u32,
    pub window_days: u32,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            default_length: cycle::DEFAULT_CYCLE_LENGTH,
            window_days: cycle::DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Explicit file if given, else `femhealth.toml` in the working directory
    /// when present, else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = Some(key);
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let length = self.cycle.default_length;
        if !(cycle::MIN_CYCLE_LENGTH..=cycle::MAX_CYCLE_LENGTH).contains(&length) {
            return Err(ConfigError::Invalid(format!(
                "cycle.default_length must be between {} and {}, got {}",
                cycle::MIN_CYCLE_LENGTH,
                cycle::MAX_CYCLE_LENGTH,
                length
            )));
        }
        if !(1..=cycle::MAX_WINDOW_DAYS).contains(&self.cycle.window_days) {
            return Err(ConfigError::Invalid(format!(
                "cycle.window_days must be between 1 and {}, got {}",
                cycle::MAX_WINDOW_DAYS,
                self.cycle.window_days
            )));
        }
        if self.ai.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("ai.timeout_seconds must be positive".into()));
        }
        if self.ai.model.trim().is_empty() {
            return Err(ConfigError::Invalid("ai.model must not be empty".into()));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_dir().map_err(|_| ConfigError::NoDataDir),
        }
    }
}
