use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use forecast_core::{CurrentConditions, ErrorPolicy, PipelineConfig, WeeklyForecast};
use forecast_engine::{FetchSettings, Units, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "forecast.ron";
pub const CONFIG_PATH_ENV: &str = "FORECAST_CONFIG";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Host settings. Every field is optional in the RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub units: Units,
    /// Weekly quiet window; `0` settles every edit immediately.
    pub debounce_ms: u64,
    pub surface_errors: bool,
    pub log_destination: LogDestination,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            debounce_ms: 500,
            surface_errors: false,
            log_destination: LogDestination::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Loads `$FORECAST_CONFIG` or `./forecast.ron`, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::from_optional_file(Path::new(CONFIG_FILENAME))?,
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`AppConfig::from_file`], but a missing file yields the defaults.
    pub fn from_optional_file(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|value| !value.is_empty()) {
            self.api_key = api_key;
        }
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.is_empty()) {
            self.base_url = base_url;
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            units: self.units,
            ..FetchSettings::default()
        }
    }

    pub fn weekly_pipeline(&self) -> PipelineConfig<WeeklyForecast> {
        let window = (self.debounce_ms > 0).then(|| Duration::from_millis(self.debounce_ms));
        PipelineConfig::weekly()
            .with_debounce_window(window)
            .with_error_policy(self.error_policy())
    }

    pub fn current_pipeline(&self) -> PipelineConfig<CurrentConditions> {
        PipelineConfig::current().with_error_policy(self.error_policy())
    }

    fn error_policy(&self) -> ErrorPolicy {
        if self.surface_errors {
            ErrorPolicy::Surface
        } else {
            ErrorPolicy::CollapseToEmpty
        }
    }
}
