//! TOML configuration with environment overrides

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::services::ReportPeriod;
use crate::types::{Result, SalesboardError};

const LOCAL_CONFIG_FILE: &str = "salesboard.toml";
const LOG_FILE_NAME: &str = "salesboard.log";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub period: PeriodConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Where the settings came from
    #[serde(skip)]
    pub source: ConfigSource,
}

/// Origin of a loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file was found
    #[default]
    Defaults,
    File(PathBuf),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Dataset JSON; the bundled sample is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodConfig {
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_month")]
    pub month: u32,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            month: default_month(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Where TUI sessions write logs
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_year() -> i32 {
    2026
}

fn default_month() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "salesboard")
}

impl AppConfig {
    /// Load from the first config file found, then apply env overrides.
    ///
    /// Lookup: `explicit` → `$SALESBOARD_CONFIG` → `./salesboard.toml` →
    /// platform config dir. No file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("SALESBOARD_CONFIG").map(PathBuf::from))
            .or_else(Self::discover);

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|p| p.exists())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents).map_err(|e| {
            SalesboardError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.source = ConfigSource::File(path.to_path_buf());
        Ok(config)
    }

    /// Report where the config came from. Called once tracing is initialized.
    pub fn log_source(&self) {
        match &self.source {
            ConfigSource::File(path) => tracing::info!(path = %path.display(), "loaded config"),
            ConfigSource::Defaults => tracing::warn!("no config file found, using defaults"),
        }
    }

    /// `SALESBOARD_DATA` replaces the dataset path, `SALESBOARD_LOG` the log filter
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SALESBOARD_DATA").filter(|p| !p.is_empty()) {
            self.data.path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("SALESBOARD_LOG").filter(|l| !l.is_empty()) {
            self.log.level = level;
        }
    }

    fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.period.month) {
            return Err(SalesboardError::Config(format!(
                "period.month must be 1-12, got {}",
                self.period.month
            )));
        }
        Ok(())
    }

    pub fn initial_period(&self) -> ReportPeriod {
        ReportPeriod::new(self.period.year, self.period.month).unwrap_or_default()
    }

    /// Configured log file, else `salesboard.log` in the platform data dir
    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
        })
    }
}
