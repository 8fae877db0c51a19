//! Planner configuration.
//!
//! Athlete defaults and template parameters, stored as TOML in the
//! platform config directory. Only the command-line planner reads this; the
//! library functions take every input as an argument.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metrics::planned::AthleteProfile;
use crate::workouts::templates::{IntervalParams, LongSteadyParams, TempoParams};

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Configuration version
    pub version: String,
    /// Athlete used for planned metrics
    pub athlete: AthleteProfile,
    /// Template parameters
    pub templates: TemplateSettings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            athlete: AthleteProfile::default(),
            templates: TemplateSettings::default(),
        }
    }
}

/// Default parameters for each template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub interval: IntervalParams,
    pub tempo: TempoParams,
    pub long_steady: LongSteadyParams,
}

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "WORKOUT_PLAN_CONFIG";

/// Platform config directory for the planner, if the platform has one.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "structured-workouts", "StructuredWorkouts")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Config file location: `$WORKOUT_PLAN_CONFIG`, else `config.toml` in the
/// platform config directory, else in the working directory.
pub fn default_config_path() -> PathBuf {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

fn resolve_config_path(env_override: Option<PathBuf>) -> PathBuf {
    env_override
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| {
            config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("config.toml")
        })
}

/// Load configuration from [`default_config_path`].
pub fn load_config() -> Result<PlannerConfig, ConfigError> {
    load_config_from(&default_config_path())
}

/// Load configuration from `path`, falling back to defaults when absent.
///
/// Athlete values are validated while parsing, so a bad weight surfaces as
/// [`ConfigError::Parse`].
pub fn load_config_from(path: &Path) -> Result<PlannerConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(PlannerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded planner config");
    Ok(config)
}

/// Save configuration to [`default_config_path`].
pub fn save_config(config: &PlannerConfig) -> Result<PathBuf, ConfigError> {
    let path = default_config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`, creating parent directories.
pub fn save_config_to(config: &PlannerConfig, path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, content).map_err(io_error)?;

    tracing::info!(path = %path.display(), "Planner config saved");
    Ok(())
}

/// Config file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
