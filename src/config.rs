//! Startup configuration: built-in defaults, an optional TOML file, and the
//! command line, in increasing order of precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "attrition-dashboard.toml";

/// Dataset read when neither the CLI nor the config names one.
pub const DEFAULT_DATA_FILE: &str = "EA.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("default_age_range must satisfy lo <= hi, got [{0}, {1}]")]
    InvertedAgeRange(i64, i64),

    #[error("histogram_bins must be at least 1")]
    ZeroBins,
}

/// Raw deserialisable shape of the TOML file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    data_path: Option<PathBuf>,
    default_age_range: Option<(i64, i64)>,
    histogram_bins: Option<usize>,
    window: WindowSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowSection {
    width: Option<f32>,
    height: Option<f32>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Initial age window, clamped into the data's bounds at load.
    pub default_age_range: (i64, i64),
    /// Upper bound on histogram bins.
    pub histogram_bins: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            default_age_range: (25, 45),
            histogram_bins: 40,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `explicit` if given, else from
    /// [`DEFAULT_CONFIG_FILE`] when it exists, else use the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path: path.clone(), source },
            other => other,
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document, filling gaps with defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        let defaults = Self::default();

        let default_age_range = raw.default_age_range.unwrap_or(defaults.default_age_range);
        if default_age_range.0 > default_age_range.1 {
            return Err(ConfigError::InvertedAgeRange(default_age_range.0, default_age_range.1));
        }
        let histogram_bins = raw.histogram_bins.unwrap_or(defaults.histogram_bins);
        if histogram_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }

        Ok(Self {
            data_path: raw.data_path.unwrap_or(defaults.data_path),
            default_age_range,
            histogram_bins,
            window_size: [
                raw.window.width.unwrap_or(defaults.window_size[0]),
                raw.window.height.unwrap_or(defaults.window_size[1]),
            ],
        })
    }
}
