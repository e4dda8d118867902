//! Predictor configuration — validated parameters plus the TOML file layer.
//!
//! ```toml
//! [predictor]
//! mode = "rolling"     # or "quantile"
//! target = 1.5
//! window = 10
//! sensitivity = 0.01
//! ```
//!
//! Every field is optional; missing fields take the defaults below. Values are
//! validated on load, so a `PredictorConfig` in hand is always usable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::levels::LevelMode;

/// Errors from building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target value must be a finite number > 0, got {0}")]
    InvalidTarget(f64),

    #[error("window size must be >= 1, got {0}")]
    InvalidWindow(usize),

    #[error("sensitivity threshold must be a finite number >= 0, got {0}")]
    InvalidSensitivity(f64),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Validated, immutable predictor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPredictorConfig", into = "RawPredictorConfig")]
pub struct PredictorConfig {
    mode: LevelMode,
    target: f64,
    window: usize,
    sensitivity: f64,
}

impl PredictorConfig {
    pub const DEFAULT_TARGET: f64 = 2.0;
    pub const DEFAULT_WINDOW: usize = 10;
    pub const DEFAULT_SENSITIVITY: f64 = 0.01;

    pub fn new(
        mode: LevelMode,
        target: f64,
        window: usize,
        sensitivity: f64,
    ) -> Result<Self, ConfigError> {
        if !target.is_finite() || target <= 0.0 {
            return Err(ConfigError::InvalidTarget(target));
        }
        if window < 1 {
            return Err(ConfigError::InvalidWindow(window));
        }
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(ConfigError::InvalidSensitivity(sensitivity));
        }
        Ok(Self {
            mode,
            target,
            window,
            sensitivity,
        })
    }

    /// Quantile mode with default window and sensitivity (neither affects the decision).
    pub fn quantile(target: f64) -> Result<Self, ConfigError> {
        Self::new(
            LevelMode::Quantile,
            target,
            Self::DEFAULT_WINDOW,
            Self::DEFAULT_SENSITIVITY,
        )
    }

    pub fn rolling(target: f64, window: usize, sensitivity: f64) -> Result<Self, ConfigError> {
        Self::new(LevelMode::Rolling, target, window, sensitivity)
    }

    pub fn mode(&self) -> LevelMode {
        self.mode
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Observations needed before this configuration yields a decision.
    pub fn required_points(&self) -> usize {
        self.mode.required_points(self.window)
    }

    /// Unvalidated copy, e.g. for applying command-line overrides.
    pub fn to_raw(&self) -> RawPredictorConfig {
        RawPredictorConfig::from(*self)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            mode: LevelMode::Quantile,
            target: Self::DEFAULT_TARGET,
            window: Self::DEFAULT_WINDOW,
            sensitivity: Self::DEFAULT_SENSITIVITY,
        }
    }
}

/// Serialized form of [`PredictorConfig`] before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPredictorConfig {
    #[serde(default)]
    pub mode: LevelMode,
    #[serde(default = "default_target")]
    pub target: f64,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
}

fn default_target() -> f64 {
    PredictorConfig::DEFAULT_TARGET
}

fn default_window() -> usize {
    PredictorConfig::DEFAULT_WINDOW
}

fn default_sensitivity() -> f64 {
    PredictorConfig::DEFAULT_SENSITIVITY
}

impl Default for RawPredictorConfig {
    fn default() -> Self {
        PredictorConfig::default().into()
    }
}

impl TryFrom<RawPredictorConfig> for PredictorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPredictorConfig) -> Result<Self, Self::Error> {
        Self::new(raw.mode, raw.target, raw.window, raw.sensitivity)
    }
}

impl From<PredictorConfig> for RawPredictorConfig {
    fn from(config: PredictorConfig) -> Self {
        Self {
            mode: config.mode,
            target: config.target,
            window: config.window,
            sensitivity: config.sensitivity,
        }
    }
}

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelLabConfig {
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl LevelLabConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
