//! Support / resistance estimation.
//!
//! Two modes:
//! - Quantile: support = q25, resistance = q75 of every value so far.
//! - Rolling: support = min, resistance = max of the trailing `window` values.
//!
//! A level is either fully defined or absent. Rolling positions with fewer than
//! `window` values behind them are `None`; nothing here produces NaN.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::rolling::{window_extreme, RollingBand};
use crate::indicators::{percentile, LevelIndicator, Quantile, Rolling};

/// Quantile used for support in quantile mode.
pub const SUPPORT_QUANTILE: f64 = 0.25;

/// Quantile used for resistance in quantile mode.
pub const RESISTANCE_QUANTILE: f64 = 0.75;

/// Minimum series length before quantile mode makes a decision.
pub const MIN_QUANTILE_POINTS: usize = 10;

/// How support and resistance are derived from the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelMode {
    /// Whole-series quartiles.
    #[default]
    Quantile,
    /// Trailing-window min/max.
    Rolling,
}

impl LevelMode {
    /// Number of observations needed before levels (and a decision) exist.
    pub fn required_points(self, window: usize) -> usize {
        match self {
            Self::Quantile => MIN_QUANTILE_POINTS,
            Self::Rolling => window,
        }
    }
}

/// A defined pair of reference levels. `support <= resistance` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelEstimate {
    pub support: f64,
    pub resistance: f64,
}

impl LevelEstimate {
    /// Inclusive band test.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.support && value <= self.resistance
    }

    pub fn width(&self) -> f64 {
        self.resistance - self.support
    }
}

/// Why levels are not available at a requested position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("insufficient data: {available} values, {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("levels undefined at position {position}: fewer than {window} values in the rolling window")]
    UndefinedLevel { position: usize, window: usize },
}

/// Quartile levels over the whole slice. `None` for an empty slice.
pub fn quantile_levels(values: &[f64]) -> Option<LevelEstimate> {
    Some(LevelEstimate {
        support: percentile(values, SUPPORT_QUANTILE)?,
        resistance: percentile(values, RESISTANCE_QUANTILE)?,
    })
}

/// Min/max of the trailing `window` values. `None` if fewer than `window` values exist.
pub fn rolling_levels(values: &[f64], window: usize) -> Option<LevelEstimate> {
    if window == 0 || values.len() < window {
        return None;
    }
    let trailing = &values[values.len() - window..];
    Some(LevelEstimate {
        support: window_extreme(trailing, RollingBand::Min)?,
        resistance: window_extreme(trailing, RollingBand::Max)?,
    })
}

/// Live level estimate: the levels at the last position of `values`.
pub fn estimate_levels(values: &[f64], mode: LevelMode, window: usize) -> Option<LevelEstimate> {
    let levels = match mode {
        LevelMode::Quantile => quantile_levels(values),
        LevelMode::Rolling => rolling_levels(values, window),
    };
    tracing::trace!(?mode, window, n = values.len(), ?levels, "estimated levels");
    levels
}

/// Per-position levels, each computed from `values[..=t]` only.
///
/// Quantile mode uses expanding quartiles; rolling mode uses trailing min/max.
pub fn level_series(values: &[f64], mode: LevelMode, window: usize) -> Vec<Option<LevelEstimate>> {
    let (support, resistance): (Box<dyn LevelIndicator>, Box<dyn LevelIndicator>) = match mode {
        LevelMode::Quantile => (
            Box::new(Quantile::new(SUPPORT_QUANTILE)) as Box<dyn LevelIndicator>,
            Box::new(Quantile::new(RESISTANCE_QUANTILE)) as Box<dyn LevelIndicator>,
        ),
        LevelMode::Rolling if window == 0 => return vec![None; values.len()],
        LevelMode::Rolling => (
            Box::new(Rolling::min(window)) as Box<dyn LevelIndicator>,
            Box::new(Rolling::max(window)) as Box<dyn LevelIndicator>,
        ),
    };

    support
        .compute(values)
        .into_iter()
        .zip(resistance.compute(values))
        .map(|(s, r)| {
            Some(LevelEstimate {
                support: s?,
                resistance: r?,
            })
        })
        .collect()
}

/// Strict accessor: levels at `index`, or the reason they do not exist.
///
/// Quantile mode needs [`MIN_QUANTILE_POINTS`] values up to `index`; rolling mode
/// needs a full window, reported as [`LevelError::UndefinedLevel`].
pub fn levels_at(
    values: &[f64],
    mode: LevelMode,
    window: usize,
    index: usize,
) -> Result<LevelEstimate, LevelError> {
    if index >= values.len() {
        return Err(LevelError::InsufficientData {
            required: index.saturating_add(1),
            available: values.len(),
        });
    }

    let prefix = &values[..=index];
    let required = mode.required_points(window);
    match mode {
        LevelMode::Quantile if prefix.len() < required => Err(LevelError::InsufficientData {
            required,
            available: prefix.len(),
        }),
        LevelMode::Rolling if prefix.len() < required || window == 0 => {
            Err(LevelError::UndefinedLevel {
                position: index,
                window,
            })
        }
        _ => estimate_levels(prefix, mode, window).ok_or(LevelError::InsufficientData {
            required,
            available: prefix.len(),
        }),
    }
}
