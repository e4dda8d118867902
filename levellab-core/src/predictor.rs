//! Threshold predictor — turns a series plus levels into a directional signal.
//!
//! Quantile mode:
//! - last > support → `AboveTarget`, otherwise `BelowTarget`.
//! - If every one of the trailing [`ALERT_LOOKBACK`] values sits inside
//!   [support, resistance], the prediction carries a breakout alert at resistance.
//!
//! Rolling mode (proximity to the trailing min/max):
//! - last <= support + sensitivity → `AboveTarget` (expected upward reversion).
//! - last >= resistance - sensitivity → `BelowTarget` (expected downward reversion).
//! - otherwise `Uncertain`. Rolling mode never raises an alert.
//!
//! The predictor is stateless: identical inputs always give identical outputs.

use serde::{Deserialize, Serialize};

use crate::config::PredictorConfig;
use crate::levels::{estimate_levels, level_series, LevelEstimate, LevelMode};
use crate::series::ObservationSeries;

/// Trailing values inspected for the quantile-mode breakout alert.
///
/// Fixed regardless of the configured window.
pub const ALERT_LOOKBACK: usize = 5;

/// Categorical outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    AboveTarget,
    BelowTarget,
    Uncertain,
    InsufficientData,
}

impl Signal {
    /// True for `AboveTarget` and `BelowTarget`.
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::AboveTarget | Self::BelowTarget)
    }
}

/// Result of one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub mode: LevelMode,
    pub signal: Signal,
    /// Levels used for the decision; `None` whenever the signal is `InsufficientData`.
    pub levels: Option<LevelEstimate>,
    /// Breakout alert level (the resistance), quantile mode only.
    pub alert: Option<f64>,
    /// The observation the decision was made on.
    pub last: Option<f64>,
    pub target: f64,
    /// Observations needed for a decision in this mode.
    pub required: usize,
    /// Observations actually available.
    pub observed: usize,
}

impl Prediction {
    /// How many more observations the caller must supply before a decision.
    pub fn shortfall(&self) -> usize {
        self.required.saturating_sub(self.observed)
    }
}

/// One row of the per-position level track (chart annotation / export).
///
/// Levels in each row are computed from `series[..=index]` only. In quantile
/// mode that makes them expanding-prefix quartiles: only the last row equals the
/// whole-series levels returned by `predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTrack {
    pub index: usize,
    pub value: f64,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub signal: Signal,
    pub alert: Option<f64>,
}

/// Support/resistance threshold predictor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdPredictor {
    config: PredictorConfig,
}

impl ThresholdPredictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Decision for the most recent observation.
    pub fn predict(&self, series: &ObservationSeries) -> Prediction {
        let prediction = self.evaluate_prefix(series.as_slice());
        tracing::debug!(
            mode = ?prediction.mode,
            signal = ?prediction.signal,
            levels = ?prediction.levels,
            alert = ?prediction.alert,
            observed = prediction.observed,
            "prediction"
        );
        prediction
    }

    /// Decision as it would have been made at `index`, seeing `series[..=index]` only.
    ///
    /// An index past the end yields `InsufficientData` requiring `index + 1` values.
    pub fn evaluate_at(&self, series: &ObservationSeries, index: usize) -> Prediction {
        let values = series.as_slice();
        if index >= values.len() {
            let mut prediction = self.insufficient(values.len(), values.last().copied());
            prediction.required = prediction.required.max(index.saturating_add(1));
            return prediction;
        }
        self.evaluate_prefix(&values[..=index])
    }

    /// Decision at every position of the series.
    ///
    /// Levels come from one pass of the level indicators; row `t` equals
    /// `evaluate_at(series, t)`. For a fixed whole-series quartile band across
    /// every row, use the levels from `predict` instead.
    pub fn track(&self, series: &ObservationSeries) -> Vec<LevelTrack> {
        let values = series.as_slice();
        let levels = level_series(values, self.config.mode(), self.config.window());

        levels
            .into_iter()
            .enumerate()
            .map(|(index, estimate)| {
                let prediction = self.decide(&values[..=index], estimate);
                LevelTrack {
                    index,
                    value: values[index],
                    support: prediction.levels.map(|l| l.support),
                    resistance: prediction.levels.map(|l| l.resistance),
                    signal: prediction.signal,
                    alert: prediction.alert,
                }
            })
            .collect()
    }

    fn evaluate_prefix(&self, values: &[f64]) -> Prediction {
        let levels = if values.len() >= self.config.required_points() {
            estimate_levels(values, self.config.mode(), self.config.window())
        } else {
            None
        };
        self.decide(values, levels)
    }

    /// Apply the decision rule to `values` given the levels at its last position.
    fn decide(&self, values: &[f64], levels: Option<LevelEstimate>) -> Prediction {
        let observed = values.len();
        let last = values.last().copied();

        let Some(actual) = last else {
            return self.insufficient(observed, last);
        };
        if observed < self.config.required_points() {
            tracing::trace!(
                observed,
                required = self.config.required_points(),
                "not enough observations for a decision"
            );
            return self.insufficient(observed, last);
        }
        let Some(levels) = levels else {
            return self.insufficient(observed, last);
        };

        let mode = self.config.mode();
        let (signal, alert) = match mode {
            LevelMode::Quantile => {
                let signal = if actual > levels.support {
                    Signal::AboveTarget
                } else {
                    Signal::BelowTarget
                };
                let recent = &values[observed.saturating_sub(ALERT_LOOKBACK)..];
                let confined = recent.iter().all(|&v| levels.contains(v));
                (signal, confined.then_some(levels.resistance))
            }
            LevelMode::Rolling => {
                let margin = self.config.sensitivity();
                let signal = if actual <= levels.support + margin {
                    Signal::AboveTarget
                } else if actual >= levels.resistance - margin {
                    Signal::BelowTarget
                } else {
                    Signal::Uncertain
                };
                (signal, None)
            }
        };

        tracing::trace!(
            ?mode,
            actual,
            support = levels.support,
            resistance = levels.resistance,
            ?signal,
            ?alert,
            "decision"
        );

        Prediction {
            mode,
            signal,
            levels: Some(levels),
            alert,
            last,
            target: self.config.target(),
            required: self.config.required_points(),
            observed,
        }
    }

    fn insufficient(&self, observed: usize, last: Option<f64>) -> Prediction {
        Prediction {
            mode: self.config.mode(),
            signal: Signal::InsufficientData,
            levels: None,
            alert: None,
            last,
            target: self.config.target(),
            required: self.config.required_points(),
            observed,
        }
    }
}

/// Convenience wrapper: `ThresholdPredictor::new(*config).predict(series)`.
pub fn predict(series: &ObservationSeries, config: &PredictorConfig) -> Prediction {
    ThresholdPredictor::new(*config).predict(series)
}
