//! Level indicators — pure functions from an observation history to a level series.
//!
//! Every indicator returns one entry per input position. Positions where the
//! indicator has not seen enough history are `None` rather than NaN, so callers
//! have to branch on definedness instead of letting NaN leak into comparisons.

pub mod quantile;
pub mod rolling;

pub use quantile::{percentile, percentile_sorted, Quantile};
pub use rolling::{Rolling, RollingBand};

/// Trait for level indicators.
///
/// # Look-ahead contamination guard
/// The value at position t may only depend on `values[0..=t]`. Computing on a
/// truncated series must give the same prefix as computing on the full series.
pub trait LevelIndicator: Send + Sync {
    /// Human-readable name (e.g., "rolling_min_10", "quantile_25").
    fn name(&self) -> &str;

    /// Number of leading positions that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for every position of `values`.
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
