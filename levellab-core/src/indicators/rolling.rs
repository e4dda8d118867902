//! Rolling extremes — lowest / highest value over a trailing window.
//!
//! Two series (separate indicator instances):
//! - Min: min(values[t-period+1..=t])
//! - Max: max(values[t-period+1..=t])
//!
//! Lookback: period - 1.

use super::LevelIndicator;

/// Which extreme of the trailing window to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingBand {
    Min,
    Max,
}

#[derive(Debug, Clone)]
pub struct Rolling {
    period: usize,
    band: RollingBand,
    name: String,
}

impl Rolling {
    pub fn min(period: usize) -> Self {
        assert!(period >= 1, "rolling period must be >= 1");
        Self {
            period,
            band: RollingBand::Min,
            name: format!("rolling_min_{period}"),
        }
    }

    pub fn max(period: usize) -> Self {
        assert!(period >= 1, "rolling period must be >= 1");
        Self {
            period,
            band: RollingBand::Max,
            name: format!("rolling_max_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Extreme of a non-empty window. `None` for an empty slice.
pub(crate) fn window_extreme(window: &[f64], band: RollingBand) -> Option<f64> {
    let fold = match band {
        RollingBand::Min => f64::min,
        RollingBand::Max => f64::max,
    };
    window.iter().copied().reduce(fold)
}

impl LevelIndicator for Rolling {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            result[i] = window_extreme(&values[start..=i], self.band);
        }

        result
    }
}
