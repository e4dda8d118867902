//! Expanding quantile — the p-th quantile of all values seen so far.
//!
//! Linear interpolation between closest ranks: rank = p * (n - 1).
//! For [1..=10] this gives q(0.25) = 3.25 and q(0.75) = 7.75.
//!
//! Lookback: 0 (defined from the first value on).

use super::LevelIndicator;

#[derive(Debug, Clone)]
pub struct Quantile {
    p: f64,
    name: String,
}

impl Quantile {
    /// `p` is a fraction in [0, 1] (0.25 = 25th percentile).
    pub fn new(p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "quantile must be in [0, 1]");
        Self {
            p,
            name: format!("quantile_{}", (p * 100.0).round() as u32),
        }
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

/// Quantile of an already sorted slice. `None` if the slice is empty.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        1 => Some(sorted[0]),
        _ => {
            let rank = p * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = rank - lo as f64;
            Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
        }
    }
}

/// Quantile of an unsorted slice. `None` if the slice is empty.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

impl LevelIndicator for Quantile {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut sorted: Vec<f64> = Vec::with_capacity(values.len());
        values
            .iter()
            .map(|&v| {
                let at = sorted.partition_point(|&x| x.total_cmp(&v).is_le());
                sorted.insert(at, v);
                percentile_sorted(&sorted, self.p)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn percentile_interpolates_linearly() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_approx(percentile(&values, 0.25).unwrap(), 3.25, DEFAULT_EPSILON);
        assert_approx(percentile(&values, 0.75).unwrap(), 7.75, DEFAULT_EPSILON);
        assert_approx(percentile(&values, 0.5).unwrap(), 5.5, DEFAULT_EPSILON);
    }

    #[test]
    fn percentile_ignores_input_order() {
        let values = [9.0, 1.0, 5.0, 3.0, 7.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(9.0));
        assert_eq!(percentile(&values, 0.5), Some(5.0));
    }

    #[test]
    fn percentile_edge_sizes() {
        assert_eq!(percentile(&[], 0.25), None);
        assert_eq!(percentile(&[4.2], 0.75), Some(4.2));
    }

    #[test]
    fn expanding_quantile_matches_prefix_percentile() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let q = Quantile::new(0.25);
        let result = q.compute(&values);

        assert_eq!(result.len(), values.len());
        for (i, got) in result.iter().enumerate() {
            let expected = percentile(&values[..=i], 0.25).unwrap();
            assert_approx(got.unwrap(), expected, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn quantile_name_and_lookback() {
        assert_eq!(Quantile::new(0.25).name(), "quantile_25");
        assert_eq!(Quantile::new(0.75).lookback(), 0);
    }

    #[test]
    #[should_panic(expected = "quantile must be in [0, 1]")]
    fn quantile_out_of_range_panics() {
        Quantile::new(25.0);
    }
}
