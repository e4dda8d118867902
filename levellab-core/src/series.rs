//! Observation series — the chronological list of coefficients fed to the predictor.
//!
//! Values are always finite. Text input goes through [`parse`], which rejects the
//! whole input on the first bad token rather than returning a partial series.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing comma-separated text into a series.
///
/// `position` is the 1-based index of the comma-separated field in the raw input,
/// counting empty fields, so it points at the offending spot in what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("field {position} is not a number: '{token}'")]
    InvalidToken { position: usize, token: String },

    #[error("field {position} is not a finite number: '{token}'")]
    NonFinite { position: usize, token: String },
}

/// A non-finite value was handed to [`ObservationSeries::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("value at index {index} is not finite ({value})")]
pub struct SeriesError {
    pub index: usize,
    pub value: f64,
}

/// Ordered sequence of finite observations. Index 0 is the oldest value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ObservationSeries {
    values: Vec<f64>,
}

impl ObservationSeries {
    pub fn new(values: Vec<f64>) -> Result<Self, SeriesError> {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError { index, value });
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The trailing `n` values, or the whole series if it is shorter.
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl TryFrom<Vec<f64>> for ObservationSeries {
    type Error = SeriesError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<ObservationSeries> for Vec<f64> {
    fn from(series: ObservationSeries) -> Self {
        series.values
    }
}

impl FromStr for ObservationSeries {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse comma-separated decimal numbers into a series.
///
/// Surrounding whitespace is trimmed, empty fields are dropped ("1,,2" is two values),
/// and `NaN`/`inf` are rejected even though `f64::from_str` accepts them.
pub fn parse(text: &str) -> Result<ObservationSeries, ParseError> {
    let mut values = Vec::new();

    for (i, field) in text.trim().split(',').enumerate() {
        let token = field.trim();
        if token.is_empty() {
            continue;
        }

        let value: f64 = token.parse().map_err(|_| ParseError::InvalidToken {
            position: i + 1,
            token: token.to_string(),
        })?;

        if !value.is_finite() {
            return Err(ParseError::NonFinite {
                position: i + 1,
                token: token.to_string(),
            });
        }

        values.push(value);
    }

    tracing::trace!(count = values.len(), "parsed observation series");
    Ok(ObservationSeries { values })
}
