//! Request fingerprinting — deterministic identification of prediction requests.
//!
//! Two requests with the same configuration and the same observations get the
//! same `RequestHash`, so a presentation layer can tell a repeated request from
//! a new one without keeping any history of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PredictorConfig;
use crate::series::ObservationSeries;

/// BLAKE3 hash (hex) of a canonical `(config, values)` serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestHash(pub String);

#[derive(Serialize)]
struct CanonicalRequest<'a> {
    config: &'a PredictorConfig,
    values: &'a [f64],
}

impl RequestHash {
    pub fn of(config: &PredictorConfig, series: &ObservationSeries) -> Self {
        let canonical = CanonicalRequest {
            config,
            values: series.as_slice(),
        };
        // Struct field order is fixed, and finite f64 always serializes.
        let json = serde_json::to_vec(&canonical).expect("prediction request must serialize");
        Self(blake3::hash(&json).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
