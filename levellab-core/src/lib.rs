//! LevelLab Core — support/resistance levels and a threshold predictor.
//!
//! This crate holds all of the decision logic; presentation layers call into it
//! and render what comes back:
//! - Observation series parsing with typed errors (no partial parses)
//! - Level indicators (expanding quantile, rolling min/max) with no NaN warmup values
//! - Level estimation in quantile or rolling mode
//! - Threshold predictor: directional signal, breakout alert, per-position level track
//! - TOML configuration and deterministic request fingerprints
//!
//! Nothing here keeps state between calls.

pub mod config;
pub mod fingerprint;
pub mod indicators;
pub mod levels;
pub mod predictor;
pub mod series;

pub use config::{ConfigError, LevelLabConfig, PredictorConfig, RawPredictorConfig};
pub use fingerprint::RequestHash;
pub use levels::{LevelError, LevelEstimate, LevelMode};
pub use predictor::{predict, LevelTrack, Prediction, Signal, ThresholdPredictor};
pub use series::{parse, ObservationSeries, ParseError, SeriesError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all public types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ObservationSeries>();
        require_sync::<ObservationSeries>();
        require_send::<LevelEstimate>();
        require_sync::<LevelEstimate>();
        require_send::<Prediction>();
        require_sync::<Prediction>();
        require_send::<LevelTrack>();
        require_sync::<LevelTrack>();
        require_send::<ThresholdPredictor>();
        require_sync::<ThresholdPredictor>();
        require_send::<PredictorConfig>();
        require_sync::<PredictorConfig>();
        require_send::<LevelLabConfig>();
        require_sync::<LevelLabConfig>();
        require_send::<RequestHash>();
        require_sync::<RequestHash>();

        // Errors cross thread boundaries inside anyhow::Error.
        require_send::<ParseError>();
        require_sync::<ParseError>();
        require_send::<ConfigError>();
        require_sync::<ConfigError>();
        require_send::<LevelError>();
        require_sync::<LevelError>();
    }

    /// Architecture contract: the predictor takes its inputs by shared reference
    /// and returns owned values, so it cannot carry state from one call to the next.
    #[test]
    fn predictor_is_a_pure_function_of_its_inputs() {
        let series = parse("1,2,3,4,5,6,7,8,9,10").unwrap();
        let predictor = ThresholdPredictor::default();
        let first = predictor.predict(&series);
        let second = predictor.predict(&series);
        assert_eq!(first, second);
        assert_eq!(predict(&series, predictor.config()), first);
    }
}
