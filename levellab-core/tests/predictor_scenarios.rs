//! End-to-end prediction scenarios: text in, typed prediction out.

use levellab_core::{parse, LevelMode, PredictorConfig, Signal, ThresholdPredictor};

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "actual={actual}, expected={expected}"
    );
}

fn quantile_predictor() -> ThresholdPredictor {
    ThresholdPredictor::new(PredictorConfig::quantile(2.0).unwrap())
}

// ── Quantile mode ────────────────────────────────────────────────────

#[test]
fn quantile_one_to_ten() {
    let series = parse("1,2,3,4,5,6,7,8,9,10").unwrap();
    let prediction = quantile_predictor().predict(&series);

    let levels = prediction.levels.expect("levels defined for 10 points");
    assert_approx(levels.support, 3.25);
    assert_approx(levels.resistance, 7.75);
    assert_eq!(prediction.signal, Signal::AboveTarget);
    // last five [6..=10] are not all inside [3.25, 7.75]
    assert_eq!(prediction.alert, None);
}

#[test]
fn quantile_coefficients_without_breakout() {
    let series = parse("1.45,1.48,1.52,1.49,1.51,1.47,1.53,1.46,1.50,1.49").unwrap();
    let prediction = quantile_predictor().predict(&series);

    let levels = prediction.levels.unwrap();
    assert_approx(levels.support, 1.4725);
    assert_approx(levels.resistance, 1.5075);
    assert_eq!(prediction.signal, Signal::AboveTarget);

    // 1.53 in the trailing five sits above resistance
    let confined = series.tail(5).iter().all(|&v| levels.contains(v));
    assert!(!confined);
    assert_eq!(prediction.alert, None);
}

#[test]
fn quantile_coefficients_with_breakout_alert() {
    let series = parse("1.45,1.53,1.52,1.46,1.47,1.51,1.48,1.49,1.50,1.49,1.49").unwrap();
    let prediction = quantile_predictor().predict(&series);

    let levels = prediction.levels.unwrap();
    assert_approx(levels.support, 1.475);
    assert_approx(levels.resistance, 1.505);
    assert!(series.tail(5).iter().all(|&v| levels.contains(v)));
    assert_eq!(prediction.alert, Some(levels.resistance));
    assert_eq!(prediction.signal, Signal::AboveTarget);
}

#[test]
fn quantile_nine_values_asks_for_one_more() {
    let series = parse("1,2,3,4,5,6,7,8,9").unwrap();
    let prediction = quantile_predictor().predict(&series);

    assert_eq!(prediction.signal, Signal::InsufficientData);
    assert_eq!(prediction.levels, None);
    assert_eq!(prediction.alert, None);
    assert_eq!(prediction.shortfall(), 1);
}

// ── Rolling mode ─────────────────────────────────────────────────────

const OSCILLATING: &str = "1.50,1.52,1.48,1.51,1.49,1.53,1.47,1.50,1.52,\
                           1.48,1.51,1.49,1.50,1.52,1.47,1.51,1.49,1.475";

#[test]
fn rolling_eighteen_values_window_ten() {
    let series = parse(OSCILLATING).unwrap();
    assert_eq!(series.len(), 18);

    let config = PredictorConfig::new(LevelMode::Rolling, 1.50, 10, 0.01).unwrap();
    let prediction = ThresholdPredictor::new(config).predict(&series);

    let trailing = series.tail(10);
    let min = trailing.iter().copied().fold(f64::INFINITY, f64::min);
    let max = trailing.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let levels = prediction.levels.unwrap();
    assert_eq!(levels.support, min);
    assert_eq!(levels.resistance, max);
    assert_eq!(levels.support, 1.47);
    assert_eq!(levels.resistance, 1.52);

    // 1.475 <= 1.47 + 0.01
    assert_eq!(prediction.signal, Signal::AboveTarget);
    assert_eq!(prediction.alert, None);
    assert_eq!(prediction.target, 1.50);
}

#[test]
fn rolling_three_way_rule_over_every_position() {
    let series = parse(OSCILLATING).unwrap();
    let config = PredictorConfig::rolling(1.50, 10, 0.01).unwrap();
    let predictor = ThresholdPredictor::new(config);

    for row in predictor.track(&series) {
        if row.index < 9 {
            assert_eq!(row.signal, Signal::InsufficientData, "row {}", row.index);
            assert_eq!(row.support, None);
            continue;
        }
        let support = row.support.unwrap();
        let resistance = row.resistance.unwrap();
        let expected = if row.value <= support + 0.01 {
            Signal::AboveTarget
        } else if row.value >= resistance - 0.01 {
            Signal::BelowTarget
        } else {
            Signal::Uncertain
        };
        assert_eq!(row.signal, expected, "row {}", row.index);
    }
}

#[test]
fn rolling_middle_of_band_is_uncertain() {
    let series = parse("1.40,1.60,1.45,1.55,1.50").unwrap();
    let config = PredictorConfig::rolling(1.50, 5, 0.01).unwrap();
    let prediction = ThresholdPredictor::new(config).predict(&series);
    assert_eq!(prediction.signal, Signal::Uncertain);
}

#[test]
fn rolling_window_longer_than_series() {
    let series = parse("1.40,1.60,1.45").unwrap();
    let config = PredictorConfig::rolling(1.50, 10, 0.01).unwrap();
    let prediction = ThresholdPredictor::new(config).predict(&series);
    assert_eq!(prediction.signal, Signal::InsufficientData);
    assert_eq!(prediction.shortfall(), 7);
}

// ── Errors ───────────────────────────────────────────────────────────

#[test]
fn bad_token_is_rejected_before_prediction() {
    let err = parse("1.5,1.6,x1.7").unwrap_err();
    assert!(err.to_string().contains("x1.7"));
}
