//! LevelLab CLI — predict and track commands.
//!
//! Commands:
//! - `predict` — signal, levels and breakout alert for the latest observation
//! - `track` — per-position levels and signals, printed or exported as CSV
//!
//! Observations come from `--values`, `--file`, or stdin as comma-separated numbers.
//! Parameters come from `--config` (TOML) with individual flags taking precedence.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use levellab_core::{
    parse, LevelLabConfig, LevelMode, LevelTrack, ObservationSeries, Prediction, PredictorConfig,
    RequestHash, Signal, ThresholdPredictor,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Accepted target range for interactive use.
const TARGET_RANGE: (f64, f64) = (0.0, 100.0);
/// Accepted window range for interactive use.
const WINDOW_RANGE: (usize, usize) = (2, 50);
/// Accepted sensitivity range for interactive use.
const SENSITIVITY_RANGE: (f64, f64) = (0.0, 1.0);

#[derive(Parser)]
#[command(
    name = "levellab",
    about = "LevelLab CLI — support/resistance threshold predictor"
)]
struct Cli {
    /// Log at debug level. RUST_LOG, when set, takes precedence.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict whether the next value lands above or below the target.
    Predict {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: PredictorArgs,

        /// Print the prediction as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show levels and signals at every position of the series.
    Track {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: PredictorArgs,

        /// Write the track to a CSV file instead of printing a table.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Comma-separated observations, e.g. "1.45,1.48,1.52".
    #[arg(long, conflicts_with = "file")]
    values: Option<String>,

    /// Read comma-separated observations from a file.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct PredictorArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Target value (0 < target <= 100).
    #[arg(long)]
    target: Option<f64>,

    /// Rolling window size (2..=50).
    #[arg(long)]
    window: Option<usize>,

    /// Sensitivity threshold around support/resistance (0..=1).
    #[arg(long)]
    sensitivity: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Quartiles of the whole series.
    Quantile,
    /// Min/max of the trailing window.
    Rolling,
}

impl From<ModeArg> for LevelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Quantile => LevelMode::Quantile,
            ModeArg::Rolling => LevelMode::Rolling,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Predict {
            input,
            params,
            json,
        } => run_predict(&input, &params, json),
        Commands::Track {
            input,
            params,
            csv,
        } => run_track(&input, &params, csv.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// RUST_LOG directives if present and valid, otherwise info (debug with `--verbose`).
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}

fn run_predict(input: &InputArgs, params: &PredictorArgs, json: bool) -> Result<()> {
    let series = read_series(input)?;
    let config = build_config(params)?;
    let prediction = ThresholdPredictor::new(config).predict(&series);

    if json {
        let request = RequestHash::of(&config, &series);
        let output = serde_json::json!({
            "request": request,
            "prediction": prediction,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&prediction);
    }

    Ok(())
}

fn run_track(input: &InputArgs, params: &PredictorArgs, csv_path: Option<&Path>) -> Result<()> {
    let series = read_series(input)?;
    let config = build_config(params)?;
    let track = ThresholdPredictor::new(config).track(&series);

    match csv_path {
        Some(path) => {
            write_track_csv(&track, path)?;
            info!(rows = track.len(), path = %path.display(), "level track exported");
        }
        None => print_track(&track),
    }

    Ok(())
}

fn read_series(input: &InputArgs) -> Result<ObservationSeries> {
    let text = match (&input.values, &input.file) {
        (Some(values), _) => values.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read observations from stdin")?;
            buf
        }
    };

    // Files and pasted input often put one value per line.
    let text = text.replace(|c: char| c == '\n' || c == '\r', ",");
    let series = parse(&text)?;
    debug!(count = series.len(), "observations loaded");
    Ok(series)
}

/// Config file (or defaults) with command-line overrides applied, then validated.
fn build_config(params: &PredictorArgs) -> Result<PredictorConfig> {
    let base = match &params.config {
        Some(path) => LevelLabConfig::from_file(path)?.predictor,
        None => PredictorConfig::default(),
    };

    let mut raw = base.to_raw();
    if let Some(mode) = params.mode {
        raw.mode = mode.into();
    }
    if let Some(target) = params.target {
        raw.target = target;
    }
    if let Some(window) = params.window {
        raw.window = window;
    }
    if let Some(sensitivity) = params.sensitivity {
        raw.sensitivity = sensitivity;
    }

    let config = PredictorConfig::try_from(raw)?;
    check_ranges(&config)?;
    debug!(?config, "predictor config");
    Ok(config)
}

fn check_ranges(config: &PredictorConfig) -> Result<()> {
    let (min_target, max_target) = TARGET_RANGE;
    if config.target() <= min_target || config.target() > max_target {
        bail!(
            "target {} is outside ({min_target}, {max_target}]",
            config.target()
        );
    }

    // Quantile mode ignores the window, so only hold rolling mode to the range.
    let (min_window, max_window) = WINDOW_RANGE;
    if config.mode() == LevelMode::Rolling
        && !(min_window..=max_window).contains(&config.window())
    {
        bail!(
            "window {} is outside {min_window}..={max_window}",
            config.window()
        );
    }

    let (min_sens, max_sens) = SENSITIVITY_RANGE;
    if !(min_sens..=max_sens).contains(&config.sensitivity()) {
        bail!(
            "sensitivity {} is outside {min_sens}..={max_sens}",
            config.sensitivity()
        );
    }

    Ok(())
}

fn write_track_csv(track: &[LevelTrack], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in track {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn signal_label(signal: Signal) -> &'static str {
    match signal {
        Signal::AboveTarget => "ABOVE target",
        Signal::BelowTarget => "BELOW target",
        Signal::Uncertain => "UNCERTAIN",
        Signal::InsufficientData => "INSUFFICIENT DATA",
    }
}

fn format_level(level: Option<f64>) -> String {
    level.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

fn print_summary(prediction: &Prediction) {
    let mode = match prediction.mode {
        LevelMode::Quantile => "quantile (q25 / q75)",
        LevelMode::Rolling => "rolling (min / max)",
    };

    println!();
    println!("=== Prediction ===");
    println!("Mode:           {mode}");
    println!("Target:         {:.2}", prediction.target);
    println!(
        "Observations:   {} ({} required)",
        prediction.observed, prediction.required
    );

    if prediction.signal == Signal::InsufficientData {
        println!();
        println!(
            "Not enough data: add at least {} more value(s).",
            prediction.shortfall()
        );
        println!();
        return;
    }

    println!("Last value:     {}", format_level(prediction.last));
    println!(
        "Support:        {}",
        format_level(prediction.levels.map(|l| l.support))
    );
    println!(
        "Resistance:     {}",
        format_level(prediction.levels.map(|l| l.resistance))
    );
    println!();
    println!("Signal:         {}", signal_label(prediction.signal));
    match prediction.signal {
        Signal::AboveTarget => println!(
            "Next value expected at or above {:.2}.",
            prediction.target
        ),
        Signal::BelowTarget => println!("Next value expected below {:.2}.", prediction.target),
        _ => println!("No clear direction: last value sits mid-band."),
    }
    if let Some(alert) = prediction.alert {
        println!();
        println!("ALERT: recent values are confined to the band; elevated chance of a run above {alert:.4}");
    }
    println!();
}

fn print_track(track: &[LevelTrack]) {
    println!(
        "{:>5} {:>10} {:>10} {:>10}  {:<18} {:>8}",
        "Index", "Value", "Support", "Resist", "Signal", "Alert"
    );
    println!("{}", "-".repeat(66));
    for row in track {
        println!(
            "{:>5} {:>10.4} {:>10} {:>10}  {:<18} {:>8}",
            row.index,
            row.value,
            format_level(row.support),
            format_level(row.resistance),
            signal_label(row.signal),
            row.alert.map_or_else(String::new, |a| format!("{a:.4}")),
        );
    }
}
