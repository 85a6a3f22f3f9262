//! trackclean CLI - Clean exported GPS position histories
//!
//! Usage:
//!   trackclean-cli clean <input> [--preset <name>] [--output <file>]
//!   trackclean-cli clean <input> --preset custom --max-accuracy 25 --min-interval 5
//!   trackclean-cli clean <input> --config filters.json
//!   trackclean-cli presets
//!
//! Input is either a Traccar `/api/positions` JSON array or a GPX file.
//! The cleaned positions are written as JSON, and a per-stage summary of
//! removed points is printed.

use clap::{Parser, Subcommand};
use gpx::{Gpx, read};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trackclean::{
    CleaningPipeline, FilterPreset, FilterStage, PipelineConfig, PositionRecord, TrackCleanError,
    geo_utils::track_distance, parse_traccar_positions, retain_valid_positions,
};

#[derive(Parser)]
#[command(name = "trackclean-cli")]
#[command(about = "Clean GPS position histories before export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleaning pipeline over a positions file
    Clean {
        /// Traccar positions JSON or GPX file
        input: PathBuf,

        /// Output file for cleaned positions (JSON). Defaults to <input>.clean.json
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preset: "ultra clean", "clean", "light", "custom" or "none"
        #[arg(short, long, default_value = "clean")]
        preset: String,

        /// Load the full pipeline configuration from a JSON file (implies custom)
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        #[command(flatten)]
        thresholds: CustomThresholds,
    },

    /// Print the thresholds of every preset
    Presets,
}

/// Per-stage thresholds for the custom preset. Each flag given enables
/// its stage; stages without a flag stay disabled.
#[derive(clap::Args, Default)]
struct CustomThresholds {
    /// Maximum accuracy radius (meters)
    #[arg(long)]
    max_accuracy: Option<f64>,

    /// Maximum plausible speed for ghost-jump detection (km/h)
    #[arg(long)]
    max_speed: Option<f64>,

    /// Drift thresholds: distance (m) and speed (km/h)
    #[arg(long, num_args = 2, value_names = ["METERS", "KMH"])]
    drift: Option<Vec<f64>>,

    /// Jitter thresholds: distance (m) and speed (km/h)
    #[arg(long, num_args = 2, value_names = ["METERS", "KMH"])]
    jitter: Option<Vec<f64>>,

    /// Maximum deviation from the interpolated path (meters)
    #[arg(long)]
    max_deviation: Option<f64>,

    /// Minimum movement between kept points (meters)
    #[arg(long)]
    min_movement: Option<f64>,

    /// Minimum time between kept points (seconds)
    #[arg(long)]
    min_interval: Option<f64>,
}

impl CustomThresholds {
    fn is_empty(&self) -> bool {
        self.max_accuracy.is_none()
            && self.max_speed.is_none()
            && self.drift.is_none()
            && self.jitter.is_none()
            && self.max_deviation.is_none()
            && self.min_movement.is_none()
            && self.min_interval.is_none()
    }

    /// Build a config with only the stages given on the command line.
    fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::disabled();
        if let Some(v) = self.max_accuracy {
            config.accuracy.enabled = true;
            config.accuracy.max_accuracy_meters = v;
        }
        if let Some(v) = self.max_speed {
            config.ghost_jump.enabled = true;
            config.ghost_jump.max_speed_kmh = v;
        }
        if let Some([meters, kmh]) = self.drift.as_deref() {
            config.drift.enabled = true;
            config.drift.max_distance_meters = *meters;
            config.drift.max_speed_kmh = *kmh;
        }
        if let Some([meters, kmh]) = self.jitter.as_deref() {
            config.jitter.enabled = true;
            config.jitter.max_distance_meters = *meters;
            config.jitter.max_speed_kmh = *kmh;
        }
        if let Some(v) = self.max_deviation {
            config.outlier.enabled = true;
            config.outlier.max_deviation_meters = v;
        }
        if let Some(v) = self.min_movement {
            config.stationary.enabled = true;
            config.stationary.min_movement_meters = v;
        }
        if let Some(v) = self.min_interval {
            config.interval.enabled = true;
            config.interval.min_interval_seconds = v;
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            preset,
            config,
            thresholds,
        } => run_clean(&input, output.as_ref(), &preset, config.as_ref(), &thresholds),
        Commands::Presets => {
            print_presets();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[ERR] {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Work out the pipeline configuration from the command-line options.
fn resolve_config(
    preset: &str,
    config_file: Option<&PathBuf>,
    thresholds: &CustomThresholds,
) -> Result<PipelineConfig, String> {
    if let Some(path) = config_file {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|e| TrackCleanError::from(e).to_string())?;
        return FilterPreset::Custom
            .resolve(Some(config))
            .map_err(|e| e.to_string());
    }

    let preset: FilterPreset = preset.parse().map_err(|e: TrackCleanError| e.to_string())?;
    let custom = match preset {
        FilterPreset::Custom if !thresholds.is_empty() => Some(thresholds.to_config()),
        FilterPreset::Custom => None,
        _ if !thresholds.is_empty() => {
            return Err(format!(
                "Threshold flags require --preset custom (got {})",
                preset
            ));
        }
        _ => None,
    };
    preset.resolve(custom).map_err(|e| e.to_string())
}

/// Load positions from a Traccar JSON export or a GPX file.
fn load_positions(path: &Path) -> Result<Vec<PositionRecord>, String> {
    let is_gpx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));

    if is_gpx {
        parse_gpx_file(path)
    } else {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        parse_traccar_positions(&content).map_err(|e| e.to_string())
    }
}

/// Parse the track points of a GPX file. Points without a time are skipped.
fn parse_gpx_file(path: &Path) -> Result<Vec<PositionRecord>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let gpx: Gpx = read(reader).map_err(|e| e.to_string())?;

    let mut records = Vec::new();
    let mut untimed = 0usize;
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                let Some(time) = &pt.time else {
                    untimed += 1;
                    continue;
                };
                let stamp = time.format().map_err(|e| e.to_string())?;
                let timestamp = chrono::DateTime::parse_from_rfc3339(&stamp)
                    .map_err(|e| format!("Bad GPX time {}: {}", stamp, e))?
                    .with_timezone(&chrono::Utc);

                records.push(PositionRecord {
                    timestamp,
                    latitude: pt.point().y(),
                    longitude: pt.point().x(),
                    accuracy: None,
                    speed: pt.speed,
                    altitude: pt.elevation,
                    course: None,
                });
            }
        }
    }

    if untimed > 0 {
        log::warn!("[GPX] Skipped {} points without a timestamp", untimed);
    }
    let records = retain_valid_positions(records, "GPX");
    if records.is_empty() {
        return Err("No usable track points found".to_string());
    }
    Ok(records)
}

/// Run the pipeline over one file and write the result.
fn run_clean(
    input: &Path,
    output: Option<&PathBuf>,
    preset: &str,
    config_file: Option<&PathBuf>,
    thresholds: &CustomThresholds,
) -> Result<(), String> {
    println!("\n{}", "=".repeat(60));
    println!("TRACK CLEANING: {}", input.display());
    println!("{}", "=".repeat(60));

    let config = resolve_config(preset, config_file, thresholds)?;
    let pipeline = CleaningPipeline::new(config).map_err(|e| e.to_string())?;

    let records = load_positions(input)?;
    println!(
        "  Loaded {} positions, {:.2}km",
        records.len(),
        track_distance(&records) / 1000.0
    );

    let cleaned = match pipeline.run(&records) {
        Ok(cleaned) => cleaned,
        Err(TrackCleanError::EmptyInput) => {
            println!("\nNo position data to clean.");
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    println!("\n{}", "-".repeat(60));
    println!("FILTER SUMMARY");
    println!("{}", "-".repeat(60));
    print!("{}", cleaned.report);

    let output_path = output
        .cloned()
        .unwrap_or_else(|| input.with_extension("clean.json"));
    let file = File::create(&output_path)
        .map_err(|e| format!("Failed to create {}: {}", output_path.display(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &cleaned.records).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())?;

    println!("\n{}", "=".repeat(60));
    println!("[OK] File saved: {}", output_path.display());
    println!(
        "     Records exported: {} of {} ({:.2}km)",
        cleaned.records.len(),
        records.len(),
        track_distance(&cleaned.records) / 1000.0
    );
    println!("{}", "=".repeat(60));
    Ok(())
}

fn print_presets() {
    for preset in FilterPreset::ALL {
        println!("\n{}", preset);
        let Ok(config) = preset.resolve(None) else {
            println!("  (thresholds supplied with --max-accuracy, --max-speed, ...)");
            continue;
        };
        let stages = config.enabled_stages();
        if stages.is_empty() {
            println!("  (no filtering)");
            continue;
        }
        let c = &config;
        for stage in stages {
            let detail = match stage {
                FilterStage::Accuracy => {
                    format!("<= {}m", c.accuracy.max_accuracy_meters)
                }
                FilterStage::GhostJump => {
                    format!("<= {}km/h", c.ghost_jump.max_speed_kmh)
                }
                FilterStage::Drift => format!(
                    "{}m / {}km/h",
                    c.drift.max_distance_meters, c.drift.max_speed_kmh
                ),
                FilterStage::Jitter => format!(
                    "{}m / {}km/h",
                    c.jitter.max_distance_meters, c.jitter.max_speed_kmh
                ),
                FilterStage::TrajectoryOutlier => {
                    format!("<= {}m", c.outlier.max_deviation_meters)
                }
                FilterStage::Stationary => {
                    format!(">= {}m", c.stationary.min_movement_meters)
                }
                FilterStage::TimeInterval => {
                    format!(">= {}s", c.interval.min_interval_seconds)
                }
            };
            println!("  {:<20} {}", stage.label(), detail);
        }
    }
}
