//! # Cleaning Pipeline
//!
//! Runs the enabled filter stages in a fixed order, each consuming the
//! previous stage's output, and records how many positions each stage
//! removed.
//!
//! Order: accuracy → ghost jump → drift → jitter → trajectory outlier →
//! stationary → time interval. Disabled stages are skipped and do not
//! appear in the report.

use std::fmt;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackCleanError, ensure_positive};
use crate::filters::{
    FilterStage, filter_accuracy, filter_drift, filter_ghost_jumps, filter_jitter,
    filter_stationary, filter_time_interval, filter_trajectory_outliers,
};
use crate::PositionRecord;

// ============================================================================
// Configuration
// ============================================================================

/// Accuracy stage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyFilterConfig {
    pub enabled: bool,
    /// Records with a larger reported error radius are dropped (meters)
    pub max_accuracy_meters: f64,
}

/// Ghost-jump stage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostJumpFilterConfig {
    pub enabled: bool,
    /// Implied speed above which a record is a ghost jump (km/h)
    pub max_speed_kmh: f64,
}

/// Thresholds shared by the drift and jitter stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilterConfig {
    pub enabled: bool,
    /// Moves at or below this distance are candidates for removal (meters)
    pub max_distance_meters: f64,
    /// Moves at or below this speed are candidates for removal (km/h)
    pub max_speed_kmh: f64,
}

/// Trajectory-outlier stage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierFilterConfig {
    pub enabled: bool,
    /// Allowed distance from the interpolated expected position (meters)
    pub max_deviation_meters: f64,
}

/// Stationary-point stage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationaryFilterConfig {
    pub enabled: bool,
    /// Minimum displacement from the last kept record (meters)
    pub min_movement_meters: f64,
}

/// Time-interval stage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalFilterConfig {
    pub enabled: bool,
    /// Minimum spacing between kept records (seconds)
    pub min_interval_seconds: f64,
}

/// Per-stage configuration for one cleaning run.
///
/// `Default` is the "Clean" preset. Thresholds of disabled stages are
/// carried but never validated or used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub accuracy: AccuracyFilterConfig,
    pub ghost_jump: GhostJumpFilterConfig,
    pub drift: MovementFilterConfig,
    pub jitter: MovementFilterConfig,
    pub outlier: OutlierFilterConfig,
    pub stationary: StationaryFilterConfig,
    pub interval: IntervalFilterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::clean()
    }
}

impl PipelineConfig {
    /// Aggressive cleaning for noisy trackers.
    pub fn ultra_clean() -> Self {
        Self {
            accuracy: AccuracyFilterConfig {
                enabled: true,
                max_accuracy_meters: 20.0,
            },
            ghost_jump: GhostJumpFilterConfig {
                enabled: true,
                max_speed_kmh: 120.0,
            },
            drift: MovementFilterConfig {
                enabled: true,
                max_distance_meters: 50.0,
                max_speed_kmh: 10.0,
            },
            jitter: MovementFilterConfig {
                enabled: true,
                max_distance_meters: 15.0,
                max_speed_kmh: 15.0,
            },
            outlier: OutlierFilterConfig {
                enabled: true,
                max_deviation_meters: 30.0,
            },
            stationary: StationaryFilterConfig {
                enabled: true,
                min_movement_meters: 10.0,
            },
            interval: IntervalFilterConfig {
                enabled: true,
                min_interval_seconds: 30.0,
            },
        }
    }

    /// Balanced cleaning, the default.
    pub fn clean() -> Self {
        Self {
            accuracy: AccuracyFilterConfig {
                enabled: true,
                max_accuracy_meters: 30.0,
            },
            ghost_jump: GhostJumpFilterConfig {
                enabled: true,
                max_speed_kmh: 150.0,
            },
            drift: MovementFilterConfig {
                enabled: true,
                max_distance_meters: 50.0,
                max_speed_kmh: 10.0,
            },
            jitter: MovementFilterConfig {
                enabled: true,
                max_distance_meters: 15.0,
                max_speed_kmh: 15.0,
            },
            outlier: OutlierFilterConfig {
                enabled: true,
                max_deviation_meters: 50.0,
            },
            stationary: StationaryFilterConfig {
                enabled: true,
                min_movement_meters: 5.0,
            },
            interval: IntervalFilterConfig {
                enabled: true,
                min_interval_seconds: 10.0,
            },
        }
    }

    /// Only removes clearly broken fixes; drift and jitter are left alone.
    pub fn light() -> Self {
        let mut config = Self::clean();
        config.accuracy.max_accuracy_meters = 50.0;
        config.ghost_jump.max_speed_kmh = 250.0;
        config.drift.enabled = false;
        config.jitter.enabled = false;
        config.outlier.max_deviation_meters = 100.0;
        config.stationary.min_movement_meters = 2.0;
        config.interval.min_interval_seconds = 5.0;
        config
    }

    /// Every stage disabled; the pipeline passes records through untouched.
    pub fn disabled() -> Self {
        let mut config = Self::clean();
        config.accuracy.enabled = false;
        config.ghost_jump.enabled = false;
        config.drift.enabled = false;
        config.jitter.enabled = false;
        config.outlier.enabled = false;
        config.stationary.enabled = false;
        config.interval.enabled = false;
        config
    }

    pub fn is_enabled(&self, stage: FilterStage) -> bool {
        match stage {
            FilterStage::Accuracy => self.accuracy.enabled,
            FilterStage::GhostJump => self.ghost_jump.enabled,
            FilterStage::Drift => self.drift.enabled,
            FilterStage::Jitter => self.jitter.enabled,
            FilterStage::TrajectoryOutlier => self.outlier.enabled,
            FilterStage::Stationary => self.stationary.enabled,
            FilterStage::TimeInterval => self.interval.enabled,
        }
    }

    /// Enabled stages in execution order.
    pub fn enabled_stages(&self) -> Vec<FilterStage> {
        FilterStage::ALL
            .into_iter()
            .filter(|stage| self.is_enabled(*stage))
            .collect()
    }

    /// Check every enabled stage has finite, positive thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.accuracy.enabled {
            ensure_positive("accuracy", "maxAccuracyMeters", self.accuracy.max_accuracy_meters)?;
        }
        if self.ghost_jump.enabled {
            ensure_positive("ghost_jump", "maxSpeedKmh", self.ghost_jump.max_speed_kmh)?;
        }
        if self.drift.enabled {
            ensure_positive("drift", "maxDistanceMeters", self.drift.max_distance_meters)?;
            ensure_positive("drift", "maxSpeedKmh", self.drift.max_speed_kmh)?;
        }
        if self.jitter.enabled {
            ensure_positive("jitter", "maxDistanceMeters", self.jitter.max_distance_meters)?;
            ensure_positive("jitter", "maxSpeedKmh", self.jitter.max_speed_kmh)?;
        }
        if self.outlier.enabled {
            ensure_positive(
                "trajectory_outlier",
                "maxDeviationMeters",
                self.outlier.max_deviation_meters,
            )?;
        }
        if self.stationary.enabled {
            ensure_positive(
                "stationary",
                "minMovementMeters",
                self.stationary.min_movement_meters,
            )?;
        }
        if self.interval.enabled {
            ensure_positive(
                "time_interval",
                "minIntervalSeconds",
                self.interval.min_interval_seconds,
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Report
// ============================================================================

/// Record counts before and after one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: FilterStage,
    pub input_count: usize,
    pub output_count: usize,
}

impl StageReport {
    pub fn removed(&self) -> usize {
        self.input_count - self.output_count
    }
}

/// Per-stage counts for one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    pub stages: Vec<StageReport>,
}

impl FilterReport {
    pub fn total_removed(&self) -> usize {
        self.stages.iter().map(StageReport::removed).sum()
    }

    /// Records entering the first enabled stage, if any ran.
    pub fn input_count(&self) -> Option<usize> {
        self.stages.first().map(|s| s.input_count)
    }

    /// Records leaving the last enabled stage, if any ran.
    pub fn output_count(&self) -> Option<usize> {
        self.stages.last().map(|s| s.output_count)
    }

    pub fn get(&self, stage: FilterStage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return writeln!(f, "No filters applied");
        }
        for s in &self.stages {
            writeln!(
                f,
                "  {:<20} {:>7} -> {:>7}  (-{})",
                s.stage.label(),
                s.input_count,
                s.output_count,
                s.removed()
            )?;
        }
        writeln!(f, "  Total removed: {}", self.total_removed())
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedTrack {
    pub records: Vec<PositionRecord>,
    pub report: FilterReport,
}

// ============================================================================
// Pipeline
// ============================================================================

/// A validated configuration ready to clean tracks.
///
/// # Example
/// ```
/// use trackclean::{CleaningPipeline, PipelineConfig};
///
/// let pipeline = CleaningPipeline::new(PipelineConfig::light()).unwrap();
/// assert_eq!(pipeline.config().drift.enabled, false);
/// ```
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    config: PipelineConfig,
}

impl CleaningPipeline {
    /// Validate `config` and build a pipeline from it.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every enabled stage over `records`.
    ///
    /// Returns [`TrackCleanError::EmptyInput`] when `records` is empty.
    pub fn run(&self, records: &[PositionRecord]) -> Result<CleanedTrack> {
        if records.is_empty() {
            return Err(TrackCleanError::EmptyInput);
        }

        let stages = self.config.enabled_stages();
        info!(
            "[Pipeline] Cleaning {} records with {} stages",
            records.len(),
            stages.len()
        );

        let mut current = records.to_vec();
        let mut report = FilterReport::default();

        for stage in stages {
            let input_count = current.len();
            current = self.run_stage(stage, &current);
            let output_count = current.len();

            info!("[Pipeline] {}: {} -> {}", stage, input_count, output_count);
            report.stages.push(StageReport {
                stage,
                input_count,
                output_count,
            });
        }

        debug!(
            "[Pipeline] Done: {} -> {} records ({} removed)",
            records.len(),
            current.len(),
            report.total_removed()
        );

        Ok(CleanedTrack {
            records: current,
            report,
        })
    }

    /// Run one stage with this pipeline's thresholds, whether or not the
    /// stage is enabled.
    pub fn run_stage(&self, stage: FilterStage, records: &[PositionRecord]) -> Vec<PositionRecord> {
        let c = &self.config;
        match stage {
            FilterStage::Accuracy => filter_accuracy(records, c.accuracy.max_accuracy_meters),
            FilterStage::GhostJump => filter_ghost_jumps(records, c.ghost_jump.max_speed_kmh),
            FilterStage::Drift => {
                filter_drift(records, c.drift.max_distance_meters, c.drift.max_speed_kmh)
            }
            FilterStage::Jitter => {
                filter_jitter(records, c.jitter.max_distance_meters, c.jitter.max_speed_kmh)
            }
            FilterStage::TrajectoryOutlier => {
                filter_trajectory_outliers(records, c.outlier.max_deviation_meters)
            }
            FilterStage::Stationary => {
                filter_stationary(records, c.stationary.min_movement_meters)
            }
            FilterStage::TimeInterval => {
                filter_time_interval(records, c.interval.min_interval_seconds)
            }
        }
    }
}

/// Clean one track with `config`.
pub fn clean_track(records: &[PositionRecord], config: &PipelineConfig) -> Result<CleanedTrack> {
    CleaningPipeline::new(*config)?.run(records)
}

/// Clean several independent tracks with the same configuration.
///
/// Results are returned in input order. An invalid configuration fails the
/// whole batch; an empty track only fails its own entry.
pub fn clean_tracks(
    tracks: &[(String, Vec<PositionRecord>)],
    config: &PipelineConfig,
) -> Result<Vec<(String, Result<CleanedTrack>)>> {
    let pipeline = CleaningPipeline::new(*config)?;
    Ok(tracks
        .iter()
        .map(|(id, records)| (id.clone(), pipeline.run(records)))
        .collect())
}

/// Parallel version of [`clean_tracks`].
#[cfg(feature = "parallel")]
pub fn clean_tracks_parallel(
    tracks: &[(String, Vec<PositionRecord>)],
    config: &PipelineConfig,
) -> Result<Vec<(String, Result<CleanedTrack>)>> {
    let pipeline = CleaningPipeline::new(*config)?;
    Ok(tracks
        .par_iter()
        .map(|(id, records)| (id.clone(), pipeline.run(records)))
        .collect())
}
