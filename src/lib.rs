//! # Track Clean
//!
//! GPS trajectory cleaning for position histories exported from a Traccar
//! tracking server.
//!
//! This library provides:
//! - Geodesic distance and speed between timestamped positions
//! - Seven composable filter stages (accuracy, ghost jumps, drift, jitter,
//!   trajectory outliers, stationary points, time interval)
//! - A pipeline that runs the enabled stages in a fixed order and reports
//!   how many points each stage removed
//! - Named presets ("Ultra Clean", "Clean", "Light", "None")
//! - Decoding of Traccar position JSON and GPX track points
//!
//! ## Features
//!
//! - **`parallel`** - Clean independent tracks in parallel with rayon
//! - **`synthetic`** - Deterministic noisy-track generator
//! - **`cli`** - Build the `trackclean-cli` binary
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trackclean::{PositionRecord, resolve_preset, clean_track};
//!
//! let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
//! let track: Vec<PositionRecord> = (0..20)
//!     .map(|i| {
//!         PositionRecord::new(
//!             start + chrono::Duration::seconds(i * 15),
//!             51.5074 + i as f64 * 0.001,
//!             -0.1278,
//!         )
//!     })
//!     .collect();
//!
//! let config = resolve_preset("Clean").unwrap();
//! let cleaned = clean_track(&track, &config).unwrap();
//! assert!(!cleaned.records.is_empty());
//! println!("{}", cleaned.report);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackCleanError};

// Geographic utilities (distance, speed, interpolation)
pub mod geo_utils;

// Individual filter stages
pub mod filters;
pub use filters::{
    FilterStage, OUTLIER_WINDOW, filter_accuracy, filter_drift, filter_ghost_jumps,
    filter_jitter, filter_movement, filter_stationary, filter_time_interval,
    filter_trajectory_outliers,
};

// Pipeline orchestration and per-stage reporting
pub mod pipeline;
pub use pipeline::{
    AccuracyFilterConfig, CleanedTrack, CleaningPipeline, FilterReport, GhostJumpFilterConfig,
    IntervalFilterConfig, MovementFilterConfig, OutlierFilterConfig, PipelineConfig,
    StageReport, StationaryFilterConfig, clean_track, clean_tracks,
};
#[cfg(feature = "parallel")]
pub use pipeline::clean_tracks_parallel;

// Named presets
pub mod presets;
pub use presets::{FilterPreset, resolve_preset};

// Decoding of server payloads into position records
pub mod ingest;
pub use ingest::{
    TraccarPosition, parse_traccar_positions, positions_from_traccar, retain_valid_positions,
};

// Synthetic track generator for benchmarks and tests
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A single timestamped GPS fix.
///
/// Records flow through every filter stage unchanged; stages only decide
/// which records to keep.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use trackclean::PositionRecord;
///
/// let fix = PositionRecord::new(Utc::now(), 51.5074, -0.1278).with_accuracy(8.0);
/// assert_eq!(fix.accuracy, Some(8.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated error radius in meters. `None` means unknown, not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Speed as reported by the source. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Heading in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<f64>,
}

impl PositionRecord {
    /// Create a record with only time and coordinates.
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            accuracy: None,
            speed: None,
            altitude: None,
            course: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Check if the record has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.accuracy.is_none_or(|a| a.is_finite() && a >= 0.0)
    }
}
