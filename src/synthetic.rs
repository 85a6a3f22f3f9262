//! Synthetic GPS track generator for benchmarking and testing.
//!
//! Generates a realistic drive with the kinds of defects the filters target:
//! startup drift, GPS noise, ghost jumps, low-accuracy fixes and stops.
//! The indices of injected ghost jumps are returned as ground truth.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use trackclean::synthetic::SyntheticTrackScenario;
//!
//! let track = SyntheticTrackScenario::city_drive().generate();
//! assert_eq!(track.records.len(), 1_000);
//! ```

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::PositionRecord;

// ============================================================================
// Types
// ============================================================================

/// Scenario configuration for generating a synthetic track.
#[derive(Debug, Clone)]
pub struct SyntheticTrackScenario {
    /// Starting latitude
    pub origin_lat: f64,
    /// Starting longitude
    pub origin_lng: f64,
    /// Time of the first fix
    pub start: DateTime<Utc>,
    /// Total number of fixes
    pub point_count: usize,
    /// Seconds between fixes
    pub sample_interval_secs: i64,
    /// Cruising speed (km/h)
    pub cruise_speed_kmh: f64,
    /// GPS noise standard deviation in meters
    pub gps_noise_sigma_meters: f64,
    /// Number of leading fixes wandering around the origin
    pub drift_points: usize,
    /// Probability that any fix is a ghost jump
    pub ghost_jump_rate: f64,
    /// Probability that any fix reports poor accuracy
    pub low_accuracy_rate: f64,
    /// Number of stops (vehicle stationary for a while)
    pub stops: usize,
    /// RNG seed for deterministic reproduction
    pub seed: u64,
}

/// A generated track with ground truth.
#[derive(Debug, Clone)]
pub struct SyntheticTrack {
    pub records: Vec<PositionRecord>,
    /// Indices into `records` of injected ghost jumps
    pub ghost_jump_indices: Vec<usize>,
    /// Indices into `records` of fixes with inflated accuracy
    pub low_accuracy_indices: Vec<usize>,
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

fn meters_to_deg_lng(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lng = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lng.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lng
}

/// Standard normal sample (Box-Muller).
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

// ============================================================================
// Presets
// ============================================================================

impl SyntheticTrackScenario {
    /// 1000 fixes of urban driving at 5 s sampling.
    pub fn city_drive() -> Self {
        Self {
            origin_lat: 47.37,
            origin_lng: 8.55,
            // 2024-05-01T08:00:00Z
            start: DateTime::from_timestamp(1_714_550_400, 0).unwrap_or_default(),
            point_count: 1_000,
            sample_interval_secs: 5,
            cruise_speed_kmh: 40.0,
            gps_noise_sigma_meters: 4.0,
            drift_points: 20,
            ghost_jump_rate: 0.01,
            low_accuracy_rate: 0.03,
            stops: 3,
            seed: 42,
        }
    }

    /// Long tracker log at 1 s sampling, for throughput benchmarks.
    pub fn long_haul(point_count: usize) -> Self {
        Self {
            point_count,
            sample_interval_secs: 1,
            cruise_speed_kmh: 90.0,
            stops: point_count / 2_000,
            ..Self::city_drive()
        }
    }

    /// Generate the track.
    pub fn generate(&self) -> SyntheticTrack {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let step_meters = self.cruise_speed_kmh / 3.6 * self.sample_interval_secs as f64;

        // Stops are evenly spaced through the moving part of the track.
        let stop_length = 30usize;
        let moving_span = self.point_count.saturating_sub(self.drift_points).max(1);
        let stop_starts: Vec<usize> = (1..=self.stops)
            .map(|s| self.drift_points + s * moving_span / (self.stops + 1))
            .collect();

        let mut records = Vec::with_capacity(self.point_count);
        let mut ghost_jump_indices = Vec::new();
        let mut low_accuracy_indices = Vec::new();

        let mut heading: f64 = rng.gen_range(0.0..(2.0 * PI));
        let mut lat = self.origin_lat;
        let mut lng = self.origin_lng;

        for i in 0..self.point_count {
            let timestamp = self.start + Duration::seconds(i as i64 * self.sample_interval_secs);

            let stopped = stop_starts
                .iter()
                .any(|&start| i >= start && i < start + stop_length);
            let in_drift = i < self.drift_points;

            if !in_drift && !stopped {
                heading += rng.gen_range(-0.15..0.15);
                lat += meters_to_deg_lat(step_meters * heading.sin());
                lng += meters_to_deg_lng(step_meters * heading.cos(), lat);
            }

            // Acquisition drift is noisier than normal tracking.
            let sigma = if in_drift {
                self.gps_noise_sigma_meters * 4.0
            } else {
                self.gps_noise_sigma_meters
            };
            let mut fix_lat = lat + meters_to_deg_lat(gaussian(&mut rng) * sigma);
            let mut fix_lng = lng + meters_to_deg_lng(gaussian(&mut rng) * sigma, lat);
            let mut accuracy = (sigma * 1.5 + rng.gen_range(0.0..3.0)).max(1.0);

            if i > 0 && rng.r#gen::<f64>() < self.ghost_jump_rate {
                let jump_meters = rng.gen_range(2_000.0..50_000.0);
                let jump_heading: f64 = rng.gen_range(0.0..(2.0 * PI));
                fix_lat += meters_to_deg_lat(jump_meters * jump_heading.sin());
                fix_lng += meters_to_deg_lng(jump_meters * jump_heading.cos(), lat);
                ghost_jump_indices.push(i);
            } else if rng.r#gen::<f64>() < self.low_accuracy_rate {
                accuracy = rng.gen_range(80.0..500.0);
                low_accuracy_indices.push(i);
            }

            records.push(PositionRecord {
                timestamp,
                latitude: fix_lat,
                longitude: fix_lng,
                accuracy: Some(accuracy),
                speed: Some(if stopped || in_drift {
                    0.0
                } else {
                    self.cruise_speed_kmh / 1.852
                }),
                altitude: Some(400.0 + 20.0 * (i as f64 * 0.01).sin()),
                course: Some(heading.to_degrees().rem_euclid(360.0)),
            });
        }

        SyntheticTrack {
            records,
            ghost_jump_indices,
            low_accuracy_indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_drive_generation() {
        let track = SyntheticTrackScenario::city_drive().generate();
        assert_eq!(track.records.len(), 1_000);
        assert!(track.records.iter().all(|r| r.is_valid()));
        assert!(
            track
                .records
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp)
        );
    }

    #[test]
    fn test_deterministic() {
        let a = SyntheticTrackScenario::city_drive().generate();
        let b = SyntheticTrackScenario::city_drive().generate();
        assert_eq!(a.records, b.records);
        assert_eq!(a.ghost_jump_indices, b.ghost_jump_indices);
    }
}
