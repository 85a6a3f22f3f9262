//! Drift and small-jitter filters.
//!
//! Both drop a candidate only when it is *both* close to and slow relative
//! to the last accepted fix. A slow-but-far move or a fast-but-close move is
//! real motion and is kept. Drift uses wide distance / low speed thresholds
//! for acquisition noise; jitter uses tight distance / higher speed
//! thresholds for wiggle around stops. Drift runs first.

use super::retain_against_last;
use crate::PositionRecord;
use crate::geo_utils::{haversine_distance, speed_kmh};

/// Drop records within `max_distance_meters` of the last accepted record
/// *and* reached at no more than `max_speed_kmh`.
pub fn filter_movement(
    records: &[PositionRecord],
    max_distance_meters: f64,
    max_speed_kmh: f64,
) -> Vec<PositionRecord> {
    retain_against_last(records, |last, candidate| {
        haversine_distance(last, candidate) <= max_distance_meters
            && speed_kmh(last, candidate) <= max_speed_kmh
    })
}

/// Remove startup drift.
pub fn filter_drift(
    records: &[PositionRecord],
    max_distance_meters: f64,
    max_speed_kmh: f64,
) -> Vec<PositionRecord> {
    filter_movement(records, max_distance_meters, max_speed_kmh)
}

/// Remove small stop/start jitter.
pub fn filter_jitter(
    records: &[PositionRecord],
    max_distance_meters: f64,
    max_speed_kmh: f64,
) -> Vec<PositionRecord> {
    filter_movement(records, max_distance_meters, max_speed_kmh)
}
