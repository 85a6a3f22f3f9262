//! Stationary-point filter: drop fixes that barely moved.

use super::retain_against_last;
use crate::PositionRecord;
use crate::geo_utils::haversine_distance;

/// Drop records less than `min_movement_meters` from the last accepted
/// record, regardless of speed.
pub fn filter_stationary(records: &[PositionRecord], min_movement_meters: f64) -> Vec<PositionRecord> {
    retain_against_last(records, |last, candidate| {
        haversine_distance(last, candidate) < min_movement_meters
    })
}
