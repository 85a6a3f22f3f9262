//! Trajectory-outlier filter.
//!
//! Unlike the other streaming stages, this one does not compare a candidate
//! with the last accepted fix. It predicts where the candidate should be by
//! interpolating in time between its neighbors on either side, and rejects
//! the candidate when it lies too far from that prediction. Sustained
//! movement in any direction is therefore tolerated; lateral spikes are not.

use log::debug;

use crate::PositionRecord;
use crate::geo_utils::{haversine_distance_deg, interpolate_at_time};

/// Neighbors required on each side before a record can be judged.
pub const OUTLIER_WINDOW: usize = 3;

/// Drop records deviating more than `max_deviation_meters` from the path
/// implied by their nearest neighbors.
///
/// A candidate is only judged once [`OUTLIER_WINDOW`] records have been
/// accepted before it and [`OUTLIER_WINDOW`] input records follow it;
/// otherwise it is kept. The expected position is interpolated between the
/// last accepted record and the next input record.
pub fn filter_trajectory_outliers(
    records: &[PositionRecord],
    max_deviation_meters: f64,
) -> Vec<PositionRecord> {
    let mut kept: Vec<PositionRecord> = Vec::with_capacity(records.len());
    let mut rejected = 0usize;

    for (i, candidate) in records.iter().enumerate() {
        let remaining = records.len() - i - 1;
        if kept.len() < OUTLIER_WINDOW || remaining < OUTLIER_WINDOW {
            kept.push(*candidate);
            continue;
        }

        let before = kept[kept.len() - 1];
        let after = &records[i + 1];

        if path_deviation(candidate, &before, after) > max_deviation_meters {
            rejected += 1;
        } else {
            kept.push(*candidate);
        }
    }

    if rejected > 0 {
        debug!(
            "[Outlier] rejected {} of {} records (max deviation {:.1}m)",
            rejected,
            records.len(),
            max_deviation_meters
        );
    }

    kept
}

/// Distance in meters between `candidate` and where it would be moving
/// linearly in time from `before` to `after`.
fn path_deviation(candidate: &PositionRecord, before: &PositionRecord, after: &PositionRecord) -> f64 {
    let (lat, lng) = interpolate_at_time(before, after, candidate);
    haversine_distance_deg(candidate.latitude, candidate.longitude, lat, lng)
}
