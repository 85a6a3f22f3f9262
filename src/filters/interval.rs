//! Time-interval downsampling.

use super::retain_against_last;
use crate::PositionRecord;
use crate::geo_utils::elapsed_seconds;

/// Keep records at least `min_interval_seconds` after the last kept record.
///
/// Consecutive output records are always at least `min_interval_seconds`
/// apart, so running the filter on its own output changes nothing.
pub fn filter_time_interval(records: &[PositionRecord], min_interval_seconds: f64) -> Vec<PositionRecord> {
    retain_against_last(records, |last, candidate| {
        elapsed_seconds(last, candidate) < min_interval_seconds
    })
}
