//! Ghost-jump filter: drop fixes implying an unrealistic speed.

use super::retain_against_last;
use crate::PositionRecord;
use crate::geo_utils::speed_kmh;

/// Drop records reached from the last accepted record faster than
/// `max_speed_kmh`.
///
/// A rejected jump does not move the reference point, so the fix after a
/// single spurious jump is compared against the last good fix and survives.
pub fn filter_ghost_jumps(records: &[PositionRecord], max_speed_kmh: f64) -> Vec<PositionRecord> {
    retain_against_last(records, |last, candidate| {
        speed_kmh(last, candidate) > max_speed_kmh
    })
}
