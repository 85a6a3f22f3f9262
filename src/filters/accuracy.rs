//! Accuracy filter: drop fixes whose reported error radius is too large.

use log::debug;

use crate::PositionRecord;

/// Keep records whose accuracy is unknown or at most `max_accuracy_meters`.
///
/// If every record is rejected, the single most accurate one is kept
/// (earliest wins on ties) so a non-empty track never comes back empty.
pub fn filter_accuracy(records: &[PositionRecord], max_accuracy_meters: f64) -> Vec<PositionRecord> {
    let kept: Vec<PositionRecord> = records
        .iter()
        .filter(|r| r.accuracy.is_none_or(|a| a <= max_accuracy_meters))
        .copied()
        .collect();

    if !kept.is_empty() || records.is_empty() {
        return kept;
    }

    // Everything rejected means every record carries an accuracy value.
    let best = records
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| {
            let acc_a = a.accuracy.unwrap_or(f64::INFINITY);
            let acc_b = b.accuracy.unwrap_or(f64::INFINITY);
            acc_a
                .total_cmp(&acc_b)
                .then(a.timestamp.cmp(&b.timestamp))
                .then(ia.cmp(ib))
        })
        .map(|(_, r)| *r);

    debug!(
        "[Accuracy] all {} records exceed {:.1}m, retaining most accurate ({:?}m)",
        records.len(),
        max_accuracy_meters,
        best.and_then(|r| r.accuracy)
    );

    best.into_iter().collect()
}
