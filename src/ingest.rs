//! Decoding Traccar position payloads into [`PositionRecord`]s.
//!
//! This is the single place coordinates are validated. Records with
//! out-of-range or non-finite coordinates are dropped here so the filter
//! stages can assume well-formed input.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::PositionRecord;
use crate::error::Result;

/// One entry of the Traccar `/api/positions` response.
///
/// Only the fields the cleaner or the export layer care about are kept;
/// anything else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraccarPosition {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub device_id: Option<i64>,
    /// Time of the GPS fix. Also accepts `timestamp`, so exported
    /// [`PositionRecord`] JSON can be read back.
    #[serde(alias = "timestamp")]
    pub fix_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Speed in knots, as Traccar reports it
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub course: Option<f64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Device-reported fix validity
    #[serde(default)]
    pub valid: Option<bool>,
}

impl From<&TraccarPosition> for PositionRecord {
    fn from(p: &TraccarPosition) -> Self {
        PositionRecord {
            timestamp: p.fix_time,
            latitude: p.latitude,
            longitude: p.longitude,
            accuracy: p.accuracy,
            speed: p.speed,
            altitude: p.altitude,
            course: p.course,
        }
    }
}

/// Drop records with out-of-range or non-finite coordinates, keeping order.
///
/// `source` labels the warning logged when anything is dropped.
pub fn retain_valid_positions(records: Vec<PositionRecord>, source: &str) -> Vec<PositionRecord> {
    let total = records.len();
    let valid: Vec<PositionRecord> = records.into_iter().filter(PositionRecord::is_valid).collect();

    let rejected = total - valid.len();
    if rejected > 0 {
        warn!(
            "[{}] Rejected {} of {} positions with invalid coordinates",
            source, rejected, total
        );
    }
    valid
}

/// Convert server positions to records, dropping malformed ones.
///
/// Order is preserved. Timestamps going backwards are reported but not
/// corrected; sorting is the fetch layer's job.
pub fn positions_from_traccar(positions: &[TraccarPosition]) -> Vec<PositionRecord> {
    let records = retain_valid_positions(
        positions.iter().map(PositionRecord::from).collect(),
        "Ingest",
    );

    let backwards = records
        .windows(2)
        .filter(|w| w[1].timestamp < w[0].timestamp)
        .count();
    if backwards > 0 {
        warn!("[Ingest] {} positions are earlier than their predecessor", backwards);
    }

    records
}

/// Parse a JSON array of Traccar positions.
///
/// # Example
/// ```
/// use trackclean::parse_traccar_positions;
///
/// let json = r#"[
///     {"id": 1, "deviceId": 7, "fixTime": "2024-05-01T08:00:00.000+00:00",
///      "latitude": 51.5074, "longitude": -0.1278, "accuracy": 12.0, "speed": 0.0}
/// ]"#;
/// let records = parse_traccar_positions(json).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].accuracy, Some(12.0));
/// ```
pub fn parse_traccar_positions(json: &str) -> Result<Vec<PositionRecord>> {
    let positions: Vec<TraccarPosition> = serde_json::from_str(json)?;
    Ok(positions_from_traccar(&positions))
}
