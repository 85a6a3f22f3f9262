//! Geodesic helpers shared by every filter stage.
//!
//! Distances use the haversine formula on a spherical Earth; speeds are
//! derived from consecutive timestamps, never from the speed the device
//! reported.

use crate::PositionRecord;
use geo::{Coord, Line, LineInterpolatePoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters per second to kilometers per hour.
const MS_TO_KMH: f64 = 3.6;

/// Great-circle distance in meters between two positions.
pub fn haversine_distance(a: &PositionRecord, b: &PositionRecord) -> f64 {
    haversine_distance_deg(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Great-circle distance in meters between two raw coordinates in degrees.
pub fn haversine_distance_deg(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Signed seconds elapsed from `a` to `b`, at millisecond resolution.
pub fn elapsed_seconds(a: &PositionRecord, b: &PositionRecord) -> f64 {
    (b.timestamp - a.timestamp).num_milliseconds() as f64 / 1000.0
}

/// Speed in km/h implied by moving from `a` to `b`.
///
/// Returns 0 when the elapsed time is zero or negative (duplicate or
/// out-of-order timestamps).
pub fn speed_kmh(a: &PositionRecord, b: &PositionRecord) -> f64 {
    let elapsed = elapsed_seconds(a, b);
    if elapsed <= 0.0 {
        return 0.0;
    }
    haversine_distance(a, b) / elapsed * MS_TO_KMH
}

/// Position `candidate` would have if it moved linearly between `before`
/// and `after` at constant speed.
///
/// Returns `(latitude, longitude)`. The time fraction is clamped to
/// `[0, 1]`; a pair spanning no time yields `before`'s coordinates.
pub fn interpolate_at_time(
    before: &PositionRecord,
    after: &PositionRecord,
    candidate: &PositionRecord,
) -> (f64, f64) {
    let span = elapsed_seconds(before, after);
    let fraction = if span > 0.0 {
        (elapsed_seconds(before, candidate) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let line = Line::new(
        Coord {
            x: before.longitude,
            y: before.latitude,
        },
        Coord {
            x: after.longitude,
            y: after.latitude,
        },
    );

    match line.line_interpolate_point(fraction) {
        Some(point) => (point.y(), point.x()),
        None => (before.latitude, before.longitude),
    }
}

/// Convert a distance in meters to degrees of latitude.
pub fn meters_to_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_METERS).to_degrees()
}

/// Total path length of a track in meters.
pub fn track_distance(records: &[PositionRecord]) -> f64 {
    records
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}
