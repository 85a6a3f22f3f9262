//! Tests for lib.rs core types

use chrono::{TimeZone, Utc};
use trackclean::PositionRecord;

fn fix(lat: f64, lng: f64) -> PositionRecord {
    PositionRecord::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(), lat, lng)
}

#[test]
fn test_position_validation() {
    assert!(fix(51.5074, -0.1278).is_valid());
    assert!(fix(90.0, 180.0).is_valid());
    assert!(!fix(91.0, 0.0).is_valid());
    assert!(!fix(0.0, 181.0).is_valid());
    assert!(!fix(f64::NAN, 0.0).is_valid());
    assert!(!fix(0.0, 0.0).with_accuracy(-3.0).is_valid());
    assert!(fix(0.0, 0.0).with_accuracy(0.0).is_valid());
}

#[test]
fn test_accuracy_absent_is_not_zero() {
    let unknown = fix(0.0, 0.0);
    let exact = fix(0.0, 0.0).with_accuracy(0.0);
    assert_eq!(unknown.accuracy, None);
    assert_eq!(exact.accuracy, Some(0.0));
    assert_ne!(unknown, exact);
}

#[test]
fn test_serialization_skips_absent_fields() {
    let record = fix(51.5, -0.12).with_accuracy(7.5);
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"accuracy\":7.5"));
    assert!(!json.contains("speed"));
    assert!(!json.contains("altitude"));

    let back: PositionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_builders_roundtrip_all_fields() {
    let record = fix(51.5, -0.12)
        .with_accuracy(4.0)
        .with_speed(12.5)
        .with_altitude(35.0);
    assert_eq!(record.speed, Some(12.5));
    assert_eq!(record.altitude, Some(35.0));

    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"speed\":12.5"));
    assert!(json.contains("\"altitude\":35.0"));
    assert!(!json.contains("course"));

    let back: PositionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
