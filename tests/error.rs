//! Tests for error module

use trackclean::error::TrackCleanError;

#[test]
fn test_error_display() {
    let err = TrackCleanError::InvalidThreshold {
        stage: "accuracy",
        field: "maxAccuracyMeters",
        value: -1.0,
    };
    assert!(err.to_string().contains("accuracy"));
    assert!(err.to_string().contains("maxAccuracyMeters"));
    assert!(err.to_string().contains("-1"));
}

#[test]
fn test_unknown_preset_display() {
    let err = TrackCleanError::UnknownPreset("sparkly".to_string());
    assert!(err.to_string().contains("sparkly"));
}

#[test]
fn test_invalid_configuration_classification() {
    assert!(
        TrackCleanError::UnknownPreset("x".to_string()).is_invalid_configuration()
    );
    assert!(TrackCleanError::CustomPresetRequiresConfig.is_invalid_configuration());
    assert!(!TrackCleanError::EmptyInput.is_invalid_configuration());
    assert!(!TrackCleanError::Parse("bad".to_string()).is_invalid_configuration());
}

#[test]
fn test_from_json_error() {
    let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
    let err = TrackCleanError::from(json_err);
    assert!(matches!(err, TrackCleanError::Parse(_)));
}
