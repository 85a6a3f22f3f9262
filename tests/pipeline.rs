//! Tests for the cleaning pipeline orchestrator

use chrono::{Duration, TimeZone, Utc};
use trackclean::geo_utils::meters_to_degrees;
use trackclean::{
    CleaningPipeline, FilterStage, PipelineConfig, PositionRecord, TrackCleanError, clean_track,
    clean_tracks,
};

fn fix(seconds: i64, north_m: f64, east_m: f64) -> PositionRecord {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    PositionRecord::new(
        start + Duration::seconds(seconds),
        meters_to_degrees(north_m),
        meters_to_degrees(east_m),
    )
    .with_accuracy(8.0)
}

/// A drive with a ghost jump, a bad fix and a stop, sampled every 5 s.
fn messy_drive() -> Vec<PositionRecord> {
    let mut east = 0.0;
    let mut records = Vec::with_capacity(60);
    for i in 0..60 {
        // Parked for a minute, wobbling half a meter
        let parked = (40..52).contains(&i);
        if i > 0 && !parked {
            east += 60.0;
        }
        let north = if parked { (i % 2) as f64 * 0.5 } else { 0.0 };
        records.push(fix(i * 5, north, east));
    }
    // Ghost jump 20 km away
    records[12] = fix(60, 20_000.0, 720.0);
    // Inaccurate fix
    records[25].accuracy = Some(250.0);
    records
}

#[test]
fn test_run_reports_enabled_stages_in_order() {
    let pipeline = CleaningPipeline::new(PipelineConfig::clean()).unwrap();
    let cleaned = pipeline.run(&messy_drive()).unwrap();

    let stages: Vec<FilterStage> = cleaned.report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, FilterStage::ALL.to_vec());
}

#[test]
fn test_report_counts_chain() {
    let records = messy_drive();
    let cleaned = clean_track(&records, &PipelineConfig::clean()).unwrap();
    let report = &cleaned.report;

    assert_eq!(report.input_count(), Some(records.len()));
    assert_eq!(report.output_count(), Some(cleaned.records.len()));
    for pair in report.stages.windows(2) {
        assert_eq!(pair[0].output_count, pair[1].input_count);
    }
    assert_eq!(
        report.total_removed(),
        records.len() - cleaned.records.len()
    );
}

#[test]
fn test_clean_removes_defects() {
    let records = messy_drive();
    let ghost = records[12];
    let inaccurate = records[25];
    let cleaned = clean_track(&records, &PipelineConfig::clean()).unwrap();

    assert!(!cleaned.records.contains(&ghost));
    assert!(!cleaned.records.contains(&inaccurate));
    assert_eq!(cleaned.report.get(FilterStage::Accuracy).unwrap().removed(), 1);
    assert_eq!(cleaned.report.get(FilterStage::GhostJump).unwrap().removed(), 1);

    // The parked stretch collapses to at most one fix.
    let parked = cleaned
        .records
        .iter()
        .filter(|r| r.longitude == records[45].longitude)
        .count();
    assert!(parked <= 1);
}

#[test]
fn test_output_is_ordered_subsequence() {
    let records = messy_drive();
    let cleaned = clean_track(&records, &PipelineConfig::ultra_clean()).unwrap();

    let mut cursor = records.iter();
    for kept in &cleaned.records {
        assert!(cursor.any(|r| r == kept), "output not a subsequence of input");
    }
}

#[test]
fn test_disabled_stages_are_omitted() {
    let mut config = PipelineConfig::disabled();
    config.ghost_jump.enabled = true;
    config.interval.enabled = true;

    let cleaned = clean_track(&messy_drive(), &config).unwrap();
    let stages: Vec<FilterStage> = cleaned.report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, vec![FilterStage::GhostJump, FilterStage::TimeInterval]);
}

#[test]
fn test_all_disabled_passes_through() {
    let records = messy_drive();
    let cleaned = clean_track(&records, &PipelineConfig::disabled()).unwrap();
    assert_eq!(cleaned.records, records);
    assert!(cleaned.report.stages.is_empty());
    assert_eq!(cleaned.report.total_removed(), 0);
    assert_eq!(cleaned.report.input_count(), None);
}

#[test]
fn test_empty_input_is_an_error() {
    let pipeline = CleaningPipeline::new(PipelineConfig::clean()).unwrap();
    assert_eq!(pipeline.run(&[]), Err(TrackCleanError::EmptyInput));
}

#[test]
fn test_single_record_survives() {
    let one = vec![fix(0, 0.0, 0.0).with_accuracy(10_000.0)];
    let cleaned = clean_track(&one, &PipelineConfig::ultra_clean()).unwrap();
    assert_eq!(cleaned.records, one);
}

#[test]
fn test_invalid_threshold_rejected() {
    let mut config = PipelineConfig::clean();
    config.stationary.min_movement_meters = 0.0;
    let err = CleaningPipeline::new(config).unwrap_err();
    assert!(err.is_invalid_configuration());
    assert!(matches!(
        err,
        TrackCleanError::InvalidThreshold {
            stage: "stationary",
            ..
        }
    ));
}

#[test]
fn test_non_finite_threshold_rejected() {
    let mut config = PipelineConfig::clean();
    config.ghost_jump.max_speed_kmh = f64::NAN;
    assert!(config.validate().is_err());

    config.ghost_jump.max_speed_kmh = f64::INFINITY;
    assert!(config.validate().is_err());
}

#[test]
fn test_disabled_stage_thresholds_not_validated() {
    let mut config = PipelineConfig::clean();
    config.drift.enabled = false;
    config.drift.max_distance_meters = -5.0;
    assert!(CleaningPipeline::new(config).is_ok());
}

#[test]
fn test_run_stage_matches_free_function() {
    let records = messy_drive();
    let pipeline = CleaningPipeline::new(PipelineConfig::clean()).unwrap();
    assert_eq!(
        pipeline.run_stage(FilterStage::TimeInterval, &records),
        trackclean::filter_time_interval(&records, 10.0)
    );
}

#[test]
fn test_report_display() {
    let cleaned = clean_track(&messy_drive(), &PipelineConfig::clean()).unwrap();
    let text = cleaned.report.to_string();
    assert!(text.contains("Ghost jump"));
    assert!(text.contains("Total removed"));
}

#[test]
fn test_config_json_roundtrip_uses_camel_case() {
    let json = serde_json::to_string(&PipelineConfig::clean()).unwrap();
    assert!(json.contains("\"ghostJump\""));
    assert!(json.contains("\"maxAccuracyMeters\":30.0"));

    let back: PipelineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, PipelineConfig::clean());
}

#[test]
fn test_clean_tracks_batch() {
    let tracks = vec![
        ("device-1".to_string(), messy_drive()),
        ("device-2".to_string(), Vec::new()),
    ];
    let results = clean_tracks(&tracks, &PipelineConfig::clean()).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "device-1");
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].1, Err(TrackCleanError::EmptyInput));
}

#[test]
fn test_clean_tracks_invalid_config_fails_batch() {
    let mut config = PipelineConfig::clean();
    config.accuracy.max_accuracy_meters = -1.0;
    let tracks = vec![("device-1".to_string(), messy_drive())];
    assert!(clean_tracks(&tracks, &config).is_err());
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let tracks: Vec<(String, Vec<PositionRecord>)> = (0..8)
        .map(|i| (format!("device-{}", i), messy_drive()[i..].to_vec()))
        .collect();
    let config = PipelineConfig::clean();

    let sequential = clean_tracks(&tracks, &config).unwrap();
    let parallel = trackclean::clean_tracks_parallel(&tracks, &config).unwrap();
    assert_eq!(sequential, parallel);
}
