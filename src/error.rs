//! Unified error handling for track cleaning.

use thiserror::Error;

/// Errors produced while configuring or feeding the cleaning pipeline.
///
/// Filter stages themselves never fail; every variant here comes from
/// configuration, preset resolution, or decoding input at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackCleanError {
    /// A threshold required to be positive was zero, negative, or not finite.
    #[error("invalid {field} for {stage} filter: {value} (must be a positive number)")]
    InvalidThreshold {
        stage: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("unknown filter preset: {0:?}")]
    UnknownPreset(String),

    /// `Custom` was requested without caller-supplied thresholds.
    #[error("custom preset requires explicit per-stage thresholds")]
    CustomPresetRequiresConfig,

    /// The pipeline was invoked with zero records.
    #[error("no position records to clean")]
    EmptyInput,

    #[error("failed to parse positions: {0}")]
    Parse(String),
}

impl TrackCleanError {
    /// True for errors caused by a bad pipeline configuration or preset name.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            TrackCleanError::InvalidThreshold { .. }
                | TrackCleanError::UnknownPreset(_)
                | TrackCleanError::CustomPresetRequiresConfig
        )
    }
}

impl From<serde_json::Error> for TrackCleanError {
    fn from(err: serde_json::Error) -> Self {
        TrackCleanError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackCleanError>;

/// Check that a threshold is finite and strictly positive.
pub(crate) fn ensure_positive(stage: &'static str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TrackCleanError::InvalidThreshold {
            stage,
            field,
            value,
        })
    }
}
