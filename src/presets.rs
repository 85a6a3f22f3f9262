//! Named filter presets.
//!
//! | stage            | Ultra Clean | Clean     | Light |
//! |------------------|-------------|-----------|-------|
//! | accuracy         | 20 m        | 30 m      | 50 m  |
//! | ghost jump       | 120 km/h    | 150 km/h  | 250 km/h |
//! | drift            | 50 m, 10 km/h | 50 m, 10 km/h | off |
//! | jitter           | 15 m, 15 km/h | 15 m, 15 km/h | off |
//! | outlier          | 30 m        | 50 m      | 100 m |
//! | stationary       | 10 m        | 5 m       | 2 m   |
//! | interval         | 30 s        | 10 s      | 5 s   |
//!
//! "None" disables every stage. "Custom" takes caller-supplied thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackCleanError};
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPreset {
    UltraClean,
    Clean,
    Light,
    Custom,
    None,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 5] = [
        FilterPreset::UltraClean,
        FilterPreset::Clean,
        FilterPreset::Light,
        FilterPreset::Custom,
        FilterPreset::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPreset::UltraClean => "Ultra Clean",
            FilterPreset::Clean => "Clean",
            FilterPreset::Light => "Light",
            FilterPreset::Custom => "Custom",
            FilterPreset::None => "None",
        }
    }

    /// Concrete configuration for this preset.
    ///
    /// `Custom` needs `custom` and validates it; every other preset ignores
    /// it.
    pub fn resolve(self, custom: Option<PipelineConfig>) -> Result<PipelineConfig> {
        match self {
            FilterPreset::UltraClean => Ok(PipelineConfig::ultra_clean()),
            FilterPreset::Clean => Ok(PipelineConfig::clean()),
            FilterPreset::Light => Ok(PipelineConfig::light()),
            FilterPreset::None => Ok(PipelineConfig::disabled()),
            FilterPreset::Custom => {
                let config = custom.ok_or(TrackCleanError::CustomPresetRequiresConfig)?;
                config.validate()?;
                Ok(config)
            }
        }
    }
}

impl std::fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterPreset {
    type Err = TrackCleanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "ultraclean" => Ok(FilterPreset::UltraClean),
            "clean" => Ok(FilterPreset::Clean),
            "light" => Ok(FilterPreset::Light),
            "custom" => Ok(FilterPreset::Custom),
            "none" | "nofiltering" | "off" => Ok(FilterPreset::None),
            _ => Err(TrackCleanError::UnknownPreset(s.to_string())),
        }
    }
}

/// Resolve a preset name to its configuration.
///
/// Fails with [`TrackCleanError::UnknownPreset`] for unrecognized names and
/// [`TrackCleanError::CustomPresetRequiresConfig`] for "Custom", whose
/// thresholds must come from the caller via [`FilterPreset::resolve`].
///
/// # Example
/// ```
/// use trackclean::resolve_preset;
///
/// let clean = resolve_preset("Clean").unwrap();
/// assert_eq!(clean.accuracy.max_accuracy_meters, 30.0);
/// assert!(resolve_preset("unknown").unwrap_err().is_invalid_configuration());
/// ```
pub fn resolve_preset(name: &str) -> Result<PipelineConfig> {
    name.parse::<FilterPreset>()?.resolve(None)
}
