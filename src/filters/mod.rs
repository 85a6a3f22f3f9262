//! # Filter Stages
//!
//! Each stage takes an ordered slice of positions and returns the ordered
//! subset it keeps. Stages never reorder, never interpolate new points, and
//! never return an empty track from a non-empty one.
//!
//! ## Stages (in pipeline order)
//! 1. Accuracy - drop fixes whose reported error radius is too large
//! 2. Ghost jump - drop fixes implying an impossible speed
//! 3. Drift - drop slow, short moves while the receiver acquires a fix
//! 4. Jitter - drop residual small wiggles around stops
//! 5. Trajectory outlier - drop fixes far from the path implied by neighbors
//! 6. Stationary - drop fixes that barely moved
//! 7. Time interval - downsample to a minimum spacing in time
//!
//! Most stages share one streaming rule: compare each candidate against the
//! last *accepted* record, and only advance that reference when the
//! candidate is kept. A single bad fix therefore never becomes the reference
//! for the fixes after it.

mod accuracy;
mod ghost_jump;
mod interval;
mod movement;
mod outlier;
mod stationary;

use serde::{Deserialize, Serialize};

use crate::PositionRecord;

pub use accuracy::filter_accuracy;
pub use ghost_jump::filter_ghost_jumps;
pub use interval::filter_time_interval;
pub use movement::{filter_drift, filter_jitter, filter_movement};
pub use outlier::{OUTLIER_WINDOW, filter_trajectory_outliers};
pub use stationary::filter_stationary;

/// Identifies a filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    Accuracy,
    GhostJump,
    Drift,
    Jitter,
    TrajectoryOutlier,
    Stationary,
    TimeInterval,
}

impl FilterStage {
    /// All stages in execution order.
    pub const ALL: [FilterStage; 7] = [
        FilterStage::Accuracy,
        FilterStage::GhostJump,
        FilterStage::Drift,
        FilterStage::Jitter,
        FilterStage::TrajectoryOutlier,
        FilterStage::Stationary,
        FilterStage::TimeInterval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterStage::Accuracy => "accuracy",
            FilterStage::GhostJump => "ghost_jump",
            FilterStage::Drift => "drift",
            FilterStage::Jitter => "jitter",
            FilterStage::TrajectoryOutlier => "trajectory_outlier",
            FilterStage::Stationary => "stationary",
            FilterStage::TimeInterval => "time_interval",
        }
    }

    /// Human-readable label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            FilterStage::Accuracy => "Accuracy",
            FilterStage::GhostJump => "Ghost jump",
            FilterStage::Drift => "Drift",
            FilterStage::Jitter => "Small jitter",
            FilterStage::TrajectoryOutlier => "Trajectory outlier",
            FilterStage::Stationary => "Stationary point",
            FilterStage::TimeInterval => "Time interval",
        }
    }
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep the first record, then every candidate `reject` does not flag when
/// compared against the last kept record.
///
/// `reject(last_accepted, candidate)` returning `true` drops the candidate
/// and leaves the reference untouched.
pub(crate) fn retain_against_last<F>(records: &[PositionRecord], mut reject: F) -> Vec<PositionRecord>
where
    F: FnMut(&PositionRecord, &PositionRecord) -> bool,
{
    let Some((first, rest)) = records.split_first() else {
        return Vec::new();
    };

    let mut initial = Vec::with_capacity(records.len());
    initial.push(*first);

    let (_, kept) = rest
        .iter()
        .fold((*first, initial), |(last_accepted, mut kept), candidate| {
            if reject(&last_accepted, candidate) {
                (last_accepted, kept)
            } else {
                kept.push(*candidate);
                (*candidate, kept)
            }
        });

    kept
}
