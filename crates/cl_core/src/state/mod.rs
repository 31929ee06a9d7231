//! Simulation State
//!
//! `SimulationState` is a plain value. It never changes in place: every
//! user action goes through [`reduce`] which returns the next state, so the
//! whole dashboard flow can be driven without any rendering layer.

pub mod reducer;
pub mod session;

pub use reducer::{reduce, Action};
pub use session::{progress_schedule, InstantPacer, Pacer, StepOutcome, ThreadPacer, TrainingSession};

use serde::{Deserialize, Serialize};

use crate::domain::{AugmentationSettings, Season, TrainingMode};
use crate::history::{comparison_points, retention_gap, ComparisonPoint, HistorySummary, MetricHistory};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Highest season trained so far, `None` before the first step
    pub trained_up_to: Option<Season>,

    /// A train step is running (progress bar visible)
    pub is_training: bool,

    /// 0-100, cosmetic
    pub progress: u8,

    /// Mode whose charts are on screen
    pub mode: TrainingMode,

    pub augmentations: AugmentationSettings,

    pub naive_history: MetricHistory,
    pub ewc_history: MetricHistory,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_augmentations(augmentations: AugmentationSettings) -> Self {
        Self { augmentations, ..Self::default() }
    }

    /// Season the next train step will target, `None` once all four are done.
    pub fn next_season(&self) -> Option<Season> {
        match self.trained_up_to {
            None => Some(Season::FIRST),
            Some(season) => season.next(),
        }
    }

    pub fn all_seasons_trained(&self) -> bool {
        self.next_season().is_none()
    }

    pub fn can_start_training(&self) -> bool {
        !self.is_training && !self.all_seasons_trained()
    }

    pub fn history(&self, mode: TrainingMode) -> &MetricHistory {
        match mode {
            TrainingMode::Naive => &self.naive_history,
            TrainingMode::Ewc => &self.ewc_history,
        }
    }

    /// History for the currently selected mode.
    pub fn active_history(&self) -> &MetricHistory {
        self.history(self.mode)
    }

    pub fn comparison(&self) -> Vec<ComparisonPoint> {
        comparison_points(&self.naive_history, &self.ewc_history)
    }

    pub fn summary(&self, mode: TrainingMode) -> HistorySummary {
        HistorySummary::from_history(self.history(mode))
    }

    pub fn retention_gap(&self) -> Option<f64> {
        retention_gap(&self.naive_history, &self.ewc_history)
    }
}
