// 액션 → 새 상태 (순수 함수)
use serde::{Deserialize, Serialize};

use super::SimulationState;
use crate::domain::{Augmentation, AugmentationSettings, TrainingMode};
use crate::history::TrainingBatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    SelectMode { mode: TrainingMode },
    ToggleAugmentation { augmentation: Augmentation },
    SetAugmentations { augmentations: AugmentationSettings },
    /// Begin a train step on the next season
    StartTraining,
    /// Cosmetic progress update, 0-100
    AdvanceProgress { percent: u8 },
    /// Append the metrics of the step in progress
    CompleteTraining { batch: TrainingBatch },
    /// Clear progress and histories, keep mode and augmentation choices
    Reset,
}

/// Apply `action` to `state` and return the next state.
///
/// Actions that make no sense in the current state (starting past the last
/// season, completing a step that was never started, ...) leave it unchanged.
pub fn reduce(state: &SimulationState, action: Action) -> SimulationState {
    match action {
        Action::SelectMode { mode } => SimulationState { mode, ..state.clone() },

        Action::ToggleAugmentation { augmentation } => SimulationState {
            augmentations: state.augmentations.toggled(augmentation),
            ..state.clone()
        },

        Action::SetAugmentations { augmentations } => {
            SimulationState { augmentations, ..state.clone() }
        }

        Action::StartTraining => {
            if !state.can_start_training() {
                log::debug!(
                    "StartTraining ignored (is_training={}, trained_up_to={:?})",
                    state.is_training,
                    state.trained_up_to
                );
                return state.clone();
            }
            SimulationState { is_training: true, progress: 0, ..state.clone() }
        }

        Action::AdvanceProgress { percent } => {
            if !state.is_training {
                return state.clone();
            }
            // 진행률은 되돌아가지 않음
            let progress = state.progress.max(percent.min(100));
            SimulationState { progress, ..state.clone() }
        }

        Action::CompleteTraining { batch } => {
            if !state.is_training || state.next_season() != Some(batch.trained_up_to) {
                log::debug!(
                    "CompleteTraining for {} ignored (is_training={}, expected {:?})",
                    batch.trained_up_to,
                    state.is_training,
                    state.next_season()
                );
                return state.clone();
            }
            if !batch.is_well_formed() {
                log::debug!(
                    "CompleteTraining for {} ignored (malformed batch: {} naive / {} ewc entries)",
                    batch.trained_up_to,
                    batch.naive.len(),
                    batch.ewc.len()
                );
                return state.clone();
            }

            log::info!(
                "Trained through {} ({} naive / {} ewc metrics appended)",
                batch.trained_up_to,
                batch.naive.len(),
                batch.ewc.len()
            );

            SimulationState {
                trained_up_to: Some(batch.trained_up_to),
                is_training: false,
                progress: 100,
                naive_history: state.naive_history.appended(&batch.naive),
                ewc_history: state.ewc_history.appended(&batch.ewc),
                ..state.clone()
            }
        }

        Action::Reset => SimulationState {
            mode: state.mode,
            augmentations: state.augmentations,
            ..SimulationState::default()
        },
    }
}
