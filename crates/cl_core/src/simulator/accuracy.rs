//! Synthetic accuracy formula.
//!
//! `season > trained_up_to` is an unseen task and scores in the untrained
//! range. Otherwise the score starts from a noisy baseline lifted by the
//! augmentation bonus, then loses points with the distance between the
//! evaluated season and the latest trained one:
//!
//! - naive fine-tuning drops steeply, floored at `naive_floor`
//! - EWC drops gently, floored at `ewc_floor`
//!
//! Draw order is fixed (baseline noise first, then the mode noise) so two
//! evaluations fed the same RNG stream differ only in their deterministic
//! terms.

use rand::Rng;

use super::config::SimulatorConfig;
use crate::domain::{AugmentationSettings, Season, TrainingMode};

/// Draw from `U[0, span)`. A non-positive span draws nothing.
fn noise<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    if span > 0.0 {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}

/// Stateless accuracy generator bound to one set of constants.
#[derive(Debug, Clone, Default)]
pub struct MetricSimulator {
    config: SimulatorConfig,
}

impl MetricSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Bonus from enabled augmentations, linear in the flag count.
    pub fn augmentation_bonus(&self, augmentations: &AugmentationSettings) -> f64 {
        augmentations.enabled_count() as f64 * self.config.augmentation_bonus
    }

    /// Accuracy of a model trained through `trained_up_to` when evaluated on `season`.
    pub fn accuracy<R: Rng + ?Sized>(
        &self,
        season: Season,
        trained_up_to: Season,
        mode: TrainingMode,
        augmentations: &AugmentationSettings,
        rng: &mut R,
    ) -> f64 {
        let cfg = &self.config;

        if season > trained_up_to {
            let value = if cfg.untrained_max > cfg.untrained_min {
                rng.gen_range(cfg.untrained_min..cfg.untrained_max)
            } else {
                cfg.untrained_min
            };
            return value.clamp(0.0, 100.0);
        }

        let flags = augmentations.enabled_count() as f64;
        let bonus = self.augmentation_bonus(augmentations);
        let baseline = cfg.baseline + noise(rng, cfg.baseline_noise) + bonus;
        let distance = f64::from(season.distance_to(trained_up_to));

        let value = if distance == 0.0 {
            baseline.min(cfg.current_task_cap)
        } else {
            match mode {
                TrainingMode::Naive => {
                    let drop = distance * cfg.naive_penalty_per_step + noise(rng, cfg.naive_noise);
                    (baseline - drop).max(cfg.naive_floor)
                }
                TrainingMode::Ewc => {
                    let drop = distance * cfg.ewc_penalty_per_step
                        + noise(rng, cfg.ewc_noise)
                        + flags * cfg.ewc_stability_offset;
                    (baseline - drop).max(cfg.ewc_floor)
                }
            }
        };

        value.clamp(0.0, 100.0)
    }
}

/// [`MetricSimulator::accuracy`] with the default constants.
pub fn accuracy<R: Rng + ?Sized>(
    season: Season,
    trained_up_to: Season,
    mode: TrainingMode,
    augmentations: &AugmentationSettings,
    rng: &mut R,
) -> f64 {
    MetricSimulator::default().accuracy(season, trained_up_to, mode, augmentations, rng)
}
