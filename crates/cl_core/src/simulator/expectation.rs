//! Monte-Carlo estimate of the mean accuracy over many seeded trials.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::accuracy::MetricSimulator;
use crate::domain::{AugmentationSettings, Season, TrainingMode};
use crate::error::{Result, SimError};

/// Below this many trials the rayon fan-out costs more than it saves.
const PARALLEL_THRESHOLD: u32 = 256;

/// Upper bound on Monte-Carlo trials per comparison.
pub const MAX_TRIALS: u32 = 100_000;

/// Accept a trial count within `1..=MAX_TRIALS`.
pub fn check_trials(trials: u32) -> Result<u32> {
    if trials == 0 || trials > MAX_TRIALS {
        return Err(SimError::InvalidTrials { trials, max: MAX_TRIALS });
    }
    Ok(trials)
}

/// Mean accuracy of both modes for one (season, trained_up_to) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeComparison {
    pub season: Season,
    pub trained_up_to: Season,
    pub trials: u32,
    pub naive_mean: f64,
    pub ewc_mean: f64,
}

impl ModeComparison {
    /// EWC mean minus naive mean.
    pub fn retention_gap(&self) -> f64 {
        self.ewc_mean - self.naive_mean
    }
}

impl MetricSimulator {
    /// Mean of `trials` evaluations, trial `i` seeded with `base_seed + i`.
    /// `None` for zero trials.
    pub fn expected_accuracy(
        &self,
        season: Season,
        trained_up_to: Season,
        mode: TrainingMode,
        augmentations: &AugmentationSettings,
        trials: u32,
        base_seed: u64,
    ) -> Option<f64> {
        if trials == 0 {
            return None;
        }

        let run = |i: u32| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(u64::from(i)));
            self.accuracy(season, trained_up_to, mode, augmentations, &mut rng)
        };

        // Collect first so the summation order does not depend on work stealing.
        let samples: Vec<f64> = if trials > PARALLEL_THRESHOLD {
            (0..trials).into_par_iter().map(run).collect()
        } else {
            (0..trials).map(run).collect()
        };

        Some(samples.iter().sum::<f64>() / f64::from(trials))
    }

    /// Both mode means over the same trial seeds. `None` for zero trials.
    pub fn compare_modes(
        &self,
        season: Season,
        trained_up_to: Season,
        augmentations: &AugmentationSettings,
        trials: u32,
        base_seed: u64,
    ) -> Option<ModeComparison> {
        let mean = |mode| {
            self.expected_accuracy(season, trained_up_to, mode, augmentations, trials, base_seed)
        };

        let comparison = ModeComparison {
            season,
            trained_up_to,
            trials,
            naive_mean: mean(TrainingMode::Naive)?,
            ewc_mean: mean(TrainingMode::Ewc)?,
        };

        tracing::debug!(
            season = season.number(),
            trained_up_to = trained_up_to.number(),
            trials,
            gap = comparison.retention_gap(),
            "mode comparison finished"
        );
        Some(comparison)
    }
}
