// 학습 단계마다 시즌별 지표를 두 모드 히스토리에 추가
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{AugmentationSettings, Season, TrainingMetric, TrainingMode};
use crate::simulator::MetricSimulator;

/// Metrics produced by one completed train step, ready to append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingBatch {
    /// Season that was just trained
    pub trained_up_to: Season,
    pub naive: Vec<TrainingMetric>,
    pub ewc: Vec<TrainingMetric>,
}

impl TrainingBatch {
    pub fn metrics_for(&self, mode: TrainingMode) -> &[TrainingMetric] {
        match mode {
            TrainingMode::Naive => &self.naive,
            TrainingMode::Ewc => &self.ewc,
        }
    }

    /// Both modes hold exactly one entry per season `1..=trained_up_to`, in
    /// order, with every accuracy within 0-100.
    pub fn is_well_formed(&self) -> bool {
        TrainingMode::BOTH.into_iter().all(|mode| {
            let metrics = self.metrics_for(mode);
            metrics.len() == self.trained_up_to.number() as usize
                && metrics
                    .iter()
                    .zip(self.trained_up_to.up_to())
                    .all(|(metric, season)| {
                        metric.season == season && (0.0..=100.0).contains(&metric.accuracy)
                    })
        })
    }
}

/// Evaluate every season from the first through `trained_up_to` under both modes.
///
/// Seasons are visited in increasing order. For each season the naive metric
/// is drawn before the EWC one, so a seeded RNG reproduces the whole batch.
pub fn evaluate_step<R: Rng + ?Sized>(
    simulator: &MetricSimulator,
    trained_up_to: Season,
    augmentations: &AugmentationSettings,
    rng: &mut R,
    timestamp: DateTime<Utc>,
) -> TrainingBatch {
    let seasons = trained_up_to.number() as usize;
    let mut batch = TrainingBatch {
        trained_up_to,
        naive: Vec::with_capacity(seasons),
        ewc: Vec::with_capacity(seasons),
    };

    for season in trained_up_to.up_to() {
        for mode in TrainingMode::BOTH {
            let accuracy = simulator.accuracy(season, trained_up_to, mode, augmentations, rng);
            let metric = TrainingMetric::new(season, accuracy, timestamp);
            match mode {
                TrainingMode::Naive => batch.naive.push(metric),
                TrainingMode::Ewc => batch.ewc.push(metric),
            }
        }
    }

    batch
}

/// Append-only log of metrics for one mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricHistory {
    entries: Vec<TrainingMetric>,
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy with `metrics` appended. Existing entries are never touched.
    pub fn appended(&self, metrics: &[TrainingMetric]) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + metrics.len());
        entries.extend_from_slice(&self.entries);
        entries.extend_from_slice(metrics);
        Self { entries }
    }

    pub fn entries(&self) -> &[TrainingMetric] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingMetric> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MetricHistory {
    type Item = &'a TrainingMetric;
    type IntoIter = std::slice::Iter<'a, TrainingMetric>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<TrainingMetric>> for MetricHistory {
    fn from(entries: Vec<TrainingMetric>) -> Self {
        Self { entries }
    }
}
