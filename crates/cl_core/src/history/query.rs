//! Read side of the histories. Charts only ever look at the most recent
//! entry for each season ("last matching"), older duplicates stay in the log.

use serde::{Deserialize, Serialize};

use super::aggregator::MetricHistory;
use crate::domain::{Season, TrainingMetric};

/// Most recent entry recorded for `season`.
pub fn latest_for_season(history: &MetricHistory, season: Season) -> Option<&TrainingMetric> {
    history.iter().rev().find(|metric| metric.season == season)
}

/// Latest accuracy per season, indexed by `Season::index`.
pub fn season_series(history: &MetricHistory) -> [Option<f64>; 4] {
    let mut series = [None; 4];
    for season in Season::ALL {
        series[season.index()] = latest_for_season(history, season).map(|m| m.accuracy);
    }
    series
}

/// Mean of the latest per-season accuracies, `None` for an empty history.
pub fn average_accuracy(history: &MetricHistory) -> Option<f64> {
    let latest: Vec<f64> = season_series(history).into_iter().flatten().collect();
    if latest.is_empty() {
        None
    } else {
        Some(latest.iter().sum::<f64>() / latest.len() as f64)
    }
}

/// One x-position of the naive-vs-EWC chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub season: Season,
    pub naive: Option<f64>,
    pub ewc: Option<f64>,
}

pub fn comparison_points(naive: &MetricHistory, ewc: &MetricHistory) -> Vec<ComparisonPoint> {
    let naive_series = season_series(naive);
    let ewc_series = season_series(ewc);

    Season::ALL
        .into_iter()
        .map(|season| ComparisonPoint {
            season,
            naive: naive_series[season.index()],
            ewc: ewc_series[season.index()],
        })
        .collect()
}

/// Headline numbers for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub entries: usize,
    pub seasons_covered: Vec<Season>,
    pub average_accuracy: Option<f64>,
}

impl HistorySummary {
    pub fn from_history(history: &MetricHistory) -> Self {
        let series = season_series(history);
        Self {
            entries: history.len(),
            seasons_covered: Season::ALL
                .into_iter()
                .filter(|season| series[season.index()].is_some())
                .collect(),
            average_accuracy: average_accuracy(history),
        }
    }
}

/// Mean (ewc - naive) over seasons both histories have, `None` if there are none.
pub fn retention_gap(naive: &MetricHistory, ewc: &MetricHistory) -> Option<f64> {
    let gaps: Vec<f64> = comparison_points(naive, ewc)
        .into_iter()
        .filter_map(|point| Some(point.ewc? - point.naive?))
        .collect();

    if gaps.is_empty() {
        None
    } else {
        Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
    }
}
