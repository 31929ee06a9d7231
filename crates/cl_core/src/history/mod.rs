// 히스토리 집계 및 조회

pub mod aggregator;
pub mod query;

pub use aggregator::{evaluate_step, MetricHistory, TrainingBatch};
pub use query::{
    average_accuracy, comparison_points, latest_for_season, retention_gap, season_series,
    ComparisonPoint, HistorySummary,
};
