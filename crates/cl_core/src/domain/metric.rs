use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::season::Season;
use crate::error::SimError;

/// Training strategy being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Plain sequential fine-tuning, suffers catastrophic forgetting
    #[default]
    Naive,
    /// Elastic Weight Consolidation
    Ewc,
}

impl TrainingMode {
    pub const BOTH: [TrainingMode; 2] = [TrainingMode::Naive, TrainingMode::Ewc];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingMode::Naive => "naive",
            TrainingMode::Ewc => "ewc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrainingMode::Naive => "Naive Fine-Tuning",
            TrainingMode::Ewc => "EWC (Elastic Weight Consolidation)",
        }
    }
}

impl FromStr for TrainingMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(TrainingMode::Naive),
            "ewc" => Ok(TrainingMode::Ewc),
            other => Err(SimError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluation of one season, appended to a history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetric {
    pub season: Season,
    /// 0-100
    pub accuracy: f64,
    /// Reserved. Always 0.0, nothing derives it from the accuracy history yet.
    #[serde(default)]
    pub forgetting: f64,
    pub timestamp: DateTime<Utc>,
}

impl TrainingMetric {
    pub fn new(season: Season, accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Self { season, accuracy, forgetting: 0.0, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("EWC".parse::<TrainingMode>().unwrap(), TrainingMode::Ewc);
        assert_eq!(" naive ".parse::<TrainingMode>().unwrap(), TrainingMode::Naive);
        assert!("replay".parse::<TrainingMode>().is_err());
    }

    #[test]
    fn test_metric_forgetting_is_zero() {
        let metric = TrainingMetric::new(Season::BlurLowLight, 91.5, Utc::now());
        assert_eq!(metric.forgetting, 0.0);

        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["season"], 3);
        assert_eq!(json["forgetting"], 0.0);
    }
}
