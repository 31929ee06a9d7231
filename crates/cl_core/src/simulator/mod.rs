//! # Metric Simulator
//!
//! 지속학습(continual learning) 실험의 합성 정확도 생성기.
//! 모든 난수는 주입된 `Rng` 에서만 뽑는다 (same seed = same numbers).

pub mod accuracy;
pub mod config;
pub mod expectation;

pub use accuracy::{accuracy, MetricSimulator};
pub use config::{config_from_env, config_from_env_var, SimulatorConfig, CONFIG_PATH_ENV};
pub use expectation::{check_trials, ModeComparison, MAX_TRIALS};
