//! # cl_core - Seasonal Continual-Learning Simulator
//!
//! Engine behind the crop-disease continual-learning dashboard. It produces
//! synthetic accuracy numbers for a model trained season by season under
//! distribution shift, comparing naive fine-tuning against EWC.
//!
//! ## Features
//! - Seeded simulation (same seed = same metrics)
//! - Append-only per-mode histories with "last matching" chart queries
//! - Immutable dashboard state driven by a pure reducer
//! - JSON API for the front end

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
mod contract_tests;
pub mod domain;
pub mod error;
pub mod history;
pub mod simulator;
pub mod state;

pub use api::{execute_simulation_json, SimulationRequest, SimulationResponse};
pub use domain::{Augmentation, AugmentationSettings, Season, TrainingMetric, TrainingMode};
pub use error::{Result, SimError};
pub use history::{MetricHistory, TrainingBatch};
pub use simulator::{MetricSimulator, SimulatorConfig};
pub use state::{reduce, Action, SimulationState, TrainingSession};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use api::SCHEMA_VERSION;
