// 시뮬레이션 JSON API - 대시보드 프런트엔드와 주고받는 요청/응답
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{AugmentationSettings, Season, TrainingMode};
use crate::error::SimError;
use crate::history::{ComparisonPoint, HistorySummary, MetricHistory};
use crate::simulator::{check_trials, config_from_env, MetricSimulator, ModeComparison, SimulatorConfig};
use crate::state::{InstantPacer, TrainingSession};

pub use crate::simulator::MAX_TRIALS;

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Full config; wins over `preset`
    #[serde(default)]
    pub config: Option<SimulatorConfig>,
    /// "realistic", "harsh", "gentle" or "deterministic"
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub augmentations: AugmentationSettings,
    pub request_type: SimulationRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum SimulationRequestType {
    /// Run up to `steps` train steps from a fresh state
    RunSteps { steps: u8 },

    /// Single accuracy draw
    Evaluate { season: Season, trained_up_to: Season, mode: TrainingMode },

    /// Monte-Carlo means for both modes
    CompareModes { season: Season, trained_up_to: Season, trials: u32 },
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub run_id: Uuid,
    pub success: bool,
    pub response_type: SimulationResponseType,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum SimulationResponseType {
    Run {
        steps_requested: u8,
        steps_completed: usize,
        trained_up_to: Option<Season>,
        naive_history: MetricHistory,
        ewc_history: MetricHistory,
        comparison: Vec<ComparisonPoint>,
        naive_summary: HistorySummary,
        ewc_summary: HistorySummary,
        retention_gap: Option<f64>,
    },

    Accuracy { season: Season, trained_up_to: Season, mode: TrainingMode, accuracy: f64 },

    Comparison { comparison: ModeComparison, retention_gap: f64 },
}

/// Log a rejected request and turn the error into its response message.
/// Caller mistakes are debug noise; environment failures are warnings.
fn reject(err: SimError) -> String {
    if err.is_input_error() {
        debug!(error = %err, "request rejected");
    } else {
        warn!(error = %err, "request failed");
    }
    err.to_string()
}

fn resolve_config(request: &SimulationRequest) -> Result<SimulatorConfig, String> {
    let config = match (&request.config, &request.preset) {
        (Some(config), _) => config.clone(),
        (None, Some(name)) => {
            SimulatorConfig::by_name(name).ok_or_else(|| format!("Unknown preset: {}", name))?
        }
        (None, None) => config_from_env().map_err(reject)?,
    };

    config.validate().map_err(reject)?;
    Ok(config)
}

/// Handle one JSON request and return the JSON response.
///
/// Malformed requests, schema mismatches and invalid configs are returned as
/// `Err` with a readable message.
pub fn execute_simulation_json(request_json: &str) -> Result<String, String> {
    let request: SimulationRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(reject(SimError::UnsupportedSchema {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        }));
    }

    let config = resolve_config(&request)?;
    let run_id = Uuid::new_v4();
    debug!(%run_id, seed = request.seed, "simulation request accepted");

    let response_type = match request.request_type {
        SimulationRequestType::RunSteps { steps } => {
            let rng = ChaCha8Rng::seed_from_u64(request.seed);
            let mut session = TrainingSession::new(config, rng, InstantPacer::default())
                .with_state(crate::state::SimulationState::with_augmentations(request.augmentations));
            let steps_completed = session.run(steps as usize);
            let state = session.into_state();

            info!(%run_id, steps, steps_completed, "run finished");
            SimulationResponseType::Run {
                steps_requested: steps,
                steps_completed,
                trained_up_to: state.trained_up_to,
                comparison: state.comparison(),
                naive_summary: state.summary(TrainingMode::Naive),
                ewc_summary: state.summary(TrainingMode::Ewc),
                retention_gap: state.retention_gap(),
                naive_history: state.naive_history,
                ewc_history: state.ewc_history,
            }
        }

        SimulationRequestType::Evaluate { season, trained_up_to, mode } => {
            let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
            let accuracy = MetricSimulator::new(config).accuracy(
                season,
                trained_up_to,
                mode,
                &request.augmentations,
                &mut rng,
            );
            SimulationResponseType::Accuracy { season, trained_up_to, mode, accuracy }
        }

        SimulationRequestType::CompareModes { season, trained_up_to, trials } => {
            let trials = check_trials(trials).map_err(reject)?;
            let comparison = MetricSimulator::new(config)
                .compare_modes(season, trained_up_to, &request.augmentations, trials, request.seed)
                .ok_or_else(|| format!("No comparison for {} trials", trials))?;
            SimulationResponseType::Comparison {
                retention_gap: comparison.retention_gap(),
                comparison,
            }
        }
    };

    serde_json::to_string(&SimulationResponse {
        schema_version: SCHEMA_VERSION,
        run_id,
        success: true,
        response_type,
        error_message: None,
    })
    .map_err(|e| format!("Failed to serialize response: {}", e))
}
