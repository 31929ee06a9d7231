pub mod simulation_json;

pub use simulation_json::{
    execute_simulation_json, SimulationRequest, SimulationRequestType, SimulationResponse,
    SimulationResponseType, MAX_TRIALS, SCHEMA_VERSION,
};
