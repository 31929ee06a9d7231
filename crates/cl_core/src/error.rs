use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid season: {0} (expected 1-4)")]
    InvalidSeason(u8),

    #[error("Unknown augmentation: {0}")]
    UnknownAugmentation(String),

    #[error("Unknown training mode: {0}")]
    UnknownMode(String),

    #[error("Invalid simulator config: {0}")]
    InvalidConfig(String),

    #[error("Invalid trial count: {trials} (expected 1-{max})")]
    InvalidTrials { trials: u32, max: u32 },

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Errors caused by caller input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        match self {
            SimError::InvalidSeason(_)
            | SimError::UnknownAugmentation(_)
            | SimError::UnknownMode(_)
            | SimError::InvalidConfig(_)
            | SimError::InvalidTrials { .. }
            | SimError::UnsupportedSchema { .. } => true,
            SimError::Json(err) => err.is_data() || err.is_syntax(),
            SimError::Yaml(_) => true,
            SimError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
