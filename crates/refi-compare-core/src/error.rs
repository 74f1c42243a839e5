use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefiCompareError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Duplicate scenario id: {0}")]
    DuplicateScenario(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RefiCompareError {
    fn from(e: serde_json::Error) -> Self {
        RefiCompareError::SerializationError(e.to_string())
    }
}
