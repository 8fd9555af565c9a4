//! Error handling

use thiserror::Error;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, Error)]
pub enum RiskError {
    // Configuration errors
    #[error("Invalid method '{0}'. Please choose 'linear' or 'square'.")]
    UnknownWeightMethod(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Dataset errors
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Dataset not loaded: {0}")]
    DatasetNotLoaded(String),

    // Model errors
    #[error("Model '{model}' failed: {reason}")]
    Model { model: String, reason: String },

    #[error("Model '{0}' has not been trained")]
    NotTrained(String),

    #[error("Model input layout mismatch: expected {expected:08x}, got {actual:08x}")]
    LayoutMismatch { expected: u32, actual: u32 },

    // IO / serialization errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RiskError {
    pub fn model(model: impl Into<String>, reason: impl Into<String>) -> Self {
        RiskError::Model {
            model: model.into(),
            reason: reason.into(),
        }
    }
}
