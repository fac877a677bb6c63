use std::io;
use thiserror::Error;

/// Unified error type for the mealchat application
#[derive(Error, Debug)]
pub enum MealchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MealchatError {
    fn from(err: serde_json::Error) -> Self {
        MealchatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for MealchatError {
    fn from(err: serde_yml::Error) -> Self {
        MealchatError::Serialization(format!("YAML error: {}", err))
    }
}
