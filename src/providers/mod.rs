use async_trait::async_trait;
use thiserror::Error;

/// Semantic outcomes the model can return without the call itself failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Populated recommendation text from the first candidate
    Recommendation(String),
    /// The prompt was rejected outright, with the provider's block reason
    Blocked(String),
    /// Generation stopped at the output-length cap before any text landed
    Truncated,
    /// The candidate was withheld by the safety filter
    SafetyBlocked,
    /// No content and an unrecognized (possibly empty) finish reason
    Empty(String),
}

/// Terminal failures of a fetch. Each call produces exactly one of these or a
/// `ModelReply`; nothing is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no network connection")]
    Offline,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("could not decode model response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Offline
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Issues one request and delivers exactly one terminal result.
    async fn fetch(&self, prompt: &str) -> Result<ModelReply, FetchError>;

    fn model(&self) -> &str;

    fn set_model(&mut self, model: &str);
}

pub mod base_client;
pub mod gemini;
