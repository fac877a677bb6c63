use crate::providers::{FetchError, ModelReply, RecommendationProvider};
use async_trait::async_trait;

mod client;
mod types;

pub use client::GeminiClient;
pub use types::GenerationConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn with_endpoint(
        endpoint: String,
        api_key: String,
        model: String,
        generation_config: GenerationConfig,
    ) -> Self {
        Self {
            client: GeminiClient::new(endpoint, api_key, model, generation_config),
        }
    }
}

#[async_trait]
impl RecommendationProvider for GeminiProvider {
    async fn fetch(&self, prompt: &str) -> Result<ModelReply, FetchError> {
        self.client.generate_recommendation(prompt).await
    }

    fn model(&self) -> &str {
        &self.client.model
    }

    fn set_model(&mut self, model: &str) {
        self.client.model = model.to_string();
    }
}
