use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::{FetchError, ModelReply};

#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    generation_config: GenerationConfig,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        generation_config: GenerationConfig,
    ) -> Self {
        let mut client = HttpClient::new(base_url);

        // Gemini authenticates via query param rather than a header
        client.add_query_param("key", api_key);

        Self {
            model,
            generation_config,
            client,
        }
    }

    pub async fn generate_recommendation(&self, prompt: &str) -> Result<ModelReply, FetchError> {
        let payload = self.build_payload(prompt);
        let response = self
            .client
            .post(
                &format!("v1beta/models/{}:generateContent", self.model),
                &payload,
            )
            .await?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::from)?;

        tracing::debug!(model = %self.model, status = %status, "generateContent returned");

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => FetchError::Api {
                    code: envelope.error.code,
                    message: envelope.error.message,
                },
                // Non-2xx body that is not the documented envelope: keep the
                // HTTP status and a snippet so the user still sees something.
                Err(_) => FetchError::Api {
                    code: status.as_u16(),
                    message: snippet(&body),
                },
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("unrecognized response shape: {}", e)))?;

        Ok(interpret(parsed))
    }

    fn build_payload(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self.generation_config,
        }
    }
}

/// Maps a well-formed success envelope onto the reply taxonomy. Empty or
/// missing candidate text falls through to the finish reason; a block reason
/// only matters when no candidate came back at all.
fn interpret(response: GeminiResponse) -> ModelReply {
    if let Some(candidate) = response.candidates.into_iter().next() {
        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if !text.is_empty() {
            return ModelReply::Recommendation(text);
        }

        return match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => ModelReply::Truncated,
            Some("SAFETY") => ModelReply::SafetyBlocked,
            other => ModelReply::Empty(other.unwrap_or_default().to_string()),
        };
    }

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return ModelReply::Blocked(reason);
    }

    ModelReply::Empty(String::new())
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
