use crate::providers::FetchError;
use reqwest::{Client, Response};
use serde::Serialize;

/// Thin reqwest wrapper shared by provider clients. Carries the endpoint and
/// any query parameters (the Gemini credential travels as one).
#[derive(Clone)]
pub struct HttpClient {
    endpoint: String,
    query_params: Vec<(String, String)>,
    client: Client,
}

impl HttpClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            query_params: Vec::new(),
            client: Client::new(),
        }
    }

    pub fn add_query_param(&mut self, key: &str, value: String) {
        self.query_params.push((key.to_string(), value));
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, FetchError> {
        let url = format!("{}/{}", self.endpoint, path);

        let response = self
            .client
            .post(&url)
            .query(&self.query_params)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        Ok(response)
    }
}
