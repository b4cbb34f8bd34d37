use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::language_model::{
    GenerationRequest, LanguageModel, LanguageModelError,
};
use crate::infrastructure::config::LanguageModelConfig;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Non-streaming completions from a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaLanguageModel {
    client: Client,
    base_url: String,
}

impl OllamaLanguageModel {
    pub fn new(config: &LanguageModelConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaLanguageModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError> {
        let body = GenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LanguageModelError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LanguageModelError::ApiError(format!("{}: {}", status, text)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LanguageModelError::ApiError(e.to_string()))?;

        if parsed.response.trim().is_empty() {
            return Err(LanguageModelError::EmptyCompletion(request.model));
        }

        tracing::debug!(model = %request.model, chars = parsed.response.len(), "completion received");
        Ok(parsed.response)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
