use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingModel, EmbeddingProvider,
    EmbeddingProviderError, EmbeddingRequest, EmbeddingResponse,
};
use crate::infrastructure::config::EmbeddingServiceConfig;

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub input: TextInput,
    pub normalize: bool,
    pub device: String,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmbeddingsError {
    #[error("{0}")]
    RequestError(String),
    #[error("Service returned {status}: {body}")]
    StatusError { status: u16, body: String },
    #[error("Could not parse embeddings response: {0}")]
    ParseError(String),
    #[error("Giving up after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: String },
}

impl EmbeddingsError {
    /// Transport failures and 5xx answers may clear up; a bad request or a
    /// malformed body will not.
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingsError::RequestError(_) => true,
            EmbeddingsError::StatusError { status, .. } => *status >= 500,
            EmbeddingsError::ParseError(_) | EmbeddingsError::MaxRetriesExceeded { .. } => false,
        }
    }
}

/// HTTP client for the text-embedding service.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingServiceConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingServiceConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get_embeddings(
        &self,
        input: TextInput,
        model: &EmbeddingModel,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            model: model.model_id.clone(),
            input,
            normalize: model.normalize,
            device: model.device.clone(),
        };

        self.send_request(&request).await
    }

    async fn send_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let error = match self.execute_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if attempts > self.config.max_retries {
                return Err(EmbeddingsError::MaxRetriesExceeded {
                    attempts,
                    last: error.to_string(),
                });
            }

            let backoff_time = Duration::from_millis(
                (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
            );
            tracing::warn!(
                attempt = attempts,
                backoff_ms = backoff_time.as_millis() as u64,
                "embeddings request failed: {}",
                error
            );

            tokio::time::sleep(backoff_time).await;
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

/// Scales `vector` to unit length. Zero vectors are left alone.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

fn to_provider_error(error: EmbeddingsError) -> EmbeddingProviderError {
    match error {
        EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
        EmbeddingsError::StatusError { status, body } if status >= 500 => {
            EmbeddingProviderError::ServiceUnavailable(format!("{}: {}", status, body))
        }
        e @ EmbeddingsError::StatusError { .. } => EmbeddingProviderError::ApiError(e.to_string()),
        EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        e @ EmbeddingsError::MaxRetriesExceeded { .. } => {
            EmbeddingProviderError::ServiceUnavailable(e.to_string())
        }
    }
}

// Adapter to implement the EmbeddingProvider trait
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    fn finish(mut embeddings: Vec<Vec<f32>>, normalize: bool) -> Vec<Vec<f32>> {
        if normalize {
            embeddings.iter_mut().for_each(|v| l2_normalize(v));
        }
        embeddings
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        if request.text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "cannot embed empty text".to_string(),
            ));
        }

        let response = self
            .client
            .get_embeddings(TextInput::Single(request.text), &request.model)
            .await
            .map_err(to_provider_error)?;

        let embedding = Self::finish(response.embeddings, request.model.normalize)
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))?;

        Ok(EmbeddingResponse {
            embedding,
            model_id: response.model.unwrap_or(request.model.model_id),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Ok(BatchEmbeddingResponse {
                embeddings: Vec::new(),
                model_id: request.model.model_id,
            });
        }

        let response = self
            .client
            .get_embeddings(TextInput::Multiple(request.texts), &request.model)
            .await
            .map_err(to_provider_error)?;

        Ok(BatchEmbeddingResponse {
            embeddings: Self::finish(response.embeddings, request.model.normalize),
            model_id: response.model.unwrap_or(request.model.model_id),
        })
    }
}
