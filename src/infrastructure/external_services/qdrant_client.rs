use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::vector_store::{
    ChunkPayload, ScoredChunk, VectorPoint, VectorStore, VectorStoreError,
};

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    points: Vec<PointBody<'a>>,
}

#[derive(Serialize)]
struct PointBody<'a> {
    id: String,
    vector: &'a [f32],
    payload: &'a ChunkPayload,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    score: f32,
    payload: Option<ChunkPayload>,
}

/// Qdrant over its REST interface.
#[derive(Debug, Clone)]
pub struct QdrantVectorStore {
    client: Client,
    base_url: String,
}

impl QdrantVectorStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    async fn check(
        response: Result<Response, ReqwestError>,
        collection: &str,
    ) -> Result<Response, VectorStoreError> {
        let response =
            response.map_err(|e| VectorStoreError::NetworkError(e.without_url().to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(VectorStoreError::CollectionNotFound(
                collection.to_string(),
            )),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(VectorStoreError::ApiError(format!("{}: {}", s, body)))
            }
        }
    }
}

fn validate_collection(collection: &str) -> Result<(), VectorStoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(VectorStoreError::InvalidInput(format!(
            "invalid collection name {:?}",
            collection
        )))
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn recreate_collection(
        &self,
        collection: &str,
        dimension: usize,
    ) -> Result<(), VectorStoreError> {
        validate_collection(collection)?;
        if dimension == 0 {
            return Err(VectorStoreError::InvalidInput(
                "vector dimension must be positive".to_string(),
            ));
        }

        let url = self.collection_url(collection);

        // Missing collections are fine here; anything else is not.
        match Self::check(self.client.delete(&url).send().await, collection).await {
            Ok(_) | Err(VectorStoreError::CollectionNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let body = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimension,
                distance: "Cosine",
            },
        };
        Self::check(self.client.put(&url).json(&body).send().await, collection).await?;

        tracing::info!(collection, dimension, "recreated vector collection");
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> Result<usize, VectorStoreError> {
        validate_collection(collection)?;
        if points.is_empty() {
            return Ok(0);
        }

        let body = UpsertRequest {
            points: points
                .iter()
                .map(|p| PointBody {
                    id: p.id.to_string(),
                    vector: &p.vector,
                    payload: &p.payload,
                })
                .collect(),
        };

        let url = format!("{}/points?wait=true", self.collection_url(collection));
        Self::check(self.client.put(&url).json(&body).send().await, collection).await?;

        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        validate_collection(collection)?;

        let body = SearchRequest {
            vector,
            limit: limit.max(1),
            with_payload: true,
        };

        let url = format!("{}/points/search", self.collection_url(collection));
        let response =
            Self::check(self.client.post(&url).json(&body).send().await, collection).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::ApiError(format!("bad search response: {}", e)))?;

        Ok(parsed
            .result
            .into_iter()
            .filter_map(|hit| {
                hit.payload.map(|payload| ScoredChunk {
                    score: hit.score,
                    payload,
                })
            })
            .collect())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
