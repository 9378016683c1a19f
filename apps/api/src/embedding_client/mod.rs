/// Embedding Client — the single point of entry for embedding API calls.
///
/// Speaks the OpenAI-compatible `/embeddings` wire format
/// (`{"model", "input"}` → `{"data": [{"embedding": [...]}]}`), which most
/// hosted and self-hosted embedding servers accept.
///
/// The client makes exactly one request per call. Retry and timeout policy
/// live in `scoring::semantic::EmbeddingScorer`, which is the only caller.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("embedding backend returned an empty vector")]
    EmptyEmbedding,

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("embedding is a zero vector")]
    ZeroVector,

    #[error("embedding contains non-finite values")]
    NonFinite,
}

/// Anything that turns text into a dense vector.
///
/// `EmbeddingScorer` holds an `Arc<dyn EmbeddingBackend>` so tests can swap in
/// deterministic fakes without a network.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingClient {
    /// `request_timeout` is a transport-level ceiling; the scorer applies its
    /// own per-attempt timeout on top.
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        request_timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingBackend for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let embedding = parse_embedding(&body)?;

        debug!(
            model = %self.model,
            dimensions = embedding.len(),
            input_chars = text.len(),
            "Embedding call succeeded"
        );

        Ok(embedding)
    }
}

/// Pulls the first embedding out of an `/embeddings` response body.
fn parse_embedding(body: &str) -> Result<Vec<f32>, EmbeddingError> {
    let response: EmbeddingResponse = serde_json::from_str(body)?;
    let embedding = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .unwrap_or_default();
    if embedding.is_empty() {
        return Err(EmbeddingError::EmptyEmbedding);
    }
    Ok(embedding)
}
