//! # OpenAI Embedding Service
//!
//! Implementation of [`EmbeddingService`] over the OpenAI `/embeddings` HTTP API
//! (or any compatible endpoint via [`EmbeddingConfig::base_url`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedding::{EmbeddingConfig, EmbeddingService};
//! use openai_embedding::OpenAIEmbedding;
//!
//! async fn example() -> appctx_core::Result<()> {
//!     let service = OpenAIEmbedding::new(EmbeddingConfig::new("sk-..."))?;
//!     let vectors = service
//!         .embed_batch(&["Waze".to_string(), "Uber".to_string()])
//!         .await?;
//!     println!("dimension: {}", vectors[0].len());
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Models
//!
//! - `text-embedding-3-small`: 1536 dimensions
//! - `text-embedding-3-large`: 3072 dimensions (default)
//! - `text-embedding-ada-002`: 1536 dimensions (legacy)
//!
//! Requests are sent once. Transport failures, non-2xx statuses and malformed
//! bodies all surface as [`ContextError::Service`] with the cause in the message.

use appctx_core::{ContextError, Result};
use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAIEmbedding {
    /// Builds the service from explicit config.
    ///
    /// Fails with [`ContextError::Configuration`] when the API key is empty.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ContextError::service("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key,
            model: config.model,
        })
    }

    /// Sets a different default embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, texts, model), fields(model = %model, batch_size = texts.len()))]
    async fn embed_with_model(&self, texts: &[String], model: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            debug!("embed_batch empty input, skipping request");
            return Ok(vec![]);
        }

        info!(endpoint = %self.endpoint, "step: embedding request");

        let request = EmbeddingRequest {
            model,
            input: texts,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "embedding request failed");
                ContextError::service("embedding request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                warn!(%status, error = %e, "embedding API error body could not be read");
                ContextError::service(format!("OpenAI embeddings API error ({})", status), e)
            })?;
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!(%status, detail = %detail, "embedding API returned an error");
            return Err(ContextError::service_msg(format!(
                "OpenAI embeddings API error ({}): {}",
                status, detail
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "embedding response could not be decoded");
            ContextError::service("malformed embeddings response", e)
        })?;

        let vectors = into_ordered_vectors(parsed.data, texts.len())?;

        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        info!(count = vectors.len(), dimension, "step: embedding done");
        Ok(vectors)
    }
}

/// Orders `data` by `index` and checks it holds exactly one vector per input.
fn into_ordered_vectors(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        warn!(expected, got = data.len(), "embedding response count mismatch");
        return Err(ContextError::service_msg(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if let Some((position, item)) = data.iter().enumerate().find(|(i, d)| d.index != *i) {
        return Err(ContextError::service_msg(format!(
            "embedding response has index {} at position {}",
            item.index, position
        )));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
