//! # Text Embeddings
//!
//! This crate defines the embedding service interface for generating text embeddings,
//! plus the explicit [`EmbeddingConfig`] passed to implementations.

use appctx_core::{ContextError, Result};
use async_trait::async_trait;

mod config;
pub use config::{EmbeddingConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Service for generating text embeddings.
///
/// Output is one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Default model used by [`embed_batch`](Self::embed_batch) and [`embed`](Self::embed).
    fn model(&self) -> &str;

    /// Embeds `texts` with an explicit model in a single request.
    async fn embed_with_model(&self, texts: &[String], model: &str) -> Result<Vec<Vec<f32>>>;

    /// Embeds `texts` with the default model.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_with_model(texts, self.model()).await
    }

    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ContextError::service_msg("No embedding in response"))
    }
}
