//! Embedding configuration passed explicitly to services.

use std::env;
use std::time::Duration;

use appctx_core::{ContextError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Credentials and endpoint for an OpenAI-compatible embeddings API.
#[derive(Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Whole-request timeout of the HTTP client.
    pub timeout: Duration,
}

impl EmbeddingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `EMBEDDING_MODEL`.
    ///
    /// Only the binary calls this; library code takes the config as a value.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let mut config = Self::new(api_key);
        if let Some(url) = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            config.base_url = url;
        }
        if let Some(model) = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            config.model = model;
        }
        config.validate()?;
        Ok(config)
    }

    /// Requires a non-empty API key and base URL.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ContextError::Configuration(
                "OPENAI_API_KEY is not set; an API key is required for embeddings".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(ContextError::Configuration(
                "embedding base URL is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `{base_url}/embeddings`, tolerating a trailing slash on the base.
    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
