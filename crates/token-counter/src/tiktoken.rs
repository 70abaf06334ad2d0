//! OpenAI BPE token counting via `tiktoken-rs`.

use appctx_core::{ContextError, Result};
use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::{Encoding, TokenCounter};

/// Counts ordinary BPE tokens; special-token markers in the input count as plain text.
pub struct TiktokenCounter {
    encoding: Encoding,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Loads the BPE tables for `encoding`.
    pub fn new(encoding: Encoding) -> Result<Self> {
        let bpe = match encoding {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        }
        .map_err(|e| {
            ContextError::missing_dependency(format!("tokenizer `{}`", encoding.name()), e)
        })?;
        debug!(encoding = encoding.name(), "tiktoken encoding loaded");
        Ok(Self { encoding, bpe })
    }

    /// `cl100k_base`.
    pub fn cl100k() -> Result<Self> {
        Self::new(Encoding::Cl100kBase)
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCounter for TiktokenCounter {
    fn name(&self) -> &str {
        self.encoding.name()
    }

    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
