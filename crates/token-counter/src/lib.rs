//! # Token Counter
//!
//! Turns text into a token count. Every implementation is deterministic, so a
//! context build that counts many candidate strings sees one consistent scheme.
//!
//! - [`TiktokenCounter`] (feature `tiktoken`, on by default): OpenAI BPE encodings,
//!   `cl100k_base` by default.
//! - [`EstimateTokenCounter`]: 1 token ≈ 4 bytes, no tokenizer tables needed.
//!
//! [`counter_for`] picks an implementation by scheme name and reports a
//! [`ContextError::MissingDependency`] when the scheme is not compiled in.

mod encoding;
mod estimate;
#[cfg(feature = "tiktoken")]
mod tiktoken;


use std::sync::Arc;

use appctx_core::{ContextError, Result};

pub use encoding::Encoding;
pub use estimate::{estimate_tokens, EstimateTokenCounter, ESTIMATE_SCHEME};
#[cfg(feature = "tiktoken")]
pub use tiktoken::TiktokenCounter;

/// Counts tokens of a string.
pub trait TokenCounter: Send + Sync {
    /// Scheme name, e.g. `cl100k_base` or `estimate`.
    fn name(&self) -> &str;

    fn count(&self, text: &str) -> usize;
}

/// Default scheme: the encoding used by `gpt-4` / `text-embedding-3-*`.
pub const DEFAULT_SCHEME: &str = "cl100k_base";

/// Returns a counter for `scheme` (`estimate` or a tiktoken encoding name).
pub fn counter_for(scheme: &str) -> Result<Arc<dyn TokenCounter>> {
    if scheme.eq_ignore_ascii_case(ESTIMATE_SCHEME) {
        return Ok(Arc::new(EstimateTokenCounter));
    }
    let encoding: Encoding = scheme.parse()?;
    tiktoken_counter(encoding)
}

#[cfg(feature = "tiktoken")]
fn tiktoken_counter(encoding: Encoding) -> Result<Arc<dyn TokenCounter>> {
    Ok(Arc::new(TiktokenCounter::new(encoding)?))
}

#[cfg(not(feature = "tiktoken"))]
fn tiktoken_counter(encoding: Encoding) -> Result<Arc<dyn TokenCounter>> {
    Err(ContextError::missing_dependency(
        format!("tokenizer `{}`", encoding.name()),
        "built without the `tiktoken` feature",
    ))
}

/// Unknown scheme names surface as a missing dependency: nothing can count with them.
fn unknown_scheme(scheme: &str) -> ContextError {
    ContextError::missing_dependency(
        format!("tokenizer `{}`", scheme),
        format!(
            "unknown scheme; expected `{}` or one of {}",
            ESTIMATE_SCHEME,
            Encoding::ALL
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    )
}
