//! Byte-length token estimate.

use crate::TokenCounter;

pub const ESTIMATE_SCHEME: &str = "estimate";

/// Estimates the token count for a text string.
///
/// 1 token ≈ 4 bytes of English text, rounded up, with a minimum of 1. Joined
/// texts are never estimated below their parts, which is all the packing loop
/// needs from a counter.
pub fn estimate_tokens(text: &str) -> usize {
    ((text.len() as f64) / 4.0).ceil().max(1.0) as usize
}

/// [`TokenCounter`] over [`estimate_tokens`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateTokenCounter;

impl TokenCounter for EstimateTokenCounter {
    fn name(&self) -> &str {
        ESTIMATE_SCHEME
    }

    fn count(&self, text: &str) -> usize {
        estimate_tokens(text)
    }
}
