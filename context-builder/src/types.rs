//! Packed context and its metadata.

use appctx_core::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Separator placed between formatted rows.
pub const CONTEXT_DELIMITER: &str = "\n================\n";

/// Result of one context build.
///
/// `text` is the delimiter-joined formatted rows. `included` lists the rows
/// that made it in, in acceptance order. When the build shuffled and the
/// builder re-shuffles output, the order of segments in `text` is a separate
/// permutation of the same rows.
#[derive(Debug, Clone, Serialize)]
pub struct PackedContext {
    pub text: String,
    pub included: Dataset,
    pub metadata: ContextMetadata,
}

/// Diagnostics about a build.
#[derive(Debug, Clone, Serialize)]
pub struct ContextMetadata {
    pub token_budget: usize,
    /// Count measured for the last accepted candidate; 0 when nothing fit.
    pub total_tokens: usize,
    pub row_count: usize,
    /// Included rows that came from the golden prefix.
    pub golden_count: usize,
    /// Golden plus pool rows offered to the packing loop.
    pub candidate_count: usize,
    pub shuffled: bool,
    pub created_at: DateTime<Utc>,
}

impl PackedContext {
    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }

    /// Splits `text` back into formatted rows. Empty text yields no segments.
    pub fn segments<'a>(&'a self, delimiter: &'a str) -> Vec<&'a str> {
        if self.text.is_empty() {
            Vec::new()
        } else {
            self.text.split(delimiter).collect()
        }
    }

    /// `(text, included)`, the shape notebooks unpack.
    pub fn into_parts(self) -> (String, Dataset) {
        (self.text, self.included)
    }
}
