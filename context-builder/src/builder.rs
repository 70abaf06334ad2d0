//! Greedy packing of formatted rows under a token budget.

use std::sync::Arc;

use appctx_core::{Dataset, Result, Row};
use chrono::Utc;
use dataset::RowFormatter;
use rand::seq::SliceRandom;
use rand::Rng;
use token_counter::TokenCounter;
use tracing::{debug, info, instrument, warn};

use crate::types::{ContextMetadata, PackedContext, CONTEXT_DELIMITER};

/// Packs dataset rows into a prompt context that stays under a token budget.
///
/// Candidates are the golden rows (in order) followed by the pool rows
/// (shuffled on request). Each candidate is formatted and the text that would
/// result from adding it is counted; the candidate is accepted while that count
/// is strictly below the budget, and packing stops at the first candidate that
/// does not fit. There is no backtracking.
///
/// The counted text is `accepted.join(delim) + delim + row`, so the first
/// candidate is measured with one leading delimiter.
///
/// # External Interactions
///
/// - **TokenCounter**: called once per candidate on the would-be joined text
///   (tiktoken BPE tables or the byte estimate, whichever was injected)
/// - **RowFormatter**: called once per candidate up to and including the first
///   rejected one; rows after the stop are never formatted
/// - **RNG**: the thread-local generator for [`build`](Self::build), or the
///   caller's for [`build_with_rng`](Self::build_with_rng)
///
/// No I/O and no shared state: one builder can serve any number of builds.
pub struct ContextBuilder {
    counter: Arc<dyn TokenCounter>,
    formatter: Arc<dyn RowFormatter>,
    delimiter: String,
    /// Re-shuffle accepted strings before joining when the build shuffles.
    reshuffle_output: bool,
}

impl ContextBuilder {
    pub fn new(counter: Arc<dyn TokenCounter>, formatter: Arc<dyn RowFormatter>) -> Self {
        Self {
            counter,
            formatter,
            delimiter: CONTEXT_DELIMITER.to_string(),
            reshuffle_output: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// When on (the default), a shuffled build also shuffles the order of the
    /// accepted strings in `text`, independently of `included`. Turn it off to
    /// keep `text` in acceptance order.
    pub fn with_reshuffle_output(mut self, reshuffle: bool) -> Self {
        self.reshuffle_output = reshuffle;
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Scheme name of the injected counter, for logs and reports.
    pub fn counter_name(&self) -> &str {
        self.counter.name()
    }

    /// Builds a context using the thread-local RNG for shuffling.
    ///
    /// Unseeded: two shuffled builds over the same input generally differ.
    pub fn build(
        &self,
        token_budget: usize,
        rows: &Dataset,
        golden: Option<&Dataset>,
        shuffle: bool,
    ) -> Result<PackedContext> {
        let mut rng = rand::rng();
        self.build_with_rng(token_budget, rows, golden, shuffle, &mut rng)
    }

    /// [`build`](Self::build) with a caller-supplied RNG.
    ///
    /// # Process
    ///
    /// 1. Shuffles the pool when `shuffle` is set (golden rows are never shuffled)
    /// 2. Walks golden rows, then pool rows, formatting each candidate
    /// 3. Counts `accepted.join(delim) + delim + candidate`; accepts while the
    ///    count is below `token_budget`, stops at the first that is not
    /// 4. With `shuffle` and `reshuffle_output`, shuffles the accepted strings
    ///    again before joining; `included` keeps acceptance order
    /// 5. Returns text, included rows (carrying the pool's header order) and metadata
    ///
    /// # Errors
    ///
    /// The first formatter error, typically `ContextError::MissingField`,
    /// aborts the build.
    #[instrument(
        skip(self, rows, golden, rng),
        fields(
            counter = self.counter.name(),
            pool = rows.len(),
            golden = golden.map_or(0, Dataset::len),
        )
    )]
    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        token_budget: usize,
        rows: &Dataset,
        golden: Option<&Dataset>,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<PackedContext> {
        let golden_rows: &[Row] = golden.map(Dataset::rows).unwrap_or(&[]);

        let mut pool: Vec<&Row> = rows.iter().collect();
        if shuffle {
            pool.shuffle(rng);
        }

        let candidate_count = golden_rows.len() + pool.len();
        let candidates = golden_rows
            .iter()
            .map(|row| (true, row))
            .chain(pool.into_iter().map(|row| (false, row)));

        let mut accepted: Vec<String> = Vec::new();
        let mut included: Vec<Row> = Vec::new();
        let mut joined = String::new();
        let mut golden_count = 0;
        let mut total_tokens = 0;

        for (position, (is_golden, row)) in candidates.enumerate() {
            let formatted = self.formatter.format(row).map_err(|e| {
                warn!(position, error = %e, "row could not be formatted");
                e
            })?;

            let tokens = self
                .counter
                .count(&format!("{}{}{}", joined, self.delimiter, formatted));

            if tokens >= token_budget {
                debug!(position, tokens, token_budget, "budget reached, stopping");
                break;
            }

            debug!(position, tokens, is_golden, "candidate accepted");
            if !accepted.is_empty() {
                joined.push_str(&self.delimiter);
            }
            joined.push_str(&formatted);
            accepted.push(formatted);
            included.push(row.clone());
            total_tokens = tokens;
            if is_golden {
                golden_count += 1;
            }
        }

        let columns = if rows.columns().is_empty() {
            golden.map(|g| g.columns().to_vec()).unwrap_or_default()
        } else {
            rows.columns().to_vec()
        };

        let text = if shuffle && self.reshuffle_output {
            accepted.shuffle(rng);
            accepted.join(&self.delimiter)
        } else {
            joined
        };

        let metadata = ContextMetadata {
            token_budget,
            total_tokens,
            row_count: included.len(),
            golden_count,
            candidate_count,
            shuffled: shuffle,
            created_at: Utc::now(),
        };

        info!(
            row_count = metadata.row_count,
            golden_count,
            total_tokens,
            candidate_count,
            "step: context built"
        );

        Ok(PackedContext {
            text,
            included: Dataset::with_columns(columns, included),
            metadata,
        })
    }
}
