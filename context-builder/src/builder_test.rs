//! Unit tests for [`ContextBuilder`] with scripted token counts.
//!
//! Rows carry only a `name`; the formatter emits that name and the counter
//! assigns each delimiter-separated segment a fixed weight, so cumulative
//! counts are easy to reason about.

use super::*;
use appctx_core::{ContextError, Dataset, Row};
use dataset::RowFormatter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use token_counter::TokenCounter;

struct NameFormatter;

impl RowFormatter for NameFormatter {
    fn format(&self, row: &Row) -> appctx_core::Result<String> {
        row.text("name")
            .ok_or_else(|| ContextError::missing_field("name"))
    }
}

/// Sums per-segment weights; unknown segments weigh their byte length, delimiters weigh 0.
struct WeightCounter {
    weights: HashMap<String, usize>,
}

impl WeightCounter {
    fn new(weights: &[(&str, usize)]) -> Self {
        Self {
            weights: weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

impl TokenCounter for WeightCounter {
    fn name(&self) -> &str {
        "weights"
    }

    fn count(&self, text: &str) -> usize {
        text.split(CONTEXT_DELIMITER)
            .map(|segment| self.weights.get(segment).copied().unwrap_or(segment.len()))
            .sum()
    }
}

fn rows(names: &[&str]) -> Dataset {
    names.iter().map(|n| Row::new().with("name", *n)).collect()
}

fn names(dataset: &Dataset) -> Vec<String> {
    dataset.iter().filter_map(|r| r.text("name")).collect()
}

fn builder(weights: &[(&str, usize)]) -> ContextBuilder {
    ContextBuilder::new(Arc::new(WeightCounter::new(weights)), Arc::new(NameFormatter))
}

#[test]
fn stops_at_first_candidate_over_budget() {
    let b = builder(&[("A", 40), ("B", 50), ("C", 60)]);
    let ctx = b.build(100, &rows(&["A", "B", "C"]), None, false).unwrap();

    assert_eq!(names(&ctx.included), vec!["A", "B"]);
    assert_eq!(ctx.text, format!("A{}B", CONTEXT_DELIMITER));
    assert_eq!(ctx.metadata.total_tokens, 90);
    assert_eq!(ctx.metadata.row_count, 2);
    assert_eq!(ctx.metadata.candidate_count, 3);
}

#[test]
fn count_equal_to_budget_is_rejected() {
    let b = builder(&[("A", 40), ("B", 60)]);
    let ctx = b.build(100, &rows(&["A", "B"]), None, false).unwrap();
    assert_eq!(names(&ctx.included), vec!["A"]);
}

#[test]
fn no_backtracking_past_an_oversized_row() {
    let b = builder(&[("A", 10), ("BIG", 500), ("C", 1)]);
    let ctx = b.build(100, &rows(&["A", "BIG", "C"]), None, false).unwrap();
    assert_eq!(names(&ctx.included), vec!["A"]);
}

#[test]
fn empty_inputs_give_empty_context() {
    let b = builder(&[]);
    let ctx = b.build(1000, &Dataset::new(), None, false).unwrap();
    assert_eq!(ctx.clone().into_parts(), (String::new(), Dataset::new()));
    assert!(ctx.is_empty());
    assert_eq!(ctx.metadata.total_tokens, 0);

    let ctx = b.build(1000, &Dataset::new(), Some(&Dataset::new()), true).unwrap();
    assert!(ctx.text.is_empty());
    assert!(ctx.included.is_empty());
}

#[test]
fn zero_budget_accepts_nothing() {
    let b = builder(&[("A", 1)]);
    let ctx = b.build(0, &rows(&["A"]), None, false).unwrap();
    assert!(ctx.text.is_empty());
    assert!(ctx.included.is_empty());
}

#[test]
fn golden_rows_come_first_in_order() {
    let b = builder(&[("G1", 5), ("G2", 5), ("P1", 5), ("P2", 5)]);
    let golden = rows(&["G1", "G2"]);
    let ctx = b
        .build(100, &rows(&["P1", "P2"]), Some(&golden), false)
        .unwrap();

    assert_eq!(names(&ctx.included), vec!["G1", "G2", "P1", "P2"]);
    assert_eq!(ctx.metadata.golden_count, 2);
    assert_eq!(ctx.metadata.candidate_count, 4);
}

#[test]
fn golden_rows_stay_first_when_pool_is_shuffled() {
    let b = builder(&[("G1", 1), ("G2", 1)]);
    let golden = rows(&["G1", "G2"]);
    let pool = rows(&["P1", "P2", "P3", "P4", "P5"]);
    let mut rng = StdRng::seed_from_u64(7);

    let ctx = b
        .build_with_rng(1000, &pool, Some(&golden), true, &mut rng)
        .unwrap();

    let included = names(&ctx.included);
    assert_eq!(&included[..2], &["G1", "G2"]);
    let mut rest = included[2..].to_vec();
    rest.sort();
    assert_eq!(rest, vec!["P1", "P2", "P3", "P4", "P5"]);
}

#[test]
fn budget_can_cut_inside_the_golden_prefix() {
    let b = builder(&[("G1", 30), ("G2", 30), ("P1", 1)]);
    let golden = rows(&["G1", "G2"]);
    let ctx = b.build(50, &rows(&["P1"]), Some(&golden), false).unwrap();
    assert_eq!(names(&ctx.included), vec!["G1"]);
    assert_eq!(ctx.metadata.golden_count, 1);
}

#[test]
fn formatter_error_propagates() {
    let b = builder(&[]);
    let dataset: Dataset = vec![Row::new().with("name", "A"), Row::new().with("other", "x")]
        .into_iter()
        .collect();
    match b.build(1000, &dataset, None, false) {
        Err(ContextError::MissingField { field }) => assert_eq!(field, "name"),
        other => panic!("expected MissingField, got {:?}", other.map(|c| c.text)),
    }
}

#[test]
fn rows_after_the_stop_are_never_formatted() {
    // The malformed row sits after the cut, so the build succeeds.
    let b = builder(&[("A", 10), ("B", 200)]);
    let dataset: Dataset = vec![
        Row::new().with("name", "A"),
        Row::new().with("name", "B"),
        Row::new().with("other", "x"),
    ]
    .into_iter()
    .collect();
    let ctx = b.build(100, &dataset, None, false).unwrap();
    assert_eq!(names(&ctx.included), vec!["A"]);
}

#[test]
fn first_candidate_is_measured_with_leading_delimiter() {
    // Unknown segments weigh their length: "" + "A" = 1 token with the leading delimiter.
    struct LenCounter;
    impl TokenCounter for LenCounter {
        fn name(&self) -> &str {
            "len"
        }
        fn count(&self, text: &str) -> usize {
            text.len()
        }
    }
    let b = ContextBuilder::new(Arc::new(LenCounter), Arc::new(NameFormatter));
    let row_only = 1;
    let with_delimiter = CONTEXT_DELIMITER.len() + 1;

    let ctx = b.build(with_delimiter, &rows(&["A"]), None, false).unwrap();
    assert!(ctx.included.is_empty(), "budget {} must reject", with_delimiter);
    assert!(row_only < with_delimiter);

    let ctx = b.build(with_delimiter + 1, &rows(&["A"]), None, false).unwrap();
    assert_eq!(ctx.text, "A");
    assert_eq!(ctx.metadata.total_tokens, with_delimiter);
}

#[test]
fn shuffled_text_is_permutation_of_included_rows() {
    let b = builder(&[]);
    let pool = rows(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    let mut rng = StdRng::seed_from_u64(42);

    let ctx = b.build_with_rng(10_000, &pool, None, true, &mut rng).unwrap();

    let mut from_text: Vec<String> = ctx
        .segments(CONTEXT_DELIMITER)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut from_rows = names(&ctx.included);
    assert_eq!(from_text.len(), 8);
    from_text.sort();
    from_rows.sort();
    assert_eq!(from_text, from_rows);
    assert!(ctx.metadata.shuffled);
}

#[test]
fn reshuffle_off_keeps_text_in_acceptance_order() {
    let b = builder(&[]).with_reshuffle_output(false);
    let pool = rows(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    let mut rng = StdRng::seed_from_u64(3);

    let ctx = b.build_with_rng(10_000, &pool, None, true, &mut rng).unwrap();

    let from_text: Vec<String> = ctx
        .segments(CONTEXT_DELIMITER)
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(from_text, names(&ctx.included));
}

#[test]
fn same_seed_gives_same_build() {
    let b = builder(&[]);
    let pool = rows(&["a", "b", "c", "d", "e", "f"]);
    let first = b
        .build_with_rng(10_000, &pool, None, true, &mut StdRng::seed_from_u64(11))
        .unwrap();
    let second = b
        .build_with_rng(10_000, &pool, None, true, &mut StdRng::seed_from_u64(11))
        .unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.included, second.included);
}

#[test]
fn custom_delimiter_is_used_for_join_and_count() {
    let b = builder(&[("A", 1), ("B", 1)]).with_delimiter(" | ");
    assert_eq!(b.delimiter(), " | ");
    // With a custom delimiter the weight counter no longer splits, so whole strings weigh their length.
    let ctx = b.build(100, &rows(&["A", "B"]), None, false).unwrap();
    assert_eq!(ctx.text, "A | B");
    assert_eq!(ctx.segments(" | "), vec!["A", "B"]);
}

/// **Test: included rows keep the pool's header order**
#[test]
fn included_rows_carry_pool_columns() {
    let b = builder(&[]);
    let columns = vec!["name".to_string(), "extra".to_string()];
    let pool = Dataset::with_columns(columns.clone(), rows(&["a", "b"]).rows().to_vec());
    let ctx = b.build(10_000, &pool, None, false).unwrap();
    assert_eq!(ctx.included.columns(), columns.as_slice());
    assert_eq!(names(&ctx.included), vec!["a", "b"]);
}

/// **Test: a column-less pool borrows the golden set's header**
#[test]
fn included_rows_fall_back_to_golden_columns() {
    let b = builder(&[]);
    let columns = vec!["name".to_string()];
    let golden = Dataset::with_columns(columns.clone(), rows(&["g"]).rows().to_vec());
    let ctx = b.build(10_000, &rows(&["a"]), Some(&golden), false).unwrap();
    assert_eq!(ctx.included.columns(), columns.as_slice());
}

#[test]
fn counter_name_reports_injected_counter() {
    assert_eq!(builder(&[]).counter_name(), "weights");
}
