//! # Context Builder
//!
//! Assembles a token-budgeted prompt context from dataset rows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use context_builder::ContextBuilder;
//! use dataset::{AppRowFormatter, CsvDatasetLoader, DatasetLoader};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn example() -> appctx_core::Result<()> {
//!     let apps = CsvDatasetLoader::new().load(Path::new("./utils/AppStore_Data.csv"))?;
//!     let builder = ContextBuilder::new(
//!         token_counter::counter_for("cl100k_base")?,
//!         Arc::new(AppRowFormatter),
//!     );
//!     let context = builder.build(4000, &apps, None, true)?;
//!     println!("{} apps, {} tokens", context.metadata.row_count, context.metadata.total_tokens);
//!     Ok(())
//! }
//! ```

mod builder;
mod types;

#[cfg(test)]
mod builder_test;

pub use builder::ContextBuilder;
pub use types::{ContextMetadata, PackedContext, CONTEXT_DELIMITER};
