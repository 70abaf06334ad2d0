//! # Dataset
//!
//! Loading app-store rows from a file and turning a row into the paragraph used
//! in prompt context.
//!
//! - [`DatasetLoader`] / [`CsvDatasetLoader`]: file → [`Dataset`](appctx_core::Dataset).
//! - [`RowFormatter`] / [`AppRowFormatter`]: [`Row`](appctx_core::Row) → text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dataset::{AppRowFormatter, CsvDatasetLoader, DatasetLoader, RowFormatter};
//! use std::path::Path;
//!
//! fn first_app() -> appctx_core::Result<String> {
//!     let data = CsvDatasetLoader::new().load(Path::new("./utils/AppStore_Data.csv"))?;
//!     match data.get(0) {
//!         Some(row) => AppRowFormatter.format(row),
//!         None => Ok(String::new()),
//!     }
//! }
//! ```

mod formatter;
mod loader;


pub use formatter::{AppRowFormatter, RowFormatter};
pub use loader::{CsvDatasetLoader, DatasetLoader, DEFAULT_DATA_PATH};
