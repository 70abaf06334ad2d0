//! # appctx-core
//!
//! Shared types for the appctx workspace: [`Row`] and [`Dataset`], the
//! [`ContextError`] taxonomy used by every library crate, and tracing setup.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{BoxError, ContextError, Result};
pub use logger::init_tracing;
pub use types::{Dataset, Row, REQUIRED_FIELDS};
