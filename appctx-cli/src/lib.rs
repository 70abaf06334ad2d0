//! # appctx-cli
//!
//! Argument parsing for the `appctx` binary. Handlers live in `main.rs`.

pub mod cli;

pub use cli::{Cli, Commands};
