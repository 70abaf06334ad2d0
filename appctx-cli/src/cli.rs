//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dataset::DEFAULT_DATA_PATH;
use token_counter::DEFAULT_SCHEME;

#[derive(Parser, Debug)]
#[command(name = "appctx")]
#[command(about = "App-store prompt context: pack rows under a token budget, count tokens, embed text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Also append logs to this file (logs always go to stderr).
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack dataset rows into a context that stays under the token budget.
    Context {
        /// CSV file with the app columns.
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
        /// Token budget; the packed text measures strictly below it.
        #[arg(short, long)]
        budget: usize,
        /// CSV of rows always placed first, before the pool.
        #[arg(short, long)]
        golden: Option<PathBuf>,
        /// Keep the pool in file order.
        #[arg(long)]
        no_shuffle: bool,
        /// With shuffling on, keep the text in acceptance order instead of re-shuffling it.
        #[arg(long)]
        keep_order: bool,
        /// Token scheme: `estimate` or a tiktoken encoding.
        #[arg(short, long, default_value = DEFAULT_SCHEME)]
        encoding: String,
        /// Print `{text, included, metadata}` as JSON instead of the text.
        #[arg(long)]
        json: bool,
    },
    /// Count the tokens of a string.
    Count {
        #[arg(short, long, default_value = DEFAULT_SCHEME)]
        encoding: String,
        text: String,
    },
    /// Embed texts (OPENAI_API_KEY, OPENAI_BASE_URL, EMBEDDING_MODEL from env / .env).
    Embed {
        /// Overrides EMBEDDING_MODEL.
        #[arg(short, long)]
        model: Option<String>,
        /// Print whole vectors instead of their dimensions.
        #[arg(long)]
        full: bool,
        #[arg(required = true)]
        texts: Vec<String>,
    },
}
