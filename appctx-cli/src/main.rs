//! appctx CLI: pack app rows into a token-budgeted context, count tokens, embed text.
//! Config from env (`.env` loaded first) and CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use appctx_cli::{Cli, Commands};
use appctx_core::init_tracing;
use clap::Parser;
use context_builder::ContextBuilder;
use dataset::{AppRowFormatter, CsvDatasetLoader, DatasetLoader};
use embedding::{EmbeddingConfig, EmbeddingService};
use openai_embedding::OpenAIEmbedding;
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Context {
            data,
            budget,
            golden,
            no_shuffle,
            keep_order,
            encoding,
            json,
        } => handle_context(ContextArgs {
            data,
            budget,
            golden,
            shuffle: !no_shuffle,
            reshuffle_output: !keep_order,
            encoding,
            json,
        }),
        Commands::Count { encoding, text } => handle_count(&encoding, &text),
        Commands::Embed { model, full, texts } => handle_embed(model, full, texts).await,
    }
}

struct ContextArgs {
    data: std::path::PathBuf,
    budget: usize,
    golden: Option<std::path::PathBuf>,
    shuffle: bool,
    reshuffle_output: bool,
    encoding: String,
    json: bool,
}

/// Loads the pool (and golden rows), packs them, prints text or JSON.
fn handle_context(args: ContextArgs) -> Result<()> {
    let loader = CsvDatasetLoader::new();
    let rows = loader
        .load(&args.data)
        .with_context(|| format!("Load dataset {}", args.data.display()))?;
    let golden = match &args.golden {
        Some(path) => Some(
            loader
                .load(path)
                .with_context(|| format!("Load golden dataset {}", path.display()))?,
        ),
        None => None,
    };

    let counter = token_counter::counter_for(&args.encoding)
        .with_context(|| format!("Select token counter `{}`", args.encoding))?;
    let builder = ContextBuilder::new(counter, Arc::new(AppRowFormatter))
        .with_reshuffle_output(args.reshuffle_output);

    let context = builder.build(args.budget, &rows, golden.as_ref(), args.shuffle)?;
    info!(
        rows = context.metadata.row_count,
        tokens = context.metadata.total_tokens,
        counter = builder.counter_name(),
        "context ready"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else {
        println!("{}", context.text);
    }
    Ok(())
}

fn handle_count(encoding: &str, text: &str) -> Result<()> {
    let counter = token_counter::counter_for(encoding)
        .with_context(|| format!("Select token counter `{}`", encoding))?;
    println!("{}", counter.count(text));
    Ok(())
}

/// Embeds `texts` and prints one JSON line per input.
async fn handle_embed(model: Option<String>, full: bool, texts: Vec<String>) -> Result<()> {
    let mut config = EmbeddingConfig::from_env()
        .context("Load embedding config from .env (OPENAI_API_KEY, OPENAI_BASE_URL, EMBEDDING_MODEL)")?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let service = OpenAIEmbedding::new(config)?;

    let vectors = service.embed_batch(&texts).await?;
    for (index, vector) in vectors.iter().enumerate() {
        let line = if full {
            json!({"index": index, "dimension": vector.len(), "embedding": vector})
        } else {
            json!({"index": index, "dimension": vector.len()})
        };
        println!("{}", line);
    }
    Ok(())
}
