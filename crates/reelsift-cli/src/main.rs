//! ReelSift — filters scraped social-media content into plannable text and entities.

use std::path::PathBuf;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use reelsift_core::SiftConfig;
use reelsift_ingest::ContentFilter;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;

fn print_help() {
    println!("ReelSift — filter scraped social-media content");
    println!();
    println!("Usage: reelsift [--config <file>] <input.json | ->");
    println!();
    println!("Reads one content item (JSON object) or a batch (JSON array) and");
    println!("prints the filtered result(s) as JSON. Use '-' to read stdin.");
    println!();
    println!("Options:");
    println!("  --config <file>   Load heuristics from a JSON config file");
    println!("                    (default: $REELSIFT_CONFIG, else built-in values)");
    println!("  help              Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;
    let mut source: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                let Some(path) = iter.next() else {
                    eprintln!("--config needs a file path. Use 'reelsift help' for usage.");
                    std::process::exit(1);
                };
                config_path = Some(PathBuf::from(path));
            }
            other if source.is_none() => source = Some(other.to_string()),
            other => {
                eprintln!("Unexpected argument: {}. Use 'reelsift help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    let Some(source) = source else {
        print_help();
        std::process::exit(1);
    };

    let config = match &config_path {
        Some(path) => SiftConfig::load(path),
        None => SiftConfig::from_env(),
    }
    .context("Failed to load config")?;
    let concurrency = config.max_concurrency;

    let raw = input::read_source(&source)?;
    let parsed = input::parse(&raw)?;
    let batch = parsed.is_batch();
    let items = parsed.into_items();
    info!("Processing {} item(s), {} at a time", items.len(), concurrency);

    let filter = ContentFilter::new(config);
    let provider = reelsift_infer::create_provider();

    let results: Vec<_> = stream::iter(items.iter())
        .map(|item| filter.process_with_provider(item, provider.as_ref()))
        .buffered(concurrency)
        .collect()
        .await;

    let output = if batch {
        serde_json::to_string_pretty(&results)?
    } else {
        match results.first() {
            Some(result) => serde_json::to_string_pretty(result)?,
            None => anyhow::bail!("No result produced"),
        }
    };
    println!("{}", output);
    Ok(())
}
