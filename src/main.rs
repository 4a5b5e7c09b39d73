//! esdump - dump and restore for document collections
//!
//! Snapshots a remote document collection to compressed chunk archives
//! on local disk and reloads them later, preserving schema and data
//! fidelity across the round trip.
//!
//! # Usage
//!
//! ```bash
//! # Dump a collection
//! esdump --host localhost:9200 dump books ./books_dump
//!
//! # Restore it elsewhere
//! esdump --host other:9200 restore ./books_dump books
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use esdump::cli::{CliInterface, Commands};
use esdump::dump::DumpCoordinator;
use esdump::error::Result;
use esdump::restore::RestoreCoordinator;
use esdump::store::HttpStoreClient;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Build the store client
/// 4. Run the requested dump or restore
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_completion()? {
        return Ok(());
    }

    let config = cli.config();
    let client = HttpStoreClient::new(&config.store.hosts, config.store_timeout())?;

    match &cli.args().command {
        Commands::Dump {
            collection,
            output,
            doc_type,
            query_file,
            ..
        } => {
            let query = load_query(query_file.as_deref())?;
            let result = DumpCoordinator::new(&client, config.dump.clone())
                .with_progress(!cli.args().quiet)
                .execute(collection, doc_type, query, output)
                .await?;

            println!(
                "Dumped {} documents into {} chunks ({} ms)",
                result.documents, result.chunks, result.elapsed_ms
            );
        }
        Commands::Restore {
            input,
            collection,
            doc_type,
        } => {
            let result = RestoreCoordinator::new(&client)
                .execute(input, collection, doc_type)
                .await?;

            println!(
                "Restored {} documents from {} chunks ({} ms)",
                result.documents, result.chunks, result.elapsed_ms
            );
            if result.failed_items > 0 {
                println!("Warning: the store rejected {} items", result.failed_items);
            }
        }
        Commands::Completion { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Initialize the tracing subscriber from verbosity flags; RUST_LOG
/// overrides when set.
fn initialize_logging(cli: &CliInterface) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("esdump={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load the search query body, defaulting to match-all.
fn load_query(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
        None => Ok(json!({"query": {"match_all": {}}})),
    }
}
