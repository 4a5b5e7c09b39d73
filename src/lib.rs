//! esdump library
//!
//! This library provides the core functionality for esdump, a dump and
//! restore tool for Elasticsearch-compatible document stores. It can be
//! used as a standalone library to build backup and migration tooling.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `dump`: Scroll cursor, document stream and chunk writer pipeline
//! - `error`: Error types and handling
//! - `restore`: Chunk reader and bulk loader pipeline
//! - `store`: Remote store client and wire types
//! - `utils`: Utility functions and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use esdump::config::Config;
//! use esdump::dump::DumpCoordinator;
//! use esdump::store::HttpStoreClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = HttpStoreClient::new(&config.store.hosts, config.store_timeout())?;
//!
//!     let result = DumpCoordinator::new(&client, config.dump.clone())
//!         .execute(
//!             "books",
//!             "_doc",
//!             serde_json::json!({"query": {"match_all": {}}}),
//!             Path::new("./books_dump"),
//!         )
//!         .await?;
//!     println!("Dumped {} documents", result.documents);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod restore;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use dump::{DumpCoordinator, DumpResult};
pub use error::{EsdumpError, Result};
pub use restore::{RestoreCoordinator, RestoreResult};
pub use store::{HttpStoreClient, StoreApi};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
