//! Restore orchestration.
//!
//! Validates the dump layout, loads the schema snapshot, ensures the
//! target collection exists, then replays every chunk through the bulk
//! loader in sequence order. Bulk partial failures are logged and
//! counted but do not stop the run; a hard error aborts immediately,
//! leaving already-applied chunks in place.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{RestoreError, Result};
use crate::store::StoreApi;

use super::loader::BulkLoader;
use super::reader::ChunkReader;

/// Result of a restore operation.
#[derive(Debug)]
pub struct RestoreResult {
    /// Number of documents submitted to the store.
    pub documents: u64,
    /// Number of chunk archives replayed.
    pub chunks: u32,
    /// Number of items the store rejected inside otherwise-accepted
    /// bulk calls.
    pub failed_items: u64,
    /// Time taken for the restore.
    pub elapsed_ms: u64,
}

/// Coordinator for restore operations.
pub struct RestoreCoordinator<'a> {
    store: &'a dyn StoreApi,
}

impl<'a> RestoreCoordinator<'a> {
    pub fn new(store: &'a dyn StoreApi) -> Self {
        Self { store }
    }

    /// Restore a dump directory into `index`.
    pub async fn execute(
        &self,
        dump_path: &Path,
        index: &str,
        doc_type: &str,
    ) -> Result<RestoreResult> {
        let start_time = Instant::now();
        info!("Starting restore of {} into '{}'", dump_path.display(), index);

        validate_layout(dump_path)?;
        let mapping = load_mapping(dump_path)?;
        self.ensure_collection(index, doc_type, &mapping).await?;

        let mut reader = ChunkReader::open(dump_path)?;
        let loader = BulkLoader::new(self.store, index, doc_type);

        let mut documents = 0u64;
        let mut chunks = 0u32;
        let mut failed_items = 0u64;
        while let Some((archive, batch)) = reader.next_chunk()? {
            let response = loader.load(&batch).await?;

            let failed = response.failed_items() as u64;
            if failed > 0 {
                warn!(
                    "Bulk response reported {} rejected items for {}",
                    failed,
                    archive.display()
                );
            }

            documents += batch.len() as u64;
            chunks += 1;
            failed_items += failed;
            info!("Restored {} documents from {}", batch.len(), archive.display());
        }

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Restore completed: {} documents, {} chunks, {} ms",
            documents, chunks, elapsed_ms
        );

        Ok(RestoreResult {
            documents,
            chunks,
            failed_items,
            elapsed_ms,
        })
    }

    /// Create the target collection with the snapshot mapping unless it
    /// already exists; an existing collection's mapping is never touched.
    async fn ensure_collection(&self, index: &str, doc_type: &str, mapping: &Value) -> Result<()> {
        if self.store.index_exists(index).await? {
            debug!("Collection already exists: {}", index);
            return Ok(());
        }

        self.store.create_index(index).await?;
        self.store.put_mapping(index, doc_type, mapping).await?;
        info!("Created collection '{}' with snapshot mapping", index);
        Ok(())
    }
}

/// Fail fast when the dump directory or its data subdirectory is absent.
fn validate_layout(dump_path: &Path) -> Result<()> {
    if !dump_path.exists() {
        return Err(RestoreError::MissingPath(dump_path.display().to_string()).into());
    }
    let data_dir = dump_path.join("data");
    if !data_dir.exists() {
        return Err(RestoreError::MissingPath(data_dir.display().to_string()).into());
    }
    Ok(())
}

/// Load the schema snapshot persisted at dump time.
fn load_mapping(dump_path: &Path) -> Result<Value> {
    let path = dump_path.join("mapping.json");
    if !path.exists() {
        return Err(RestoreError::MissingPath(path.display().to_string()).into());
    }
    Ok(serde_json::from_reader(BufReader::new(File::open(&path)?))?)
}
