//! Dump orchestration.
//!
//! Drives the scroll cursor, document stream and chunk writer end to
//! end: creates the dump layout, persists the schema snapshot before any
//! chunk, then pulls documents one page at a time until the scroll is
//! exhausted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::DumpConfig;
use crate::error::Result;
use crate::store::StoreApi;
use crate::utils::fs;

use super::progress::DumpProgress;
use super::streaming::{DocumentMode, DocumentStream, ScrollCursor};
use super::writer::ChunkWriter;

/// Result of a dump operation.
#[derive(Debug)]
pub struct DumpResult {
    /// Number of documents written to chunks.
    pub documents: u64,
    /// Number of chunk archives produced.
    pub chunks: u32,
    /// Time taken for the dump.
    pub elapsed_ms: u64,
}

/// Coordinator for dump operations.
pub struct DumpCoordinator<'a> {
    store: &'a dyn StoreApi,
    config: DumpConfig,
    show_progress: bool,
}

impl<'a> DumpCoordinator<'a> {
    pub fn new(store: &'a dyn StoreApi, config: DumpConfig) -> Self {
        Self {
            store,
            config,
            show_progress: false,
        }
    }

    /// Enable the interactive progress display.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Execute the dump of `index` into `dump_path`.
    ///
    /// The collection's field mapping is snapshotted to `mapping.json`
    /// before any chunk is written; a dump that exports zero documents
    /// still leaves the mapping file and an empty data directory behind.
    pub async fn execute(
        &self,
        index: &str,
        doc_type: &str,
        query: Value,
        dump_path: &Path,
    ) -> Result<DumpResult> {
        let start_time = Instant::now();
        info!("Starting dump of '{}' into {}", index, dump_path.display());

        fs::ensure_dir(dump_path)?;
        self.snapshot_mapping(index, doc_type, dump_path).await?;

        let mode = if self.config.raw {
            DocumentMode::Raw
        } else {
            DocumentMode::Normalized
        };
        let cursor = ScrollCursor::new(
            self.store,
            index,
            query,
            self.config.page_size,
            self.config.scroll_ttl.clone(),
        );
        let mut stream = DocumentStream::new(cursor, mode);
        let mut writer = ChunkWriter::create(dump_path, self.config.docs_per_chunk)?;

        let mut progress: Option<DumpProgress> = None;
        let mut exported = 0u64;
        while let Some(document) = stream.next_document().await? {
            // The total hint exists once the first page has arrived; it
            // sizes the bar and nothing else.
            let tracker = progress
                .get_or_insert_with(|| DumpProgress::new(stream.total_hint(), self.show_progress));
            writer.push(document)?;
            exported += 1;
            tracker.update(exported);
        }

        let (documents, chunks) = writer.finish()?;
        if let Some(tracker) = progress {
            tracker.finish();
        }

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Dump completed: {} documents, {} chunks, {} ms",
            documents, chunks, elapsed_ms
        );

        Ok(DumpResult {
            documents,
            chunks,
            elapsed_ms,
        })
    }

    /// Fetch the collection's field mapping and persist it verbatim.
    async fn snapshot_mapping(&self, index: &str, doc_type: &str, dump_path: &Path) -> Result<()> {
        let mapping = self.store.get_mapping(index, doc_type).await?;
        let path = dump_path.join("mapping.json");
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, &mapping)?;
        writer.flush()?;
        debug!("Wrote schema snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::ScriptedStore;
    use serde_json::json;

    fn dump_config(docs_per_chunk: usize, raw: bool) -> DumpConfig {
        DumpConfig {
            page_size: 10,
            docs_per_chunk,
            raw,
            scroll_ttl: "5m".to_string(),
        }
    }

    fn scripted_pages(count: u64, page_size: usize) -> Vec<Vec<crate::store::Hit>> {
        let hits: Vec<crate::store::Hit> = (1..=count)
            .map(|i| ScriptedStore::hit(i, json!({ "id": i })))
            .collect();
        hits.chunks(page_size).map(<[crate::store::Hit]>::to_vec).collect()
    }

    #[tokio::test]
    async fn test_dump_writes_mapping_and_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptedStore::with_pages(scripted_pages(25, 10), 25);

        let coordinator = DumpCoordinator::new(&store, dump_config(10, false));
        let result = coordinator
            .execute("books", "_doc", json!({}), dir.path())
            .await
            .unwrap();

        assert_eq!(result.documents, 25);
        assert_eq!(result.chunks, 3);

        let mapping: serde_json::Value =
            serde_json::from_reader(File::open(dir.path().join("mapping.json")).unwrap()).unwrap();
        assert!(mapping.get("properties").is_some());
    }

    #[tokio::test]
    async fn test_empty_dump_leaves_mapping_and_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptedStore::new();

        let coordinator = DumpCoordinator::new(&store, dump_config(10, false));
        let result = coordinator
            .execute("books", "_doc", json!({}), dir.path())
            .await
            .unwrap();

        assert_eq!(result.documents, 0);
        assert_eq!(result.chunks, 0);
        assert!(dir.path().join("mapping.json").is_file());
        assert_eq!(std::fs::read_dir(dir.path().join("data")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_dump_keeps_complete_chunk_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScriptedStore::with_pages(scripted_pages(10, 5), 10);
        // First page fills one chunk, then the scroll advance fails.
        store
            .fail_on_scroll_call
            .store(2, std::sync::atomic::Ordering::SeqCst);

        let coordinator = DumpCoordinator::new(&store, dump_config(5, false));
        let result = coordinator.execute("books", "_doc", json!({}), dir.path()).await;
        assert!(result.is_err());

        let archives: Vec<String> = std::fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        // A valid prefix of complete archives, nothing truncated.
        assert_eq!(archives, vec!["data_000001.zip"]);
    }
}
