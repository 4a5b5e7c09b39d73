//! Bulk re-ingestion of restored document batches.
//!
//! Each chunk's documents become one bulk call. Items that carry store
//! metadata (dumped in raw mode) are replayed verbatim; bare payloads
//! are wrapped with the target collection and document kind.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::store::{BulkOperation, BulkResponse, StoreApi};

/// Converts document batches into bulk write requests and submits them.
pub struct BulkLoader<'a> {
    store: &'a dyn StoreApi,
    index: String,
    doc_type: String,
}

impl<'a> BulkLoader<'a> {
    pub fn new(store: &'a dyn StoreApi, index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            store,
            index: index.into(),
            doc_type: doc_type.into(),
        }
    }

    /// Submit one batch as a single bulk call.
    ///
    /// The store's per-item failure report is returned unmodified; this
    /// component neither re-validates nor retries individual items.
    pub async fn load(&self, documents: &[Value]) -> Result<BulkResponse> {
        let operations: Vec<BulkOperation> = documents
            .iter()
            .map(|item| self.to_operation(item))
            .collect();

        debug!("Submitting bulk batch of {} write requests", operations.len());
        self.store.bulk(operations).await
    }

    /// Build the write request for one restored item.
    ///
    /// A `_source` key marks a raw hit record: its store-assigned
    /// metadata is reused verbatim. Anything else is a bare payload and
    /// gets wrapped for the target collection.
    fn to_operation(&self, item: &Value) -> BulkOperation {
        match item.get("_source") {
            Some(source) => BulkOperation {
                index: item
                    .get("_index")
                    .and_then(Value::as_str)
                    .unwrap_or(&self.index)
                    .to_string(),
                doc_type: item
                    .get("_type")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                id: item.get("_id").and_then(Value::as_str).map(str::to_owned),
                document: source.clone(),
            },
            None => BulkOperation {
                index: self.index.clone(),
                doc_type: Some(self.doc_type.clone()),
                id: None,
                document: item.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::ScriptedStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_bare_payloads_are_wrapped() {
        let store = ScriptedStore::new();
        let loader = BulkLoader::new(&store, "books", "_doc");

        let docs = vec![json!({"title": "Dune"}), json!({"title": "Foundation"})];
        let response = loader.load(&docs).await.unwrap();
        assert!(!response.errors);

        let calls = store.bulk_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let ops = &calls[0];
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].index, "books");
        assert_eq!(ops[0].doc_type.as_deref(), Some("_doc"));
        assert_eq!(ops[0].id, None);
        assert_eq!(ops[0].document["title"], "Dune");
    }

    #[tokio::test]
    async fn test_raw_hits_reuse_metadata_verbatim() {
        let store = ScriptedStore::new();
        // Restore targets a different collection than the dump came from.
        let loader = BulkLoader::new(&store, "books_copy", "_doc");

        let docs = vec![json!({
            "_index": "books",
            "_type": "novel",
            "_id": "42",
            "_source": {"title": "Hyperion"}
        })];
        loader.load(&docs).await.unwrap();

        let calls = store.bulk_calls.lock().unwrap();
        let op = &calls[0][0];
        assert_eq!(op.index, "books");
        assert_eq!(op.doc_type.as_deref(), Some("novel"));
        assert_eq!(op.id.as_deref(), Some("42"));
        assert_eq!(op.document["title"], "Hyperion");
    }

    #[tokio::test]
    async fn test_mixed_batch_goes_out_as_one_call() {
        let store = ScriptedStore::new();
        let loader = BulkLoader::new(&store, "books", "_doc");

        let docs = vec![
            json!({"title": "Dune"}),
            json!({"_index": "books", "_id": "9", "_source": {"title": "Ubik"}}),
        ];
        loader.load(&docs).await.unwrap();

        let calls = store.bulk_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[0][1].id.as_deref(), Some("9"));
    }
}
