//! Streaming abstractions for dump operations.
//!
//! This module wraps the store's scrolling search protocol into a
//! pull-based page sequence, and flattens those pages into a lazy
//! sequence of documents without buffering more than one page.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{Hit, ScrollPage, StoreApi};

/// Export shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMode {
    /// Yield only each hit's source payload.
    Normalized,
    /// Yield the full hit record, store-assigned metadata included, so a
    /// restore can replay it verbatim.
    Raw,
}

/// One exported document.
///
/// The raw/normalized distinction is carried in the type rather than a
/// flag: chunks serialize either bare payloads or full hit records.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Document {
    /// A hit's source payload.
    Payload(Value),
    /// A full hit record with store metadata.
    Raw(Hit),
}

/// A single forward pass over the documents matching a query.
///
/// Produces a lazy, finite sequence of pages representing the collection
/// as of the moment the cursor was opened. Not restartable once
/// exhausted; a fresh cursor issues a new scroll. The cursor token is
/// owned here exclusively and cleared server-side on exhaustion.
pub struct ScrollCursor<'a> {
    store: &'a dyn StoreApi,
    index: String,
    query: Value,
    page_size: u32,
    scroll_ttl: String,
    scroll_id: Option<String>,
    total_hint: Option<u64>,
    pages_fetched: u64,
    exhausted: bool,
}

impl<'a> ScrollCursor<'a> {
    /// Create a cursor; the initial search is issued lazily on the first
    /// `next_page` call.
    pub fn new(
        store: &'a dyn StoreApi,
        index: impl Into<String>,
        query: Value,
        page_size: u32,
        scroll_ttl: impl Into<String>,
    ) -> Self {
        Self {
            store,
            index: index.into(),
            query,
            page_size,
            scroll_ttl: scroll_ttl.into(),
            scroll_id: None,
            total_hint: None,
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// The store's reported total-match count, known after the first
    /// page. Informational only; it never decides when to stop.
    pub fn total_hint(&self) -> Option<u64> {
        self.total_hint
    }

    /// Fetch the next non-empty page, or `None` once the scroll is done.
    ///
    /// Termination is decided solely by the returned page carrying zero
    /// hit records; the total reported at open time may be stale against
    /// a live collection.
    pub async fn next_page(&mut self) -> Result<Option<ScrollPage>> {
        if self.exhausted {
            return Ok(None);
        }

        let fetched = match &self.scroll_id {
            None => {
                self.store
                    .open_scroll(&self.index, &self.query, self.page_size, &self.scroll_ttl)
                    .await
            }
            Some(id) => self.store.continue_scroll(id, &self.scroll_ttl).await,
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                // Drop the cursor so a failed scroll is not advanced again.
                self.exhausted = true;
                self.scroll_id = None;
                warn!("Scroll failed after {} pages: {}", self.pages_fetched, e);
                return Err(e);
            }
        };

        if self.scroll_id.is_none() {
            self.total_hint = page.total_hint();
        }
        if let Some(id) = &page._scroll_id {
            self.scroll_id = Some(id.clone());
        }

        if page.is_empty() {
            debug!("Scroll exhausted after {} pages", self.pages_fetched);
            self.exhausted = true;
            self.discard().await;
            return Ok(None);
        }

        self.pages_fetched += 1;
        Ok(Some(page))
    }

    /// Best-effort server-side disposal of the cursor; the token expires
    /// by TTL regardless.
    async fn discard(&mut self) {
        if let Some(id) = self.scroll_id.take() {
            if let Err(e) = self.store.clear_scroll(&id).await {
                debug!("Failed to clear scroll cursor: {}", e);
            }
        }
    }
}

/// Lazy document sequence over a [`ScrollCursor`].
///
/// Buffers at most the current page beyond what the cursor holds.
pub struct DocumentStream<'a> {
    cursor: ScrollCursor<'a>,
    mode: DocumentMode,
    page: std::vec::IntoIter<Hit>,
    yielded: u64,
}

impl<'a> DocumentStream<'a> {
    pub fn new(cursor: ScrollCursor<'a>, mode: DocumentMode) -> Self {
        Self {
            cursor,
            mode,
            page: Vec::new().into_iter(),
            yielded: 0,
        }
    }

    /// The cursor's informational total, for progress display.
    pub fn total_hint(&self) -> Option<u64> {
        self.cursor.total_hint()
    }

    /// Yield the next document, pulling a fresh page when the current
    /// one is drained. Errors are logged and re-raised, never swallowed.
    pub async fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            if let Some(hit) = self.page.next() {
                self.yielded += 1;
                let document = match self.mode {
                    DocumentMode::Normalized => Document::Payload(hit._source),
                    DocumentMode::Raw => Document::Raw(hit),
                };
                return Ok(Some(document));
            }

            match self.cursor.next_page().await {
                Ok(Some(page)) => {
                    self.page = page.hits.hits.into_iter();
                }
                Ok(None) => {
                    debug!("Document stream exhausted after {} documents", self.yielded);
                    return Ok(None);
                }
                Err(e) => {
                    warn!("Document stream failed after {} documents: {}", self.yielded, e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::ScriptedStore;
    use serde_json::json;

    fn pages_of(ids: std::ops::Range<u64>, page_size: usize) -> Vec<Vec<Hit>> {
        let hits: Vec<Hit> = ids.map(|i| ScriptedStore::hit(i, json!({ "id": i }))).collect();
        hits.chunks(page_size).map(<[Hit]>::to_vec).collect()
    }

    #[tokio::test]
    async fn test_termination_ignores_stale_total() {
        // One page of three hits, but the store claims seven matches.
        let store = ScriptedStore::with_pages(pages_of(1..4, 3), 7);
        let mut cursor = ScrollCursor::new(&store, "books", json!({}), 3, "5m");

        let first = cursor.next_page().await.unwrap();
        assert_eq!(first.unwrap().hits.hits.len(), 3);

        // Second page is empty; the stale total must not keep us looping.
        assert!(cursor.next_page().await.unwrap().is_none());
        assert!(cursor.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cursor_cleared_on_exhaustion() {
        let store = ScriptedStore::with_pages(pages_of(1..3, 2), 2);
        let mut cursor = ScrollCursor::new(&store, "books", json!({}), 2, "5m");

        while cursor.next_page().await.unwrap().is_some() {}

        let cleared = store.cleared.lock().unwrap();
        assert_eq!(cleared.len(), 1);
    }

    #[tokio::test]
    async fn test_total_hint_recorded_from_first_page() {
        let store = ScriptedStore::with_pages(pages_of(1..3, 2), 250);
        let mut cursor = ScrollCursor::new(&store, "books", json!({}), 2, "5m");

        assert_eq!(cursor.total_hint(), None);
        cursor.next_page().await.unwrap();
        assert_eq!(cursor.total_hint(), Some(250));
    }

    #[tokio::test]
    async fn test_stream_preserves_order() {
        let store = ScriptedStore::with_pages(pages_of(1..251, 100), 250);
        let cursor = ScrollCursor::new(&store, "books", json!({}), 100, "5m");
        let mut stream = DocumentStream::new(cursor, DocumentMode::Normalized);

        let mut seen = Vec::new();
        while let Some(doc) = stream.next_document().await.unwrap() {
            match doc {
                Document::Payload(value) => seen.push(value["id"].as_u64().unwrap()),
                Document::Raw(_) => panic!("normalized stream yielded a raw hit"),
            }
        }

        let expected: Vec<u64> = (1..251).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_raw_mode_keeps_metadata() {
        let store = ScriptedStore::with_pages(pages_of(1..2, 1), 1);
        let cursor = ScrollCursor::new(&store, "books", json!({}), 1, "5m");
        let mut stream = DocumentStream::new(cursor, DocumentMode::Raw);

        match stream.next_document().await.unwrap() {
            Some(Document::Raw(hit)) => {
                assert_eq!(hit._index, "books");
                assert_eq!(hit._id, "1");
                assert_eq!(hit._source["id"], 1);
            }
            other => panic!("expected raw hit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_propagates_store_errors() {
        let store = ScriptedStore::with_pages(pages_of(1..3, 1), 2);
        store
            .fail_on_scroll_call
            .store(1, std::sync::atomic::Ordering::SeqCst);
        let cursor = ScrollCursor::new(&store, "books", json!({}), 1, "5m");
        let mut stream = DocumentStream::new(cursor, DocumentMode::Normalized);

        assert!(stream.next_document().await.is_err());
    }

    #[tokio::test]
    async fn test_exhausted_cursor_stays_exhausted_after_error() {
        let store = ScriptedStore::with_pages(pages_of(1..5, 2), 4);
        store
            .fail_on_scroll_call
            .store(2, std::sync::atomic::Ordering::SeqCst);
        let mut cursor = ScrollCursor::new(&store, "books", json!({}), 2, "5m");

        cursor.next_page().await.unwrap();
        assert!(cursor.next_page().await.is_err());

        // A failed cursor does not resume, even though pages remain scripted.
        assert!(cursor.next_page().await.unwrap().is_none());
    }
}
