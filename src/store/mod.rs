//! Remote store access for dump/restore operations.
//!
//! The remote document store is consumed through the [`StoreApi`] trait:
//! an explicitly owned client handle that the pipeline components borrow
//! for the duration of one dump or restore run. The production
//! implementation is [`HttpStoreClient`]; tests substitute a scripted
//! in-memory store.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::HttpStoreClient;
pub use types::{BulkOperation, BulkResponse, Hit, HitsInfo, ScrollPage, TotalHits};

/// Operations consumed from the remote document store.
///
/// Scroll tokens returned by `open_scroll`/`continue_scroll` are opaque
/// strings with a refreshable lifetime; the caller owns their disposal
/// via `clear_scroll`. None of these operations retries internally.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Issue the initial scrolled search and return the first page.
    async fn open_scroll(
        &self,
        index: &str,
        query: &Value,
        page_size: u32,
        scroll_ttl: &str,
    ) -> Result<ScrollPage>;

    /// Advance an open scroll, refreshing its lifetime.
    async fn continue_scroll(&self, scroll_id: &str, scroll_ttl: &str) -> Result<ScrollPage>;

    /// Dispose of a scroll cursor server-side.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<()>;

    /// Check whether a collection exists.
    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create a collection.
    async fn create_index(&self, index: &str) -> Result<()>;

    /// Apply a field mapping to a collection.
    async fn put_mapping(&self, index: &str, doc_type: &str, mapping: &Value) -> Result<()>;

    /// Fetch a collection's field mapping.
    async fn get_mapping(&self, index: &str, doc_type: &str) -> Result<Value>;

    /// Submit a batch of write requests as one bulk operation.
    ///
    /// Per-item failures are reported inside the returned
    /// [`BulkResponse`], not as an `Err`.
    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkResponse>;
}
