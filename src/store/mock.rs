//! Scripted in-memory store used by pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{Result, StoreError};

use super::StoreApi;
use super::types::{
    BulkItem, BulkItemStatus, BulkOperation, BulkResponse, Hit, HitsInfo, ScrollPage, TotalHits,
};

/// A store whose scroll pages and bulk outcomes are scripted up front.
///
/// Every mutating call is recorded so tests can assert on what the
/// pipeline actually asked the store to do.
pub(crate) struct ScriptedStore {
    pages: Mutex<VecDeque<Vec<Hit>>>,
    total: u64,
    mapping: Value,
    scroll_counter: Mutex<u64>,
    scroll_calls: AtomicU64,
    pub exists: AtomicBool,
    /// 1-based scroll call number (open and continue both count) that
    /// fails with a scripted store error; 0 disables failure injection.
    pub fail_on_scroll_call: AtomicU64,
    pub created: Mutex<Vec<String>>,
    pub mappings: Mutex<Vec<(String, String, Value)>>,
    pub bulk_calls: Mutex<Vec<Vec<BulkOperation>>>,
    pub cleared: Mutex<Vec<String>>,
    bulk_responses: Mutex<VecDeque<BulkResponse>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::with_pages(Vec::new(), 0)
    }

    /// Script the scroll pages a dump will see. `total` is what the store
    /// reports as its match count, which may deliberately disagree with
    /// the scripted hits.
    pub fn with_pages(pages: Vec<Vec<Hit>>, total: u64) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            total,
            mapping: json!({"properties": {"id": {"type": "long"}}}),
            scroll_counter: Mutex::new(0),
            scroll_calls: AtomicU64::new(0),
            exists: AtomicBool::new(false),
            fail_on_scroll_call: AtomicU64::new(0),
            created: Mutex::new(Vec::new()),
            mappings: Mutex::new(Vec::new()),
            bulk_calls: Mutex::new(Vec::new()),
            cleared: Mutex::new(Vec::new()),
            bulk_responses: Mutex::new(VecDeque::new()),
        }
    }

    /// Build a hit with a sequential id, the way fixtures use them.
    pub fn hit(id: u64, source: Value) -> Hit {
        Hit {
            _index: "books".to_string(),
            _type: Some("_doc".to_string()),
            _id: id.to_string(),
            _score: None,
            _source: source,
        }
    }

    /// Queue a canned bulk response; without one, bulk calls synthesize
    /// an all-success response.
    pub fn queue_bulk_response(&self, response: BulkResponse) {
        self.bulk_responses.lock().unwrap().push_back(response);
    }

    fn next_page(&self) -> ScrollPage {
        let hits = self.pages.lock().unwrap().pop_front().unwrap_or_default();
        let mut counter = self.scroll_counter.lock().unwrap();
        *counter += 1;
        ScrollPage {
            _scroll_id: Some(format!("scroll-{}", *counter)),
            hits: HitsInfo {
                total: Some(TotalHits {
                    value: self.total,
                    relation: "eq".to_string(),
                }),
                hits,
            },
        }
    }

    fn check_scroll_failure(&self) -> Result<()> {
        let call = self.scroll_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_scroll_call.load(Ordering::SeqCst) == call {
            return Err(StoreError::RequestFailed("scripted scroll failure".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl StoreApi for ScriptedStore {
    async fn open_scroll(
        &self,
        _index: &str,
        _query: &Value,
        _page_size: u32,
        _scroll_ttl: &str,
    ) -> Result<ScrollPage> {
        self.check_scroll_failure()?;
        Ok(self.next_page())
    }

    async fn continue_scroll(&self, _scroll_id: &str, _scroll_ttl: &str) -> Result<ScrollPage> {
        self.check_scroll_failure()?;
        Ok(self.next_page())
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        self.cleared.lock().unwrap().push(scroll_id.to_string());
        Ok(())
    }

    async fn index_exists(&self, _index: &str) -> Result<bool> {
        Ok(self.exists.load(Ordering::SeqCst))
    }

    async fn create_index(&self, index: &str) -> Result<()> {
        self.created.lock().unwrap().push(index.to_string());
        self.exists.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put_mapping(&self, index: &str, doc_type: &str, mapping: &Value) -> Result<()> {
        self.mappings
            .lock()
            .unwrap()
            .push((index.to_string(), doc_type.to_string(), mapping.clone()));
        Ok(())
    }

    async fn get_mapping(&self, _index: &str, _doc_type: &str) -> Result<Value> {
        Ok(self.mapping.clone())
    }

    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkResponse> {
        let canned = self.bulk_responses.lock().unwrap().pop_front();
        let response = canned.unwrap_or_else(|| BulkResponse {
            took: 1,
            errors: false,
            items: operations
                .iter()
                .map(|op| BulkItem {
                    action: HashMap::from([(
                        "index".to_string(),
                        BulkItemStatus {
                            _index: Some(op.index.clone()),
                            _id: op.id.clone(),
                            status: 201,
                            error: None,
                        },
                    )]),
                })
                .collect(),
        });
        self.bulk_calls.lock().unwrap().push(operations);
        Ok(response)
    }
}
