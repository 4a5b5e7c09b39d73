//! HTTP implementation of the remote store API.
//!
//! Speaks the store's REST protocol: scrolled search, index management,
//! mapping retrieval and NDJSON bulk writes. There is no retry logic in
//! this client; every failure is reported once and propagated, retry
//! policy being a caller concern.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result, StoreError, extract_error_info};

use super::types::{BulkOperation, BulkResponse, ScrollPage};
use super::StoreApi;

/// HTTP client for an Elasticsearch-compatible document store.
///
/// Holds one connection pool reused across all calls of a dump or
/// restore run. The handle is owned by the caller and passed into the
/// pipeline components; it carries no scroll state of its own.
pub struct HttpStoreClient {
    client: Client,
    base_url: String,
}

impl HttpStoreClient {
    /// Create a client for the first reachable-looking endpoint.
    ///
    /// # Arguments
    /// * `hosts` - Store endpoints as `host:port` (a scheme prefix is accepted)
    /// * `timeout` - Per-request timeout
    pub fn new(hosts: &[String], timeout: Duration) -> Result<Self> {
        let host = hosts
            .first()
            .ok_or_else(|| ConfigError::MissingField("store.hosts".to_string()))?;

        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{host}")
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::RequestFailed(format!("failed to create HTTP client: {e}")))?;

        debug!("Created store client for {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Check a response status, turning non-success answers into a
    /// structured store error. This is the single point where store
    /// failures are logged.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let info = extract_error_info(status.as_u16(), &body);
        warn!("Store request failed with status {}: {}", status, info.summary());

        Err(StoreError::UnexpectedStatus {
            status: status.as_u16(),
            reason: info.summary(),
        }
        .into())
    }

    async fn parse<T: serde::de::DeserializeOwned>(&self, response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()).into())
    }
}

#[async_trait]
impl StoreApi for HttpStoreClient {
    async fn open_scroll(
        &self,
        index: &str,
        query: &Value,
        page_size: u32,
        scroll_ttl: &str,
    ) -> Result<ScrollPage> {
        let url = format!(
            "{}/{}/_search?scroll={}&size={}",
            self.base_url, index, scroll_ttl, page_size
        );
        debug!("Opening scroll on '{}' (page size {})", index, page_size);

        let response = self.client.post(&url).json(query).send().await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn continue_scroll(&self, scroll_id: &str, scroll_ttl: &str) -> Result<ScrollPage> {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({ "scroll": scroll_ttl, "scroll_id": scroll_id });

        let response = self.client.post(&url).json(&body).send().await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({ "scroll_id": [scroll_id] });

        let response = self.client.delete(&url).json(&body).send().await?;
        self.check(response).await?;
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let url = format!("{}/{}", self.base_url, index);

        let response = self.client.head(&url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => {
                self.check(response).await?;
                Ok(false)
            }
        }
    }

    async fn create_index(&self, index: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, index);
        debug!("Creating collection '{}'", index);

        let response = self.client.put(&url).send().await?;
        self.check(response).await?;
        Ok(())
    }

    async fn put_mapping(&self, index: &str, doc_type: &str, mapping: &Value) -> Result<()> {
        let url = format!(
            "{}/{}/_mapping/{}?include_type_name=true",
            self.base_url, index, doc_type
        );
        debug!("Applying mapping to '{}/{}'", index, doc_type);

        let response = self.client.put(&url).json(mapping).send().await?;
        self.check(response).await?;
        Ok(())
    }

    async fn get_mapping(&self, index: &str, doc_type: &str) -> Result<Value> {
        let url = format!(
            "{}/{}/_mapping/{}?include_type_name=true",
            self.base_url, index, doc_type
        );

        let response = self.client.get(&url).send().await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }

    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkResponse> {
        let url = format!("{}/_bulk", self.base_url);

        // NDJSON body: one action line, one document line per operation.
        let mut body = String::new();
        for op in &operations {
            let mut action = serde_json::Map::new();
            action.insert("_index".to_string(), json!(op.index));
            if let Some(doc_type) = &op.doc_type {
                action.insert("_type".to_string(), json!(doc_type));
            }
            if let Some(id) = &op.id {
                action.insert("_id".to_string(), json!(id));
            }
            body.push_str(&json!({ "index": action }).to_string());
            body.push('\n');
            body.push_str(&op.document.to_string());
            body.push('\n');
        }

        debug!("Submitting bulk call with {} operations", operations.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let response = self.check(response).await?;
        self.parse(response).await
    }
}
