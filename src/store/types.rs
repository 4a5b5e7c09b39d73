//! Wire types for the remote store API.
//!
//! These mirror the JSON shapes the store uses for scrolled searches,
//! mapping retrieval and bulk writes. Unknown fields are ignored on
//! deserialization so the client stays tolerant of server-side additions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One hit record as returned by a search or scroll page.
///
/// In raw export mode the whole record, store-assigned metadata included,
/// is persisted so a later restore can replay it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub _index: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub _type: Option<String>,
    pub _id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub _score: Option<f64>,
    pub _source: Value,
}

/// Total-match count attached to the first scroll page.
///
/// Informational only: the store may report a stale or rounded value, so
/// it must never drive loop termination.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: String,
}

/// The `hits` envelope of a scroll page.
#[derive(Debug, Clone, Deserialize)]
pub struct HitsInfo {
    #[serde(default)]
    pub total: Option<TotalHits>,
    pub hits: Vec<Hit>,
}

/// One page of a scrolled search.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrollPage {
    #[serde(default)]
    pub _scroll_id: Option<String>,
    pub hits: HitsInfo,
}

impl ScrollPage {
    /// True when the page carries zero hit records.
    ///
    /// This is the authoritative end-of-scroll signal.
    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// The store's total-match count, when present.
    pub fn total_hint(&self) -> Option<u64> {
        self.hits.total.as_ref().map(|t| t.value)
    }
}

/// One write request within a bulk batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    /// Target collection for the write.
    pub index: String,
    /// Document kind label, when the store models one.
    pub doc_type: Option<String>,
    /// Store-assigned id to reuse; the store generates one when absent.
    pub id: Option<String>,
    /// The document payload.
    pub document: Value,
}

/// Response to a bulk write call.
///
/// Per-item outcomes are the store's own report; this client never
/// re-validates or retries them.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    pub took: u64,
    pub errors: bool,
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    /// Number of items the store rejected within this batch.
    pub fn failed_items(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.action.values().any(|s| s.error.is_some()))
            .count()
    }
}

/// One per-item result within a bulk response, keyed by action name.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItem {
    #[serde(flatten)]
    pub action: HashMap<String, BulkItemStatus>,
}

/// Outcome of a single bulk action.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemStatus {
    #[serde(default)]
    pub _index: Option<String>,
    #[serde(default)]
    pub _id: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

/// Error detail for a rejected bulk item.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scroll_page_deserialization() {
        let body = r#"{
            "_scroll_id": "c2Nhbjs1OzEwMDo=",
            "took": 3,
            "hits": {
                "total": {"value": 250, "relation": "eq"},
                "hits": [
                    {"_index": "books", "_type": "_doc", "_id": "1", "_score": 1.0, "_source": {"title": "Dune"}}
                ]
            }
        }"#;

        let page: ScrollPage = serde_json::from_str(body).unwrap();
        assert_eq!(page._scroll_id.as_deref(), Some("c2Nhbjs1OzEwMDo="));
        assert_eq!(page.total_hint(), Some(250));
        assert!(!page.is_empty());
        assert_eq!(page.hits.hits[0]._id, "1");
        assert_eq!(page.hits.hits[0]._source["title"], "Dune");
    }

    #[test]
    fn test_empty_page_is_authoritative() {
        let body = r#"{"_scroll_id": "abc", "hits": {"total": {"value": 99, "relation": "eq"}, "hits": []}}"#;
        let page: ScrollPage = serde_json::from_str(body).unwrap();
        // A non-zero total with zero hits still means the scroll is done.
        assert!(page.is_empty());
        assert_eq!(page.total_hint(), Some(99));
    }

    #[test]
    fn test_hit_round_trip_keeps_metadata() {
        let hit = Hit {
            _index: "books".to_string(),
            _type: Some("_doc".to_string()),
            _id: "42".to_string(),
            _score: None,
            _source: json!({"title": "Foundation"}),
        };

        let encoded = serde_json::to_value(&hit).unwrap();
        assert_eq!(encoded["_index"], "books");
        assert_eq!(encoded["_id"], "42");
        // Absent optionals stay off the wire entirely.
        assert!(encoded.get("_score").is_none());

        let decoded: Hit = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, hit);
    }

    #[test]
    fn test_bulk_response_failed_items() {
        let body = r#"{
            "took": 7,
            "errors": true,
            "items": [
                {"index": {"_index": "books", "_id": "1", "status": 201}},
                {"index": {"_index": "books", "_id": "2", "status": 400,
                           "error": {"type": "mapper_parsing_exception", "reason": "failed to parse"}}}
            ]
        }"#;

        let response: BulkResponse = serde_json::from_str(body).unwrap();
        assert!(response.errors);
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.failed_items(), 1);
    }
}
