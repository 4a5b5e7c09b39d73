use serde::{Deserialize, Serialize};

/// Structured error information extracted from a store error response body.
///
/// This is intended to be serialized to JSON and consumed by other
/// components (e.g. logging, APIs).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<u16>,
}

impl StoreErrorInfo {
    /// Convert error info to pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render a one-line reason suitable for error messages and logs.
    pub fn summary(&self) -> String {
        match (&self.error_type, &self.reason) {
            (Some(t), Some(r)) => format!("{t}: {r}"),
            (None, Some(r)) => r.clone(),
            (Some(t), None) => t.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// Extract structured information from a store error response.
///
/// The store reports errors as `{"error": {"type": ..., "reason": ...,
/// "index": ...}, "status": ...}`; older endpoints occasionally return
/// `{"error": "plain message"}`. Anything else falls back to the raw body.
pub fn extract_error_info(status: u16, body: &str) -> StoreErrorInfo {
    let mut info = StoreErrorInfo {
        status: Some(status),
        ..StoreErrorInfo::default()
    };

    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(serde_json::Value::Object(error)) => {
            info.error_type = error
                .get("type")
                .and_then(|v| v.as_str())
                .map(str::to_owned);
            info.reason = error
                .get("reason")
                .and_then(|v| v.as_str())
                .map(str::to_owned);
            info.index = error
                .get("index")
                .and_then(|v| v.as_str())
                .map(str::to_owned);
        }
        Some(serde_json::Value::String(message)) => {
            info.reason = Some(message.clone());
        }
        _ => {
            let trimmed = body.trim();
            if !trimmed.is_empty() {
                info.reason = Some(trimmed.to_string());
            }
        }
    }

    info
}
