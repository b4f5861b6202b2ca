use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a single CrUX lookup, echoed back in input order.
///
/// `metrics` is the raw metric map from the upstream record. An empty map
/// means the dataset has no record for the URL — that is "no data", not a
/// failure. `error` carries the upstream error body (or a message string)
/// when the lookup itself failed. In practice the two never appear together,
/// but the wire shape does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl UrlResult {
    pub fn ok(url: impl Into<String>, metrics: Map<String, Value>) -> Self {
        UrlResult {
            url: url.into(),
            metrics: Some(metrics),
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: Value) -> Self {
        UrlResult {
            url: url.into(),
            metrics: None,
            error: Some(error),
        }
    }
}
