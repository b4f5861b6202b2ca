use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client as ReqwestClient;
use serde_json::{json, Map, Value};

use crate::models::UrlResult;

/// Google's CrUX query endpoint. Overridable via `CRUX_API_BASE` so tests
/// can point the client at a local stub.
pub const DEFAULT_API_BASE: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";

/// Client for the Chrome UX Report API.
///
/// `fetch_metrics` is the batch entry point: one concurrent lookup per input
/// URL, per-URL failures captured on the row, results in input order.
#[derive(Clone)]
pub struct CruxClient {
    http: ReqwestClient,
    api_key: Arc<str>,
    api_base: Arc<str>,
}

impl CruxClient {
    pub fn new(http: ReqwestClient, api_key: &str, api_base: &str) -> Self {
        CruxClient {
            http,
            api_key: Arc::from(api_key),
            api_base: Arc::from(api_base),
        }
    }

    /// Fan out one CrUX lookup per URL and collect every outcome.
    ///
    /// The returned vector has the same length and order as `urls` — a
    /// failing lookup produces an error row in its slot and never aborts or
    /// delays the others. No retries, no concurrency cap, no timeout beyond
    /// the transport's own behavior.
    pub async fn fetch_metrics(&self, urls: &[String]) -> Vec<UrlResult> {
        join_all(urls.iter().map(|url| self.query_record(url))).await
    }

    /// Look up a single URL, folding any failure into the result row.
    async fn query_record(&self, url: &str) -> UrlResult {
        match self.try_query(url).await {
            Ok(metrics) => UrlResult::ok(url, metrics),
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "CrUX lookup failed");
                UrlResult::failed(url, error)
            }
        }
    }

    /// POST `{ "url": ... }` to the records:queryRecord endpoint and extract
    /// the metric map. Errors carry the provider's structured error body when
    /// one was returned, otherwise a message string.
    async fn try_query(&self, url: &str) -> Result<Map<String, Value>, Value> {
        let endpoint = format!(
            "{}?key={}",
            self.api_base,
            urlencoding::encode(&self.api_key)
        );

        let response = self
            .http
            .post(&endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| Value::String(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match response.json::<Value>().await {
                Ok(body) => body,
                Err(_) => Value::String(format!("CrUX API returned status {status}")),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Value::String(e.to_string()))?;
        Ok(metrics_from_response(&body))
    }
}

/// Pull `record.metrics` out of a successful query response.
///
/// A response without a `record` (or without `metrics` inside it) means the
/// dataset has no data for the URL; that maps to an empty metric map, not an
/// error.
pub fn metrics_from_response(body: &Value) -> Map<String, Value> {
    body.get("record")
        .and_then(|record| record.get("metrics"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
