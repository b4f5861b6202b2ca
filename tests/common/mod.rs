// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cruxboard_server::{crux::CruxClient, handlers, state::AppState};

/// Build the application router wired to a stub CrUX endpoint.
pub fn create_test_app(crux_base: &str) -> Router {
    let crux = CruxClient::new(reqwest::Client::new(), "test-api-key", crux_base);
    let state = AppState { crux };
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/search", post(handlers::search::search))
        .route("/api/report", post(handlers::report::report))
        .with_state(state)
}

// ── Stub CrUX server ─────────────────────────────────────────────────────────

/// Spawn a local stand-in for the CrUX records:queryRecord endpoint and
/// return the base URL to point the client at. Responses are keyed on the
/// URL in the request body:
///
/// - `https://a.example` / `https://b.example` / `https://c.example` —
///   fixed records (see `stub_record`), spanning the Good / Needs
///   Improvement / Poor bands
/// - URLs containing `norecord` — 200 with no `record` field (dataset has
///   no data for the URL)
/// - URLs containing `fails` — 500 with a structured error body
/// - anything else — 404 with the CrUX-style not-found body
pub async fn spawn_stub_crux() -> String {
    let app = Router::new().route("/records/query", post(stub_query));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub CrUX listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/records/query")
}

/// Base URL that refuses TCP connections, for transport-failure tests.
/// Port 1 is reserved and nothing listens on it.
pub fn unreachable_crux_base() -> &'static str {
    "http://127.0.0.1:1/records/query"
}

async fn stub_query(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let url = body["url"].as_str().unwrap_or_default().to_string();

    if url.contains("norecord") {
        return (StatusCode::OK, Json(json!({})));
    }
    if url.contains("fails") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": { "code": 500, "message": "backendError", "status": "INTERNAL" }
            })),
        );
    }
    if let Some(record) = stub_record(&url) {
        return (StatusCode::OK, Json(record));
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": 404,
                "message": "chrome ux report data not found",
                "status": "NOT_FOUND"
            }
        })),
    )
}

/// Fixed per-URL metric values. CLS p75 is a decimal string, matching how
/// the real API serializes it.
fn stub_record(url: &str) -> Option<Value> {
    let (fcp, lcp, cls) = match url {
        "https://a.example" => (1200, 2000, "0.05"),
        "https://b.example" => (1800, 2600, "0.12"),
        "https://c.example" => (3200, 4500, "0.31"),
        _ => return None,
    };
    Some(json!({
        "record": {
            "key": { "url": url },
            "metrics": {
                "first_contentful_paint": { "percentiles": { "p75": fcp } },
                "largest_contentful_paint": { "percentiles": { "p75": lcp } },
                "cumulative_layout_shift": { "percentiles": { "p75": cls } }
            }
        }
    }))
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// Run a search against a fresh stub-backed app and return the result array.
pub async fn search(urls: &[&str]) -> Value {
    let base = spawn_stub_crux().await;
    let app = create_test_app(&base);
    let (status, body) = post_json(app, "/api/search", json!({ "urls": urls })).await;
    assert_eq!(status, StatusCode::OK, "search failed: {body}");
    body
}

/// Run a report request against a fresh stub-backed app.
pub async fn report(request: Value) -> Value {
    let base = spawn_stub_crux().await;
    let app = create_test_app(&base);
    let (status, body) = post_json(app, "/api/report", request).await;
    assert_eq!(status, StatusCode::OK, "report failed: {body}");
    body
}
