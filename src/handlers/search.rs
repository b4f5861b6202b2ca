use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::UrlResult,
    state::AppState,
};

/// POST /api/search
///
/// Body: `{ "urls": ["https://a.example", ...] }`. Returns one result per
/// input URL, in input order, with per-URL failures captured on the row
/// rather than failing the request.
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Vec<UrlResult>>> {
    let urls = parse_urls(&body)?;
    let results = state.crux.fetch_metrics(&urls).await;
    Ok(Json(results))
}

/// Validate the request shape before any upstream call is issued. The URLs
/// themselves stay raw — duplicates and malformed strings are passed through
/// and surface as per-row provider errors.
fn parse_urls(body: &Value) -> AppResult<Vec<String>> {
    let items = body
        .get("urls")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation("urls must be an array".into()))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| AppError::Validation("urls must be an array of strings".into()))
        })
        .collect()
}
