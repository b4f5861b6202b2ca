use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    insights::{insights_for, UrlInsights},
    state::AppState,
    view::{all_failed, summarize, Filters, ReportRow, SortState, Summary, ViewState},
};

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub urls: Vec<String>,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub sort: Option<SortState>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// Display rows after filtering and sorting.
    pub rows: Vec<ReportRow>,
    /// The AVERAGE row, over the unfiltered result set; null when no row
    /// has all three metrics.
    pub summary: Option<Summary>,
    /// Per-URL status bands, unfiltered, error rows skipped.
    pub insights: Vec<UrlInsights>,
    /// True when every fetched row failed — the UI shows one generic
    /// banner instead of per-row detail.
    pub all_failed: bool,
}

/// POST /api/report
///
/// Fetches CrUX metrics for the requested URLs and returns the derived
/// view in one round trip: filtered and sorted display rows, the average
/// row, and heuristic insights. Omitting `sort` applies the post-search
/// default (FCP ascending).
pub async fn report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> AppResult<Json<ReportResponse>> {
    let results = state.crux.fetch_metrics(&request.urls).await;

    let fetched: Vec<ReportRow> = results.iter().map(ReportRow::from_result).collect();
    let summary = summarize(&fetched);
    let insights = insights_for(&fetched);
    let all_failed = all_failed(&fetched);

    let view = ViewState {
        filters: request.filters,
        sort: request.sort.unwrap_or_else(SortState::initial),
    };
    let rows = view.apply(fetched);

    Ok(Json(ReportResponse {
        rows,
        summary,
        insights,
        all_failed,
    }))
}
