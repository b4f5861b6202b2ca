//! Pure derived-view logic over a batch of CrUX lookup results.
//!
//! Everything here is an immutable-state transformation — filter → sort →
//! summarize — with no I/O, so the report shape is testable without a server.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::UrlResult;

pub const FCP_METRIC: &str = "first_contentful_paint";
pub const LCP_METRIC: &str = "largest_contentful_paint";
pub const CLS_METRIC: &str = "cumulative_layout_shift";

/// One display row: the p75 value of each tracked metric, or `None` where
/// the metric is absent or non-numeric ("N/A" in the UI).
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub fcp: Option<f64>,
    pub lcp: Option<f64>,
    pub cls: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ReportRow {
    pub fn from_result(result: &UrlResult) -> Self {
        let metrics = result.metrics.as_ref();
        ReportRow {
            url: result.url.clone(),
            fcp: metrics.and_then(|m| p75(m, FCP_METRIC)),
            lcp: metrics.and_then(|m| p75(m, LCP_METRIC)),
            cls: metrics.and_then(|m| p75(m, CLS_METRIC)),
            error: result.error.clone(),
        }
    }

    fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Fcp => self.fcp,
            Column::Lcp => self.lcp,
            Column::Cls => self.cls,
        }
    }

    /// A row qualifies for the average only when all three values are numeric.
    fn is_complete(&self) -> bool {
        self.fcp.is_some() && self.lcp.is_some() && self.cls.is_some()
    }
}

/// Extract a metric's p75. CrUX serializes timing percentiles as JSON
/// numbers but CLS as a decimal string, so both forms parse.
fn p75(metrics: &Map<String, Value>, metric: &str) -> Option<f64> {
    match metrics.get(metric)?.get("percentiles")?.get("p75")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ── Filtering ──────────────────────────────────────────────────────────────

/// User-settable minimum thresholds, one per metric. An unset threshold
/// never excludes; the three filters compose with AND.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub fcp: Option<f64>,
    pub lcp: Option<f64>,
    pub cls: Option<f64>,
}

impl Filters {
    pub fn matches(&self, row: &ReportRow) -> bool {
        passes(row.fcp, self.fcp) && passes(row.lcp, self.lcp) && passes(row.cls, self.cls)
    }
}

fn passes(value: Option<f64>, threshold: Option<f64>) -> bool {
    match threshold {
        None => true,
        // A missing value fails any set threshold.
        Some(t) => value.is_some_and(|v| v >= t),
    }
}

// ── Sorting ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Fcp,
    Lcp,
    Cls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Single-column sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Column,
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Asc
}

impl SortState {
    /// Sort applied after each fresh search: first metric, ascending.
    pub fn initial() -> Self {
        SortState {
            column: Column::Fcp,
            direction: Direction::Asc,
        }
    }

    /// Clicking the current column flips direction; clicking a new column
    /// resets to ascending.
    pub fn toggled(self, clicked: Column) -> Self {
        if self.column == clicked {
            SortState {
                column: clicked,
                direction: self.direction.flipped(),
            }
        } else {
            SortState {
                column: clicked,
                direction: Direction::Asc,
            }
        }
    }

    /// Stable sort on the selected column. Pairs where either value is
    /// missing compare equal, so non-numeric rows keep their relative order.
    pub fn apply(&self, rows: &mut [ReportRow]) {
        let column = self.column;
        let direction = self.direction;
        rows.sort_by(|a, b| {
            let ord = match (a.value(column), b.value(column)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
    }
}

// ── View state ─────────────────────────────────────────────────────────────

/// The full presentation state for one rendered report.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    pub filters: Filters,
    pub sort: SortState,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            filters: Filters::default(),
            sort: SortState::initial(),
        }
    }
}

impl ViewState {
    /// filter → sort, consuming the unfiltered rows.
    pub fn apply(&self, rows: Vec<ReportRow>) -> Vec<ReportRow> {
        let mut kept: Vec<ReportRow> = rows
            .into_iter()
            .filter(|row| self.filters.matches(row))
            .collect();
        self.sort.apply(&mut kept);
        kept
    }
}

// ── Summary ────────────────────────────────────────────────────────────────

/// The AVERAGE row: per-metric arithmetic mean, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub fcp: f64,
    pub lcp: f64,
    pub cls: f64,
}

/// Average each metric over only the rows where all three values are
/// numeric — a row with any missing value is excluded entirely. Returns
/// `None` ("N/A") when no row qualifies. Computed over the unfiltered set.
pub fn summarize(rows: &[ReportRow]) -> Option<Summary> {
    let complete: Vec<&ReportRow> = rows.iter().filter(|row| row.is_complete()).collect();
    if complete.is_empty() {
        return None;
    }

    let n = complete.len() as f64;
    let (mut fcp, mut lcp, mut cls) = (0.0, 0.0, 0.0);
    for row in &complete {
        fcp += row.fcp.unwrap_or_default();
        lcp += row.lcp.unwrap_or_default();
        cls += row.cls.unwrap_or_default();
    }

    Some(Summary {
        fcp: round2(fcp / n),
        lcp: round2(lcp / n),
        cls: round2(cls / n),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// True when the report should show the single generic "no data" banner:
/// a non-empty result set where every row failed.
pub fn all_failed(rows: &[ReportRow]) -> bool {
    !rows.is_empty() && rows.iter().all(|row| row.error.is_some())
}
