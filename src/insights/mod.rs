//! Heuristic status bands and remediation hints for the report's
//! "Insights & Recommendations" section. Purely presentational — none of
//! this feeds back into aggregation.

use serde::Serialize;

use crate::view::ReportRow;

// Core Web Vitals classification thresholds: (good, needs-improvement).
// At or below "good" is Good, at or below the second bound is Needs
// Improvement, above it is Poor.
pub const FCP_THRESHOLDS: (f64, f64) = (1800.0, 3000.0);
pub const LCP_THRESHOLDS: (f64, f64) = (2500.0, 4000.0);
pub const CLS_THRESHOLDS: (f64, f64) = (0.1, 0.25);

const FCP_HINT: &str = "Try reducing render-blocking resources.";
const LCP_HINT: &str = "Optimize images and server response times.";
const CLS_HINT: &str = "Avoid layout shifts by setting size attributes on images and ads.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Poor,
}

pub fn classify(value: f64, thresholds: (f64, f64)) -> Band {
    let (good, needs_improvement) = thresholds;
    if value <= good {
        Band::Good
    } else if value <= needs_improvement {
        Band::NeedsImprovement
    } else {
        Band::Poor
    }
}

/// One metric's classification for one URL. `hint` is only set when the
/// band is not Good.
#[derive(Debug, Clone, Serialize)]
pub struct MetricInsight {
    pub value: f64,
    pub band: Band,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

fn insight(value: Option<f64>, thresholds: (f64, f64), hint: &'static str) -> Option<MetricInsight> {
    let value = value?;
    let band = classify(value, thresholds);
    Some(MetricInsight {
        value,
        band,
        hint: (band != Band::Good).then_some(hint),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlInsights {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcp: Option<MetricInsight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcp: Option<MetricInsight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cls: Option<MetricInsight>,
}

/// Classify every non-error row. Rows that failed upstream get no insight
/// entry at all; within a row, metrics without a numeric value are skipped.
pub fn insights_for(rows: &[ReportRow]) -> Vec<UrlInsights> {
    rows.iter()
        .filter(|row| row.error.is_none())
        .map(|row| UrlInsights {
            url: row.url.clone(),
            fcp: insight(row.fcp, FCP_THRESHOLDS, FCP_HINT),
            lcp: insight(row.lcp, LCP_THRESHOLDS, LCP_HINT),
            cls: insight(row.cls, CLS_THRESHOLDS, CLS_HINT),
        })
        .collect()
}
