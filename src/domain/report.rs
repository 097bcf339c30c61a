//! Report aggregate and presentation-facing types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::property::{ComparableProperty, SubjectProperty};
use super::regression::{RegressionResult, ValuationResult};

/// Itemized dollar adjustments applied to one comp, one signed amount
/// per feature difference from the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAdjustments {
    pub gla: f64,
    pub beds: f64,
    pub baths: f64,
    pub lot_size: f64,
    pub age: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub total: f64,
}

/// One comp enriched for presentation in the adjustment table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportComp {
    pub original: ComparableProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub similarity_score: f64,
    pub adjustments: PropertyAdjustments,
    /// Sale price plus total adjustment
    pub adjusted_price: f64,
    pub residual: f64,
    pub is_outlier: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub gla: f64,
    pub price: f64,
    pub adjusted_price: f64,
    pub is_subject: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinePoint {
    pub gla: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceVsGla {
    pub data: Vec<PricePoint>,
    pub regression_line: Vec<LinePoint>,
}

/// Raw arrays for histogram binning; binning itself is left to the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub adjusted: Vec<f64>,
    pub unadjusted: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub adjusted_price: f64,
}

/// Presentation-ready chart series derived from pipeline output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub price_vs_gla: PriceVsGla,
    pub price_distribution: PriceDistribution,
    pub sale_price_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub comp_count: usize,
    pub model_version: String,
    pub processing_time_ms: u64,
}

/// The terminal, immutable aggregate produced by the report assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: String,
    pub subject: SubjectProperty,
    pub comps: Vec<ComparableProperty>,
    pub adjusted_comps: Vec<ReportComp>,
    pub regression: RegressionResult,
    pub valuation: ValuationResult,
    pub outliers: Vec<usize>,
    pub charts: ChartData,
    pub metadata: ReportMetadata,
}
