//! Regression model configuration and output types

use serde::{Deserialize, Serialize};

/// Model variants supported by the regression engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Linear,
    Ridge,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::Linear => write!(f, "linear"),
            ModelType::Ridge => write!(f, "ridge"),
        }
    }
}

/// Regression configuration supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionConfig {
    pub model_type: ModelType,
    pub include_time_adjustment: bool,
    #[serde(default)]
    pub include_distance_adjustment: bool,
    pub min_comps: usize,
    pub max_comps: usize,
    /// Outlier cutoff in standard deviations; defaults to 2.0 when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_threshold: Option<f64>,
    /// Ridge regularization strength; ignored for the linear model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regularization: Option<f64>,
}

/// Fitted weight vector keyed by feature name.
///
/// The same vector is read three ways, and the formulas are easy to
/// conflate:
/// - as fitted slopes of the absolute model `price = intercept + Σ βf·xf`
///   (used for R² and the chart regression line),
/// - as per-comp adjustment weights over the subject-minus-comp feature
///   difference (see `valuation::regression::compute_adjustments`),
/// - as subject-evaluation weights over the subject's absolute features
///   (see `valuation::valuate`).
///
/// `distance` and `time` are present only when the corresponding
/// adjustment is enabled in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionCoefficients {
    pub intercept: f64,
    /// Price per sqft
    pub gla: f64,
    pub beds: f64,
    pub baths: f64,
    /// Price per acre
    pub lot_size: f64,
    /// Depreciation per year
    pub age: f64,
    /// Price per mile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Price per day since sale (market trend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

/// Fit quality metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionMetrics {
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// Root-mean-square of the per-comp residuals
    pub standard_error: f64,
}

/// Confidence grade: a step function of the confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceGrade {
    A,
    B,
    C,
    D,
}

impl ConfidenceGrade {
    /// Grade thresholds are fixed constants, not configuration.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            ConfidenceGrade::A
        } else if score >= 0.70 {
            ConfidenceGrade::B
        } else if score >= 0.55 {
            ConfidenceGrade::C
        } else {
            ConfidenceGrade::D
        }
    }
}

impl std::fmt::Display for ConfidenceGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceGrade::A => write!(f, "A"),
            ConfidenceGrade::B => write!(f, "B"),
            ConfidenceGrade::C => write!(f, "C"),
            ConfidenceGrade::D => write!(f, "D"),
        }
    }
}

/// Full regression engine output.
///
/// `adjusted_prices` and `residuals` are parallel arrays aligned by comp
/// index; `outliers` holds indices into the same ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResult {
    pub model_type: ModelType,
    pub coefficients: RegressionCoefficients,
    pub metrics: RegressionMetrics,
    pub adjusted_prices: Vec<f64>,
    pub residuals: Vec<f64>,
    pub confidence_grade: ConfidenceGrade,
    pub confidence_score: f64,
    pub outliers: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

/// Point estimate plus interval for the subject property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub estimated_value: f64,
    /// Approximate 90% confidence interval
    pub value_range: ValueRange,
    pub confidence_grade: ConfidenceGrade,
    pub confidence_score: f64,
    pub methodology: String,
}
