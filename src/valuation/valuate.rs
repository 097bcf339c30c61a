//! Subject valuation - evaluate the fitted model at the subject's
//! features and wrap the estimate in a confidence interval.

use crate::domain::{RegressionResult, SubjectProperty, ValuationResult, ValueRange};
use tracing::info;

/// z-multiplier for an approximate 90% confidence interval.
const INTERVAL_Z: f64 = 1.645;

/// Produce the point estimate and value range for the subject.
///
/// The absolute model is evaluated at the subject's own features. The
/// subject has no sale date, so the time term never contributes; the
/// distance term contributes only when the subject carries a distance
/// (it normally does not - distance to itself is zero by definition,
/// and a zero feature drops out anyway).
pub fn calculate_valuation(
    subject: &SubjectProperty,
    regression: &RegressionResult,
    comp_count: usize,
) -> ValuationResult {
    let c = &regression.coefficients;

    let mut estimate = c.intercept
        + subject.gla * c.gla
        + subject.beds as f64 * c.beds
        + subject.baths * c.baths
        + subject.lot_size * c.lot_size
        + subject.age * c.age;
    if let (Some(distance), Some(coefficient)) = (subject.distance, c.distance) {
        estimate += distance * coefficient;
    }
    let estimated_value = estimate.max(0.0);

    let margin = INTERVAL_Z * regression.metrics.standard_error;
    let value_range = ValueRange {
        low: (estimated_value - margin).max(0.0),
        high: estimated_value + margin,
    };

    info!(
        "Valuation: estimate={:.0}, range=[{:.0}, {:.0}], grade={}",
        estimated_value, value_range.low, value_range.high, regression.confidence_grade
    );

    ValuationResult {
        estimated_value,
        value_range,
        confidence_grade: regression.confidence_grade,
        confidence_score: regression.confidence_score,
        methodology: format!(
            "Comparable-sales {} regression over {} comps",
            regression.model_type, comp_count
        ),
    }
}
