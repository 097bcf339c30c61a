//! Regression engine - fit sale price as a linear combination of comp
//! features, then derive adjustments, fit diagnostics, outliers and a
//! confidence grade.
//!
//! The engine is the authoritative minimum-comps gate: callers may check
//! earlier for friendlier errors, but the check here always runs.

use crate::domain::{
    ComparableProperty, ConfidenceGrade, ModelType, PropertyAdjustments, RegressionCoefficients,
    RegressionConfig, RegressionMetrics, RegressionResult, SubjectProperty,
};
use crate::error::CoreError;
use crate::valuation::similarity::similarity_scores;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Outlier cutoff in standard deviations when the configuration leaves
/// `outlier_threshold` unset.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.0;

/// Ridge strength when the ridge model is selected without an explicit
/// `regularization` value.
pub const DEFAULT_RIDGE_REGULARIZATION: f64 = 1.0;

const CONFIDENCE_WEIGHT_FIT: f64 = 0.5;
const CONFIDENCE_WEIGHT_SIMILARITY: f64 = 0.3;
const CONFIDENCE_WEIGHT_SPREAD: f64 = 0.2;

/// Fit the configured model over the prepared comps.
pub fn run_regression(
    subject: &SubjectProperty,
    comps: &[ComparableProperty],
    config: &RegressionConfig,
) -> Result<RegressionResult, CoreError> {
    let minimum = config.min_comps.max(1);
    if comps.len() < minimum {
        return Err(CoreError::InsufficientComps {
            minimum: config.min_comps,
            received: comps.len(),
        });
    }

    let include_distance = config.include_distance_adjustment;
    let include_time = config.include_time_adjustment;
    let n = comps.len();
    let num_features = 5 + include_distance as usize + include_time as usize;

    // Design matrix: intercept column, then features in fixed order.
    let mut x = DMatrix::<f64>::zeros(n, num_features + 1);
    let mut y = DVector::<f64>::zeros(n);
    for (i, comp) in comps.iter().enumerate() {
        x[(i, 0)] = 1.0;
        for (j, value) in feature_row(comp, include_distance, include_time)
            .into_iter()
            .enumerate()
        {
            x[(i, j + 1)] = value;
        }
        y[i] = comp.sale_price;
    }

    let regularization = match config.model_type {
        ModelType::Ridge => config
            .regularization
            .unwrap_or(DEFAULT_RIDGE_REGULARIZATION),
        ModelType::Linear => 0.0,
    };

    let beta = solve_least_squares(&x, &y, regularization).ok_or(CoreError::DegenerateFit)?;

    let coefficients = RegressionCoefficients {
        intercept: beta[0],
        gla: beta[1],
        beds: beta[2],
        baths: beta[3],
        lot_size: beta[4],
        age: beta[5],
        distance: include_distance.then(|| beta[6]),
        time: include_time.then(|| beta[6 + include_distance as usize]),
    };

    // Difference-based adjustment view of the same coefficient vector:
    // "what would this comp have sold for with the subject's features".
    let adjusted_prices: Vec<f64> = comps
        .iter()
        .map(|comp| comp.sale_price + compute_adjustments(subject, comp, &coefficients).total)
        .collect();
    let residuals: Vec<f64> = comps
        .iter()
        .zip(&adjusted_prices)
        .map(|(comp, adjusted)| comp.sale_price - adjusted)
        .collect();

    // Fit diagnostics from the absolute model.
    let predictions = &x * &beta;
    let mean_price = y.mean();
    let ss_tot: f64 = y.iter().map(|price| (price - mean_price).powi(2)).sum();
    let ss_res: f64 = (0..n).map(|i| (y[i] - predictions[i]).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let adjusted_r_squared = if n > num_features + 1 {
        let penalty = (n as f64 - 1.0) / (n as f64 - num_features as f64 - 1.0);
        (1.0 - (1.0 - r_squared) * penalty).max(0.0)
    } else {
        0.0
    };
    let standard_error =
        (residuals.iter().map(|r| r * r).sum::<f64>() / n as f64).sqrt();

    if !standard_error.is_finite() {
        return Err(CoreError::DegenerateFit);
    }

    let threshold = config.outlier_threshold.unwrap_or(DEFAULT_OUTLIER_THRESHOLD);
    let outliers = detect_outliers(&residuals, threshold);

    let similarities = similarity_scores(subject, comps);
    let mean_similarity = similarities.iter().sum::<f64>() / n as f64;
    let normalized_std_error = (standard_error / mean_price).min(1.0);
    let confidence_score = blend_confidence(r_squared, mean_similarity, normalized_std_error);
    let confidence_grade = ConfidenceGrade::from_score(confidence_score);

    debug!(
        "Fit {} model over {} comps: r2={:.3}, se={:.0}, grade={}",
        config.model_type, n, r_squared, standard_error, confidence_grade
    );

    Ok(RegressionResult {
        model_type: config.model_type,
        coefficients,
        metrics: RegressionMetrics {
            r_squared,
            adjusted_r_squared,
            standard_error,
        },
        adjusted_prices,
        residuals,
        confidence_grade,
        confidence_score,
        outliers,
    })
}

/// Itemized difference-based adjustments for one comp.
///
/// adjustment_f = (subject_f - comp_f) x coefficient_f. The subject's
/// distance and days-since-sale are both zero by construction (it is at
/// its own location, "selling" today), so those terms reduce to
/// -comp_value x coefficient, and only apply when the model carries the
/// term and the comp has the value.
pub fn compute_adjustments(
    subject: &SubjectProperty,
    comp: &ComparableProperty,
    coefficients: &RegressionCoefficients,
) -> PropertyAdjustments {
    let gla = (subject.gla - comp.gla) * coefficients.gla;
    let beds = (subject.beds as f64 - comp.beds as f64) * coefficients.beds;
    let baths = (subject.baths - comp.baths) * coefficients.baths;
    let lot_size = (subject.lot_size - comp.lot_size) * coefficients.lot_size;
    let age = (subject.age - comp.age.unwrap_or(0.0)) * coefficients.age;
    let distance = match (comp.distance, coefficients.distance) {
        (Some(value), Some(coefficient)) => Some((0.0 - value) * coefficient),
        _ => None,
    };
    let time = match (comp.days_since_sale, coefficients.time) {
        (Some(value), Some(coefficient)) => Some((0.0 - value) * coefficient),
        _ => None,
    };
    let total =
        gla + beds + baths + lot_size + age + distance.unwrap_or(0.0) + time.unwrap_or(0.0);

    PropertyAdjustments {
        gla,
        beds,
        baths,
        lot_size,
        age,
        distance,
        time,
        total,
    }
}

/// Flag comps whose residual deviates from the mean by more than
/// `threshold` population standard deviations. Detection is post-hoc
/// diagnostic only; flagged comps stay in the fit.
pub fn detect_outliers(residuals: &[f64], threshold: f64) -> Vec<usize> {
    if residuals.is_empty() {
        return Vec::new();
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let cutoff = threshold * variance.sqrt();

    residuals
        .iter()
        .enumerate()
        .filter(|&(_, r)| (r - mean).abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

/// Fixed-weight confidence blend, clamped to [0,1].
pub fn blend_confidence(r_squared: f64, mean_similarity: f64, normalized_std_error: f64) -> f64 {
    (r_squared * CONFIDENCE_WEIGHT_FIT
        + mean_similarity * CONFIDENCE_WEIGHT_SIMILARITY
        + (1.0 - normalized_std_error) * CONFIDENCE_WEIGHT_SPREAD)
        .clamp(0.0, 1.0)
}

fn feature_row(comp: &ComparableProperty, include_distance: bool, include_time: bool) -> Vec<f64> {
    let mut row = vec![
        comp.gla,
        comp.beds as f64,
        comp.baths,
        comp.lot_size,
        comp.age.unwrap_or(0.0),
    ];
    if include_distance {
        // A comp without coordinates contributes no distance term in its
        // own row.
        row.push(comp.distance.unwrap_or(0.0));
    }
    if include_time {
        row.push(comp.days_since_sale.unwrap_or(0.0));
    }
    row
}

/// Solve a (possibly ridge-regularized) least-squares problem via SVD.
///
/// Ridge is expressed as an augmented system: one extra sqrt(lambda) row
/// per non-intercept column with a zero target, which is equivalent to
/// adding lambda to the normal-equations diagonal. SVD handles tall and
/// rank-deficient design matrices without panicking; `None` means the
/// system was too ill-conditioned to solve robustly.
fn solve_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    regularization: f64,
) -> Option<DVector<f64>> {
    let p = x.ncols();
    let (design, target) = if regularization > 0.0 {
        let n = x.nrows();
        let mut design = DMatrix::<f64>::zeros(n + p - 1, p);
        design.view_mut((0, 0), (n, p)).copy_from(x);
        for j in 1..p {
            design[(n + j - 1, j)] = regularization.sqrt();
        }
        let mut target = DVector::<f64>::zeros(n + p - 1);
        target.rows_mut(0, n).copy_from(y);
        (design, target)
    } else {
        (x.clone(), y.clone())
    };

    let svd = design.svd(true, true);
    // Progressively looser tolerances for nearly collinear feature columns.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&target, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }
    None
}
