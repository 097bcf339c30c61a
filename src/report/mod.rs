//! Report assembly - the one orchestration point of the valuation
//! pipeline.

pub mod charts;

use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::{
    ComparableProperty, RegressionConfig, Report, ReportComp, ReportMetadata, SubjectProperty,
};
use crate::error::CoreError;
use crate::valuation::{
    calculate_valuation, compute_adjustments, prepare_comps, run_regression, similarity_scores,
};

pub use charts::generate_chart_data;

const MODEL_VERSION: &str = "1.0.0";

/// Run the full pipeline: prepare, fit, value, score, chart, assemble.
///
/// Comps beyond `max_comps` are dropped in input order before any
/// derivation runs; everything downstream sees only the working set.
pub fn generate_report(
    subject: &SubjectProperty,
    comps: &[ComparableProperty],
    config: &RegressionConfig,
    clock: &Clock,
) -> Result<Report, CoreError> {
    let started = Instant::now();

    let working = if config.max_comps > 0 && comps.len() > config.max_comps {
        &comps[..config.max_comps]
    } else {
        comps
    };

    let prepared = prepare_comps(subject, working, clock);
    let regression = run_regression(subject, &prepared, config)?;
    let valuation = calculate_valuation(subject, &regression, prepared.len());
    let similarities = similarity_scores(subject, &prepared);

    let adjusted_comps: Vec<ReportComp> = prepared
        .iter()
        .enumerate()
        .map(|(i, comp)| ReportComp {
            original: comp.clone(),
            distance: comp.distance,
            similarity_score: similarities[i],
            adjustments: compute_adjustments(subject, comp, &regression.coefficients),
            adjusted_price: regression.adjusted_prices[i],
            residual: regression.residuals[i],
            is_outlier: regression.outliers.contains(&i),
        })
        .collect();

    let charts = generate_chart_data(subject, &prepared, &regression);

    let report_id = new_report_id(clock);
    info!(
        "Generated report {} for {}: {} comps, estimate {:.0}",
        report_id,
        subject.address,
        prepared.len(),
        valuation.estimated_value
    );

    Ok(Report {
        report_id,
        subject: subject.clone(),
        outliers: regression.outliers.clone(),
        metadata: ReportMetadata {
            generated_at: clock.now(),
            comp_count: prepared.len(),
            model_version: MODEL_VERSION.to_string(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        comps: prepared,
        adjusted_comps,
        regression,
        valuation,
        charts,
    })
}

/// `report_<epoch millis>_<7-char random suffix>`
fn new_report_id(clock: &Clock) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("report_{}_{}", clock.now().timestamp_millis(), &suffix[..7])
}
