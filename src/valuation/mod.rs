//! Valuation pipeline: comp preparation, regression, similarity scoring
//! and the subject estimate.

pub mod prepare;
pub mod regression;
pub mod similarity;
pub mod valuate;

pub use prepare::{haversine_miles, prepare_comps};
pub use regression::{compute_adjustments, detect_outliers, run_regression};
pub use similarity::{similarity_score, similarity_scores};
pub use valuate::calculate_valuation;
