//! Hard failures surfaced by the valuation core.
//!
//! Row-level and field-level issues are accumulated and returned as data
//! (see `ingestion::ParseOutcome` and `subject::FieldError`); only
//! pipeline-aborting conditions live here. Every variant carries a stable
//! machine-readable code so the HTTP layer can map it without string
//! matching.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Insufficient comps: minimum {minimum} required, received {received}")]
    InsufficientComps { minimum: usize, received: usize },

    #[error("Regression fit is numerically degenerate; add comps with more feature variance")]
    DegenerateFit,
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InsufficientComps { .. } => "INSUFFICIENT_COMPS",
            CoreError::DegenerateFit => "DEGENERATE_FIT",
        }
    }
}
