//! ClearValue backend: a comparable-sales valuation engine.
//!
//! The pipeline runs in stages: CSV ingestion, subject validation, comp
//! preparation (distance, recency, age), regression fit, adjustment and
//! similarity scoring, subject valuation, chart projection, report
//! assembly. Everything is usable as a library; the `api-server` binary
//! only wires HTTP routes onto these modules.

pub mod clock;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod ingestion;
pub mod report;
pub mod subject;
pub mod valuation;
