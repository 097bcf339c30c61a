//! CSV ingestion - flexible-header comp parsing with per-row error isolation

pub mod columns;
pub mod parse;

pub use parse::{parse_csv, validate_comp, ParseOutcome};
