//! Core data types for the valuation pipeline
//! Pure data structures with no behavior

pub mod property;
pub mod regression;
pub mod report;

pub use property::*;
pub use regression::*;
pub use report::*;
