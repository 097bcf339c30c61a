//! Subject property validation and normalization.
//!
//! The subject schema is stricter than the comp schema: tight bounds on
//! every numeric field, 0.5-step baths. Failures come back as field-level
//! errors; unrecognized enum text is dropped silently rather than
//! rejecting the whole input.

use crate::clock::Clock;
use crate::domain::{Coordinates, FinishLevel, PropertyCondition, PropertyType, SubjectProperty};
use serde::{Deserialize, Serialize};

/// Raw subject input as submitted by the caller, before normalization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    #[serde(default)]
    pub address: String,
    pub beds: f64,
    pub baths: f64,
    pub gla: f64,
    pub lot_size: f64,
    pub year_built: i32,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub finish_level: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One field-level validation issue
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a raw subject input and produce the normalized, immutable
/// SubjectProperty. All field errors are collected in one pass.
pub fn validate_subject(input: &SubjectInput, clock: &Clock) -> Result<SubjectProperty, Vec<FieldError>> {
    let mut errors = Vec::new();
    let current_year = clock.current_year();

    if input.address.trim().is_empty() {
        errors.push(FieldError::new("address", "Address is required"));
    }
    if input.beds.fract() != 0.0 || !(1.0..=10.0).contains(&input.beds) {
        errors.push(FieldError::new("beds", "Beds must be an integer between 1 and 10"));
    }
    if !(0.5..=10.0).contains(&input.baths) {
        errors.push(FieldError::new("baths", "Baths must be between 0.5 and 10"));
    } else if ((input.baths * 2.0) - (input.baths * 2.0).round()).abs() > 1e-9 {
        errors.push(FieldError::new("baths", "Baths must be in 0.5 increments"));
    }
    if !(100.0..=20_000.0).contains(&input.gla) {
        errors.push(FieldError::new("gla", "GLA must be between 100 and 20,000 sqft"));
    }
    if !(0.01..=100.0).contains(&input.lot_size) {
        errors.push(FieldError::new(
            "lotSize",
            "Lot size must be between 0.01 and 100 acres",
        ));
    }
    if input.year_built < 1800 || input.year_built > current_year {
        errors.push(FieldError::new(
            "yearBuilt",
            format!("Year built must be between 1800 and {current_year}"),
        ));
    }
    if let Some(coords) = &input.coordinates {
        if !(-90.0..=90.0).contains(&coords.latitude)
            || !(-180.0..=180.0).contains(&coords.longitude)
        {
            errors.push(FieldError::new("coordinates", "Coordinates out of range"));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SubjectProperty {
        address: input.address.trim().to_string(),
        beds: input.beds as u32,
        baths: input.baths,
        gla: input.gla,
        lot_size: input.lot_size,
        year_built: input.year_built,
        age: (current_year - input.year_built).max(0) as f64,
        coordinates: input.coordinates,
        distance: None,
        property_type: input
            .property_type
            .as_deref()
            .and_then(PropertyType::from_alias),
        condition: input
            .condition
            .as_deref()
            .and_then(PropertyCondition::from_alias),
        finish_level: input
            .finish_level
            .as_deref()
            .and_then(FinishLevel::from_alias),
        notes: input.notes.clone(),
    })
}
