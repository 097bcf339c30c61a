//! Subject and comparable property records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Geographic coordinates (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Property types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    SingleFamily,
    Condominium,
    Townhouse,
    MultiFamily,
}

impl PropertyType {
    /// Canonicalize free text (CSV cells, form input); unrecognized text maps to None
    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "single_family" | "single family" | "sf" => Some(PropertyType::SingleFamily),
            "condominium" | "condo" => Some(PropertyType::Condominium),
            "townhouse" | "town house" => Some(PropertyType::Townhouse),
            "multi_family" | "multi family" | "duplex" => Some(PropertyType::MultiFamily),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::SingleFamily => write!(f, "single_family"),
            PropertyType::Condominium => write!(f, "condominium"),
            PropertyType::Townhouse => write!(f, "townhouse"),
            PropertyType::MultiFamily => write!(f, "multi_family"),
        }
    }
}

/// Property condition levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCondition {
    NewConstruction,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PropertyCondition {
    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "new_construction" | "new construction" | "new" => {
                Some(PropertyCondition::NewConstruction)
            }
            "excellent" => Some(PropertyCondition::Excellent),
            "good" => Some(PropertyCondition::Good),
            "fair" => Some(PropertyCondition::Fair),
            "poor" => Some(PropertyCondition::Poor),
            _ => None,
        }
    }
}

/// Interior finish levels (subject input only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishLevel {
    Luxury,
    High,
    Standard,
    Basic,
}

impl FinishLevel {
    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "luxury" => Some(FinishLevel::Luxury),
            "high" => Some(FinishLevel::High),
            "standard" => Some(FinishLevel::Standard),
            "basic" => Some(FinishLevel::Basic),
            _ => None,
        }
    }
}

/// The property being valued. Built once per request by the subject
/// normalizer; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProperty {
    pub address: String,
    pub beds: u32,
    pub baths: f64,
    /// Gross living area, sqft
    pub gla: f64,
    /// Acres
    pub lot_size: f64,
    pub year_built: i32,
    /// Derived: current year minus year built, floored at 0
    pub age: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Miles from some reference point; unset in normal valuation flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PropertyCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_level: Option<FinishLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A historical sale used as market evidence.
///
/// `age`, `distance` and `days_since_sale` are derived fields: the CSV
/// parser leaves them unset, the comp preparer fills them in on a fresh
/// copy. Parsed input is never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableProperty {
    pub address: String,
    pub sale_price: f64,
    pub sale_date: NaiveDate,
    pub gla: f64,
    pub beds: u32,
    pub baths: f64,
    pub lot_size: f64,
    pub year_built: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PropertyCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Derived: current year minus year built, floored at 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Derived: great-circle miles to the subject, when both sides have coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Derived: whole days between the sale and "today"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_since_sale: Option<f64>,
}
