//! Header alias tables for flexible CSV column matching.
//!
//! MLS, Cloud CMA and RPR exports label the same columns differently.
//! Matching is case-insensitive and whitespace-trimmed exact match against
//! these lists; the first alias that hits a header wins, in list order.
//! No fuzzy matching.

use csv::StringRecord;

pub const ADDRESS: &[&str] = &["address", "property address", "property_address"];

pub const SALE_PRICE: &[&str] = &[
    "saleprice",
    "sale price",
    "sale_price",
    "sold price",
    "sold_price",
    "soldprice",
    "price",
];

pub const SALE_DATE: &[&str] = &[
    "saledate",
    "sale date",
    "sale_date",
    "close date",
    "close_date",
    "closedate",
    "sold date",
    "sold_date",
];

pub const GLA: &[&str] = &[
    "gla",
    "square feet",
    "square_feet",
    "squarefeet",
    "living area",
    "living_area",
    "livingarea",
    "sqft",
];

pub const BEDS: &[&str] = &["beds", "bedrooms", "bed"];

pub const BATHS: &[&str] = &["baths", "bathrooms", "bath"];

pub const YEAR_BUILT: &[&str] = &["yearbuilt", "year built", "year_built", "year"];

pub const LOT_SIZE: &[&str] = &[
    "lotsize",
    "lot size",
    "lot_size",
    "lot size (acres)",
    "lot_size_(acres)",
    "lot acres",
    "lot_acres",
    "lotacres",
    "acres",
];

pub const LATITUDE: &[&str] = &["latitude", "lat"];

pub const LONGITUDE: &[&str] = &["longitude", "lng", "lon"];

pub const PROPERTY_TYPE: &[&str] = &["propertytype", "property type", "property_type", "type"];

pub const CONDITION: &[&str] = &["condition", "cond"];

/// Resolved header index per logical field. A missing column means the
/// field is treated as absent for every row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pub address: Option<usize>,
    pub sale_price: Option<usize>,
    pub sale_date: Option<usize>,
    pub gla: Option<usize>,
    pub beds: Option<usize>,
    pub baths: Option<usize>,
    pub year_built: Option<usize>,
    pub lot_size: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub property_type: Option<usize>,
    pub condition: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(headers: &StringRecord) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let find = |aliases: &[&str]| -> Option<usize> {
            aliases
                .iter()
                .find_map(|alias| lowered.iter().position(|header| header == alias))
        };

        ColumnMap {
            address: find(ADDRESS),
            sale_price: find(SALE_PRICE),
            sale_date: find(SALE_DATE),
            gla: find(GLA),
            beds: find(BEDS),
            baths: find(BATHS),
            year_built: find(YEAR_BUILT),
            lot_size: find(LOT_SIZE),
            latitude: find(LATITUDE),
            longitude: find(LONGITUDE),
            property_type: find(PROPERTY_TYPE),
            condition: find(CONDITION),
        }
    }
}
