//! Parse functions - transform raw CSV exports into ComparableProperty records

use crate::clock::Clock;
use crate::domain::{ComparableProperty, PropertyCondition, PropertyType};
use crate::ingestion::columns::ColumnMap;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::info;

/// Batch parse outcome.
///
/// `errors` and `warnings` may be non-empty even on success: they describe
/// rows that were skipped or padded, not a reason to fail the batch once
/// at least one comp survives.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub comps: Vec<ComparableProperty>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    fn failure(errors: Vec<String>, warnings: Vec<String>) -> Self {
        ParseOutcome {
            success: false,
            comps: Vec::new(),
            errors,
            warnings,
        }
    }
}

/// Parse raw delimited text into normalized comps.
///
/// Rows that fail required-field or schema checks are dropped with a
/// row-indexed error; the rest of the batch proceeds.
pub fn parse_csv(content: &str, clock: &Clock) -> ParseOutcome {
    if content.trim().is_empty() {
        return ParseOutcome::failure(
            vec!["CSV file is empty or has no valid rows".to_string()],
            Vec::new(),
        );
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            return ParseOutcome::failure(vec![format!("Failed to parse CSV: {e}")], Vec::new())
        }
    };
    let map = ColumnMap::resolve(&headers);

    let mut comps = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut data_rows = 0usize;

    for (idx, result) in reader.records().enumerate() {
        data_rows += 1;
        let row = idx + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Row {row}: CSV parse error: {e}"));
                continue;
            }
        };

        let parsed = parse_row(&record, &map, row, clock);
        errors.extend(parsed.errors);
        warnings.extend(parsed.warnings);
        if let Some(comp) = parsed.comp {
            comps.push(comp);
        }
    }

    if data_rows == 0 {
        return ParseOutcome::failure(
            vec!["CSV file is empty or has no valid rows".to_string()],
            warnings,
        );
    }

    if comps.is_empty() {
        let errors = if errors.is_empty() {
            vec!["No valid comparable properties found".to_string()]
        } else {
            errors
        };
        return ParseOutcome::failure(errors, warnings);
    }

    info!(
        "Parsed {} comps from CSV ({} row errors, {} warnings)",
        comps.len(),
        errors.len(),
        warnings.len()
    );

    ParseOutcome {
        success: true,
        comps,
        errors,
        warnings,
    }
}

struct RowParse {
    comp: Option<ComparableProperty>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn parse_row(record: &StringRecord, map: &ColumnMap, row: usize, clock: &Clock) -> RowParse {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let address = text_field(record, map.address);
    let sale_price = number_field(record, map.sale_price);
    let sale_date = date_field(record, map.sale_date);
    let gla = number_field(record, map.gla);
    let beds = number_field(record, map.beds);
    let baths = number_field(record, map.baths);
    let year_built = number_field(record, map.year_built);
    let lot_size = number_field(record, map.lot_size);
    let latitude = number_field(record, map.latitude);
    let longitude = number_field(record, map.longitude);

    if address.is_none() {
        errors.push(format!("Row {row}: Missing required field: address"));
    }
    if !matches!(sale_price, Some(p) if p > 0.0) {
        errors.push(format!("Row {row}: Missing or invalid salePrice"));
    }
    if sale_date.is_none() {
        errors.push(format!("Row {row}: Missing required field: saleDate"));
    }
    if !matches!(gla, Some(g) if g > 0.0) {
        errors.push(format!("Row {row}: Missing or invalid gla"));
    }
    if !matches!(beds, Some(b) if b > 0.0) {
        errors.push(format!("Row {row}: Missing or invalid beds"));
    }
    if !matches!(baths, Some(b) if b > 0.0) {
        errors.push(format!("Row {row}: Missing or invalid baths"));
    }
    if !matches!(year_built, Some(y) if y >= 1800.0) {
        errors.push(format!("Row {row}: Missing or invalid yearBuilt"));
    }

    if lot_size.is_none() {
        warnings.push(format!(
            "Row {row}: Missing optional field: lotSize, defaulting to 0"
        ));
    }
    if latitude.is_none() || longitude.is_none() {
        warnings.push(format!(
            "Row {row}: Missing optional fields: latitude/longitude"
        ));
    }

    if !errors.is_empty() {
        return RowParse {
            comp: None,
            errors,
            warnings,
        };
    }

    // Required fields are all present and in range past this point.
    let (
        Some(address),
        Some(sale_price),
        Some(sale_date),
        Some(gla),
        Some(beds),
        Some(baths),
        Some(year_built),
    ) = (address, sale_price, sale_date, gla, beds, baths, year_built)
    else {
        return RowParse {
            comp: None,
            errors,
            warnings,
        };
    };

    let property_type =
        text_field(record, map.property_type).and_then(|value| PropertyType::from_alias(&value));
    let condition =
        text_field(record, map.condition).and_then(|value| PropertyCondition::from_alias(&value));

    // Coordinates only count as present when both halves parsed.
    let has_coords = latitude.is_some() && longitude.is_some();

    let comp = ComparableProperty {
        address,
        sale_price,
        sale_date,
        gla,
        beds: beds.floor() as u32,
        baths,
        lot_size: lot_size.unwrap_or(0.0),
        year_built: year_built.floor() as i32,
        property_type,
        condition,
        latitude: latitude.filter(|_| has_coords),
        longitude: longitude.filter(|_| has_coords),
        age: None,
        distance: None,
        days_since_sale: None,
    };

    if let Err(message) = validate_comp(&comp, clock) {
        errors.push(format!("Row {row}: Validation failed: {message}"));
        return RowParse {
            comp: None,
            errors,
            warnings,
        };
    }

    RowParse {
        comp: Some(comp),
        errors,
        warnings,
    }
}

/// Full comp schema check. Applied to every surviving CSV row and to
/// comps supplied directly in report requests.
pub fn validate_comp(comp: &ComparableProperty, clock: &Clock) -> Result<(), String> {
    if comp.address.trim().is_empty() {
        return Err("address must not be empty".to_string());
    }
    if comp.sale_price <= 0.0 {
        return Err("salePrice must be positive".to_string());
    }
    if comp.gla <= 0.0 {
        return Err("gla must be positive".to_string());
    }
    if comp.beds < 1 {
        return Err("beds must be at least 1".to_string());
    }
    if comp.baths <= 0.0 {
        return Err("baths must be positive".to_string());
    }
    if comp.lot_size < 0.0 {
        return Err("lotSize must be non-negative".to_string());
    }
    let current_year = clock.current_year();
    if comp.year_built < 1800 || comp.year_built > current_year {
        return Err(format!("yearBuilt must be between 1800 and {current_year}"));
    }
    if let Some(lat) = comp.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err("latitude must be between -90 and 90".to_string());
        }
    }
    if let Some(lon) = comp.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err("longitude must be between -180 and 180".to_string());
        }
    }
    Ok(())
}

fn raw_field<'a>(record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    let value = record.get(idx?)?.trim();
    (!value.is_empty()).then_some(value)
}

fn text_field(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    raw_field(record, idx).map(str::to_string)
}

fn number_field(record: &StringRecord, idx: Option<usize>) -> Option<f64> {
    raw_field(record, idx).and_then(parse_number)
}

fn date_field(record: &StringRecord, idx: Option<usize>) -> Option<NaiveDate> {
    raw_field(record, idx).and_then(parse_date)
}

/// Strip currency symbols and thousands separators, then parse as float.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(['$', ','], "").trim().parse().ok()
}

/// Date parsing over the formats seen in MLS/CMA exports, normalized to a
/// calendar date with no time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%m-%d-%Y", "%b %d, %Y", "%B %d, %Y",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::columns;

    fn test_clock() -> Clock {
        Clock::fixed(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    const CANONICAL_HEADERS: [&str; 12] = [
        "address",
        "salePrice",
        "saleDate",
        "gla",
        "beds",
        "baths",
        "yearBuilt",
        "lotSize",
        "latitude",
        "longitude",
        "propertyType",
        "condition",
    ];

    const SAMPLE_ROW: [&str; 12] = [
        "123 Main St",
        "\"$550,000\"",
        "2024-03-15",
        "2000",
        "3",
        "2",
        "2010",
        "0.25",
        "40.0",
        "-75.0",
        "Single Family",
        "Good",
    ];

    fn csv_with_headers(headers: &[&str]) -> String {
        format!("{}\n{}\n", headers.join(","), SAMPLE_ROW.join(","))
    }

    fn baseline_comp() -> ComparableProperty {
        let outcome = parse_csv(&csv_with_headers(&CANONICAL_HEADERS), &test_clock());
        assert!(outcome.success);
        outcome.comps.into_iter().next().unwrap()
    }

    #[test]
    fn test_canonical_headers_parse() {
        let comp = baseline_comp();
        assert_eq!(comp.address, "123 Main St");
        assert_eq!(comp.sale_price, 550_000.0);
        assert_eq!(comp.sale_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(comp.gla, 2000.0);
        assert_eq!(comp.beds, 3);
        assert_eq!(comp.baths, 2.0);
        assert_eq!(comp.year_built, 2010);
        assert_eq!(comp.lot_size, 0.25);
        assert_eq!(comp.latitude, Some(40.0));
        assert_eq!(comp.longitude, Some(-75.0));
        assert_eq!(comp.property_type, Some(PropertyType::SingleFamily));
        assert_eq!(comp.condition, Some(PropertyCondition::Good));
        assert_eq!(comp.age, None);
        assert_eq!(comp.distance, None);
    }

    #[test]
    fn test_every_alias_normalizes_like_canonical() {
        let baseline = baseline_comp();
        let alias_tables: [(usize, &[&str]); 12] = [
            (0, columns::ADDRESS),
            (1, columns::SALE_PRICE),
            (2, columns::SALE_DATE),
            (3, columns::GLA),
            (4, columns::BEDS),
            (5, columns::BATHS),
            (6, columns::YEAR_BUILT),
            (7, columns::LOT_SIZE),
            (8, columns::LATITUDE),
            (9, columns::LONGITUDE),
            (10, columns::PROPERTY_TYPE),
            (11, columns::CONDITION),
        ];

        for (position, aliases) in alias_tables {
            for alias in aliases {
                let mut headers = CANONICAL_HEADERS;
                headers[position] = alias;
                let outcome = parse_csv(&csv_with_headers(&headers), &test_clock());
                assert!(outcome.success, "alias {alias} failed to parse");
                let comp = &outcome.comps[0];
                assert_eq!(comp.address, baseline.address, "alias {alias}");
                assert_eq!(comp.sale_price, baseline.sale_price, "alias {alias}");
                assert_eq!(comp.sale_date, baseline.sale_date, "alias {alias}");
                assert_eq!(comp.gla, baseline.gla, "alias {alias}");
                assert_eq!(comp.beds, baseline.beds, "alias {alias}");
                assert_eq!(comp.baths, baseline.baths, "alias {alias}");
                assert_eq!(comp.year_built, baseline.year_built, "alias {alias}");
                assert_eq!(comp.lot_size, baseline.lot_size, "alias {alias}");
            }
        }
    }

    #[test]
    fn test_invalid_rows_are_isolated() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize
1 First St,500000,2024-01-10,1900,3,2,2005,0.2
2 Second St,-100,2024-02-10,2000,3,2,2006,0.2
3 Third St,520000,2024-03-10,2100,4,2.5,2007,0.3
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(outcome.success);
        assert_eq!(outcome.comps.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("Row 2"));
        assert!(outcome.errors[0].contains("salePrice"));
    }

    #[test]
    fn test_all_rows_invalid_fails_batch() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize
1 First St,,2024-01-10,1900,3,2,2005,0.2
2 Second St,0,2024-02-10,2000,3,2,2006,0.2
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(!outcome.success);
        assert!(outcome.comps.is_empty());
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_empty_input_fails() {
        let outcome = parse_csv("", &test_clock());
        assert!(!outcome.success);
        assert!(outcome.errors[0].contains("empty"));

        let outcome = parse_csv("   \n  ", &test_clock());
        assert!(!outcome.success);
    }

    #[test]
    fn test_headers_only_fails() {
        let outcome = parse_csv(
            "address,salePrice,saleDate,gla,beds,baths,yearBuilt\n",
            &test_clock(),
        );
        assert!(!outcome.success);
        assert!(outcome.errors[0].contains("empty"));
    }

    #[test]
    fn test_currency_and_separators_stripped() {
        assert_eq!(parse_number("$1,234,567.89"), Some(1_234_567.89));
        assert_eq!(parse_number("  42 "), Some(42.0));
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("03/15/2024"), Some(expected));
        assert_eq!(parse_date("03-15-2024"), Some(expected));
        assert_eq!(parse_date("Mar 15, 2024"), Some(expected));
        assert_eq!(parse_date("March 15, 2024"), Some(expected));
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_missing_lot_size_defaults_with_warning() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt
1 First St,500000,2024-01-10,1900,3,2,2005
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(outcome.success);
        assert_eq!(outcome.comps[0].lot_size, 0.0);
        assert!(outcome.warnings.iter().any(|w| w.contains("lotSize")));
    }

    #[test]
    fn test_missing_coordinates_warns_but_keeps_row() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize
1 First St,500000,2024-01-10,1900,3,2,2005,0.2
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(outcome.success);
        assert_eq!(outcome.comps[0].latitude, None);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("latitude/longitude")));
    }

    #[test]
    fn test_unrecognized_enum_text_is_dropped_silently() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize,propertyType
1 First St,500000,2024-01-10,1900,3,2,2005,0.2,Spaceship
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(outcome.success);
        assert_eq!(outcome.comps[0].property_type, None);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_out_of_range_latitude_drops_row() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize,latitude,longitude
1 First St,500000,2024-01-10,1900,3,2,2005,0.2,95.0,-75.0
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(!outcome.success);
        assert!(outcome.errors[0].contains("Validation failed"));
    }

    #[test]
    fn test_future_year_built_drops_row() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize
1 First St,500000,2024-01-10,1900,3,2,2030,0.2
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(!outcome.success);
        assert!(outcome.errors[0].contains("yearBuilt"));
    }

    #[test]
    fn test_fractional_beds_floored() {
        let csv = "\
address,salePrice,saleDate,gla,beds,baths,yearBuilt,lotSize
1 First St,500000,2024-01-10,1900,3.7,2,2005,0.2
";
        let outcome = parse_csv(csv, &test_clock());
        assert!(outcome.success);
        assert_eq!(outcome.comps[0].beds, 3);
    }
}
