//! Similarity scoring - a bounded [0,1] score per comp, independent of
//! the regression, used for adjustment-table ranking and the confidence
//! blend.

use crate::domain::{ComparableProperty, SubjectProperty};

const WEIGHT_GLA: f64 = 0.30;
const WEIGHT_BEDS_BATHS: f64 = 0.20;
const WEIGHT_AGE: f64 = 0.20;
const WEIGHT_DISTANCE: f64 = 0.15;
const WEIGHT_LOT_SIZE: f64 = 0.10;
const WEIGHT_RECENCY: f64 = 0.05;

/// Distance sub-score normalizes over this many miles.
const DISTANCE_NORM_MILES: f64 = 5.0;
/// Recency sub-score normalizes over this many days.
const RECENCY_NORM_DAYS: f64 = 365.0;

/// Weighted blend of normalized feature differences. Always in [0,1].
///
/// Comps missing distance or sale-date delta get a neutral 0.5 on those
/// sub-scores instead of being excluded from the weighted sum, which
/// keeps scores comparable across comps with partial data.
pub fn similarity_score(subject: &SubjectProperty, comp: &ComparableProperty) -> f64 {
    let mut score = 0.0;

    // GLA: normalized absolute difference
    let gla_diff = (subject.gla - comp.gla).abs() / subject.gla.max(comp.gla);
    score += (1.0 - gla_diff.min(1.0)) * WEIGHT_GLA;

    // Beds is a binary match; baths is binary at a 0.5 tolerance.
    let beds_match = if subject.beds == comp.beds { 1.0 } else { 0.5 };
    let baths_match = if (subject.baths - comp.baths).abs() < 0.5 {
        1.0
    } else {
        0.5
    };
    score += ((beds_match + baths_match) / 2.0) * WEIGHT_BEDS_BATHS;

    // Age
    let comp_age = comp.age.unwrap_or(0.0);
    let age_diff = (subject.age - comp_age).abs() / subject.age.max(comp_age).max(1.0);
    score += (1.0 - age_diff.min(1.0)) * WEIGHT_AGE;

    // Distance, neutral when unknown
    score += match comp.distance {
        Some(distance) => (1.0 - distance / DISTANCE_NORM_MILES).max(0.0) * WEIGHT_DISTANCE,
        None => 0.5 * WEIGHT_DISTANCE,
    };

    // Lot size
    let lot_diff =
        (subject.lot_size - comp.lot_size).abs() / subject.lot_size.max(comp.lot_size).max(0.01);
    score += (1.0 - lot_diff.min(1.0)) * WEIGHT_LOT_SIZE;

    // Recency, neutral when unknown
    score += match comp.days_since_sale {
        Some(days) => (1.0 - days / RECENCY_NORM_DAYS).max(0.0) * WEIGHT_RECENCY,
        None => 0.5 * WEIGHT_RECENCY,
    };

    score.clamp(0.0, 1.0)
}

pub fn similarity_scores(subject: &SubjectProperty, comps: &[ComparableProperty]) -> Vec<f64> {
    comps
        .iter()
        .map(|comp| similarity_score(subject, comp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn subject() -> SubjectProperty {
        SubjectProperty {
            address: "456 Oak Ave".to_string(),
            beds: 3,
            baths: 2.0,
            gla: 2000.0,
            lot_size: 0.25,
            year_built: 2010,
            age: 15.0,
            coordinates: None,
            distance: None,
            property_type: None,
            condition: None,
            finish_level: None,
            notes: None,
        }
    }

    fn twin_comp() -> ComparableProperty {
        ComparableProperty {
            address: "123 Main St".to_string(),
            sale_price: 550_000.0,
            sale_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            gla: 2000.0,
            beds: 3,
            baths: 2.0,
            lot_size: 0.25,
            year_built: 2010,
            property_type: None,
            condition: None,
            latitude: None,
            longitude: None,
            age: Some(15.0),
            distance: Some(0.0),
            days_since_sale: Some(0.0),
        }
    }

    #[test]
    fn test_identical_comp_scores_one() {
        let score = similarity_score(&subject(), &twin_comp());
        assert!((score - 1.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn test_missing_distance_and_recency_are_neutral() {
        let mut comp = twin_comp();
        comp.distance = None;
        comp.days_since_sale = None;
        let score = similarity_score(&subject(), &comp);
        // 0.30 + 0.20 + 0.20 + 0.5*0.15 + 0.10 + 0.5*0.05
        assert!((score - 0.90).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn test_wildly_divergent_feature_cannot_go_negative() {
        let mut comp = twin_comp();
        comp.gla = 50_000.0;
        comp.distance = Some(500.0);
        comp.days_since_sale = Some(5_000.0);
        let score = similarity_score(&subject(), &comp);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_bath_tolerance_is_half() {
        let mut comp = twin_comp();
        comp.baths = 2.4;
        let near = similarity_score(&subject(), &comp);
        comp.baths = 2.5;
        let far = similarity_score(&subject(), &comp);
        assert!(near > far);
    }

    #[test]
    fn test_result_always_bounded() {
        let mut comp = twin_comp();
        comp.beds = 9;
        comp.baths = 9.0;
        comp.gla = 1.0;
        comp.lot_size = 99.0;
        comp.age = Some(200.0);
        let score = similarity_score(&subject(), &comp);
        assert!((0.0..=1.0).contains(&score));
    }
}
