//! Comp preparation - derive distance, recency and age per comp.
//!
//! Each comp is prepared independently of the others; preparation
//! produces fresh copies and never mutates parsed input.

use crate::clock::Clock;
use crate::domain::{ComparableProperty, SubjectProperty};

const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance in miles between two lat/lon points.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_MILES * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Compute derived features for every comp.
pub fn prepare_comps(
    subject: &SubjectProperty,
    comps: &[ComparableProperty],
    clock: &Clock,
) -> Vec<ComparableProperty> {
    comps
        .iter()
        .map(|comp| prepare_comp(subject, comp, clock))
        .collect()
}

fn prepare_comp(
    subject: &SubjectProperty,
    comp: &ComparableProperty,
    clock: &Clock,
) -> ComparableProperty {
    // Distance needs coordinates on both sides; otherwise it stays absent.
    let distance = match (subject.coordinates, comp.latitude, comp.longitude) {
        (Some(origin), Some(lat), Some(lon)) => {
            Some(haversine_miles(origin.latitude, origin.longitude, lat, lon))
        }
        _ => None,
    };

    // saleDate and yearBuilt are required upstream, so both derivations
    // are always computable here.
    let days_since_sale = (clock.today() - comp.sale_date).num_days() as f64;
    let age = (clock.current_year() - comp.year_built).max(0) as f64;

    ComparableProperty {
        age: Some(age),
        distance,
        days_since_sale: Some(days_since_sale),
        ..comp.clone()
    }
}
