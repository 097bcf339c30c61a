//! Chart series for the report frontend.
//!
//! Everything here is a pure projection of pipeline output; no new
//! statistics are computed.

use crate::domain::{
    ChartData, ComparableProperty, LinePoint, PricePoint, PriceDistribution, PriceVsGla,
    RegressionCoefficients, RegressionResult, SubjectProperty, TrendPoint,
};

const REGRESSION_LINE_POINTS: usize = 21;

/// Build every chart series from the prepared comps and the fit.
///
/// `comps` and `regression.adjusted_prices` are parallel arrays in comp
/// order; the trend series pairs them by index before sorting by sale
/// date.
pub fn generate_chart_data(
    subject: &SubjectProperty,
    comps: &[ComparableProperty],
    regression: &RegressionResult,
) -> ChartData {
    let adjusted = &regression.adjusted_prices;

    let mut data: Vec<PricePoint> = comps
        .iter()
        .zip(adjusted)
        .map(|(comp, &adjusted_price)| PricePoint {
            gla: comp.gla,
            price: comp.sale_price,
            adjusted_price,
            is_subject: false,
        })
        .collect();
    let subject_price = price_at_gla(subject, subject.gla, &regression.coefficients);
    data.push(PricePoint {
        gla: subject.gla,
        price: subject_price,
        adjusted_price: subject_price,
        is_subject: true,
    });

    let regression_line = regression_line(subject, comps, &regression.coefficients);

    let price_distribution = PriceDistribution {
        adjusted: adjusted.clone(),
        unadjusted: comps.iter().map(|comp| comp.sale_price).collect(),
    };

    let mut sale_price_trend: Vec<TrendPoint> = comps
        .iter()
        .zip(adjusted)
        .map(|(comp, &adjusted_price)| TrendPoint {
            date: comp.sale_date,
            price: comp.sale_price,
            adjusted_price,
        })
        .collect();
    sale_price_trend.sort_by_key(|point| point.date);

    ChartData {
        price_vs_gla: PriceVsGla {
            data,
            regression_line,
        },
        price_distribution,
        sale_price_trend,
    }
}

/// Evaluate the fitted model at an arbitrary GLA with the subject's other
/// base features held fixed, so the line passes through the subject point.
fn price_at_gla(subject: &SubjectProperty, gla: f64, c: &RegressionCoefficients) -> f64 {
    c.intercept
        + gla * c.gla
        + subject.beds as f64 * c.beds
        + subject.baths * c.baths
        + subject.lot_size * c.lot_size
        + subject.age * c.age
}

fn regression_line(
    subject: &SubjectProperty,
    comps: &[ComparableProperty],
    c: &RegressionCoefficients,
) -> Vec<LinePoint> {
    let mut min_gla = subject.gla;
    let mut max_gla = subject.gla;
    for comp in comps {
        min_gla = min_gla.min(comp.gla);
        max_gla = max_gla.max(comp.gla);
    }

    let span = max_gla - min_gla;
    if span <= 0.0 {
        return vec![LinePoint {
            gla: min_gla,
            price: price_at_gla(subject, min_gla, c),
        }];
    }

    let step = span / (REGRESSION_LINE_POINTS - 1) as f64;
    (0..REGRESSION_LINE_POINTS)
        .map(|i| {
            let gla = min_gla + step * i as f64;
            LinePoint {
                gla,
                price: price_at_gla(subject, gla, c),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfidenceGrade, ModelType, RegressionMetrics};
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

    fn comp(gla: f64, sale_price: f64, day: u32) -> ComparableProperty {
        ComparableProperty {
            address: format!("{gla} Elm St"),
            sale_price,
            sale_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            gla,
            beds: 3,
            baths: 2.0,
            lot_size: 0.25,
            year_built: 2010,
            property_type: None,
            condition: None,
            latitude: None,
            longitude: None,
            age: Some(15.0),
            distance: None,
            days_since_sale: Some(100.0),
        }
    }

    fn fit(adjusted_prices: Vec<f64>) -> RegressionResult {
        RegressionResult {
            model_type: ModelType::Linear,
            coefficients: RegressionCoefficients {
                intercept: 50_000.0,
                gla: 250.0,
                beds: 0.0,
                baths: 0.0,
                lot_size: 0.0,
                age: 0.0,
                distance: None,
                time: None,
            },
            metrics: RegressionMetrics {
                r_squared: 1.0,
                adjusted_r_squared: 1.0,
                standard_error: 0.0,
            },
            residuals: vec![0.0; adjusted_prices.len()],
            adjusted_prices,
            confidence_grade: ConfidenceGrade::A,
            confidence_score: 0.9,
            outliers: vec![],
        }
    }

    #[test]
    fn test_scatter_has_one_subject_point() {
        let comps = vec![comp(1800.0, 500_000.0, 10), comp(2200.0, 600_000.0, 5)];
        let charts = generate_chart_data(&subject(), &comps, &fit(vec![550_000.0, 550_000.0]));

        assert_eq!(charts.price_vs_gla.data.len(), 3);
        let subjects: Vec<&PricePoint> = charts
            .price_vs_gla
            .data
            .iter()
            .filter(|p| p.is_subject)
            .collect();
        assert_eq!(subjects.len(), 1);
        // intercept + 2000 * 250
        assert_eq!(subjects[0].price, 550_000.0);
        assert_eq!(subjects[0].adjusted_price, subjects[0].price);
    }

    #[test]
    fn test_regression_line_spans_gla_range() {
        let comps = vec![comp(1800.0, 500_000.0, 10), comp(2200.0, 600_000.0, 5)];
        let charts = generate_chart_data(&subject(), &comps, &fit(vec![550_000.0, 550_000.0]));

        let line = &charts.price_vs_gla.regression_line;
        assert_eq!(line.len(), 21);
        assert_eq!(line.first().unwrap().gla, 1800.0);
        assert_eq!(line.last().unwrap().gla, 2200.0);
        // Endpoint prices follow the model
        assert_eq!(line.first().unwrap().price, 50_000.0 + 1800.0 * 250.0);
        assert_eq!(line.last().unwrap().price, 50_000.0 + 2200.0 * 250.0);
    }

    #[test]
    fn test_trend_sorted_by_sale_date() {
        let comps = vec![comp(1800.0, 500_000.0, 20), comp(2200.0, 600_000.0, 5)];
        let charts = generate_chart_data(&subject(), &comps, &fit(vec![510_000.0, 590_000.0]));

        let trend = &charts.sale_price_trend;
        assert_eq!(trend.len(), 2);
        assert!(trend[0].date < trend[1].date);
        // Index pairing survives the sort: the March 5 comp keeps its own
        // adjusted price.
        assert_eq!(trend[0].price, 600_000.0);
        assert_eq!(trend[0].adjusted_price, 590_000.0);
    }

    #[test]
    fn test_distribution_mirrors_price_arrays() {
        let comps = vec![comp(1800.0, 500_000.0, 10), comp(2200.0, 600_000.0, 5)];
        let charts = generate_chart_data(&subject(), &comps, &fit(vec![510_000.0, 590_000.0]));

        assert_eq!(charts.price_distribution.unadjusted, vec![500_000.0, 600_000.0]);
        assert_eq!(charts.price_distribution.adjusted, vec![510_000.0, 590_000.0]);
    }

    #[test]
    fn test_degenerate_gla_span_collapses_line() {
        let comps = vec![comp(2000.0, 550_000.0, 10)];
        let charts = generate_chart_data(&subject(), &comps, &fit(vec![550_000.0]));
        assert_eq!(charts.price_vs_gla.regression_line.len(), 1);
    }
}
