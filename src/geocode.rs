//! Geocoding adapter - best-effort address to coordinates.
//!
//! Missing API key, zero results, provider errors and transport failures
//! all collapse to `None`. The valuation pipeline must never abort on
//! geocoding; distance adjustments simply degrade to "no coordinates".

use crate::domain::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Geocode an address. Returns `None` on any failure.
pub async fn geocode(client: &Client, api_key: Option<&str>, address: &str) -> Option<Coordinates> {
    let api_key = api_key?;

    let response = match client
        .get(GEOCODE_URL)
        .query(&[("address", address), ("key", api_key)])
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Geocoding request failed: {}", e);
            return None;
        }
    };

    let body: GeocodeResponse = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Geocoding response unreadable: {}", e);
            return None;
        }
    };

    // ZERO_RESULTS, OVER_QUERY_LIMIT, REQUEST_DENIED etc. all degrade the
    // same way.
    if body.status != "OK" {
        return None;
    }

    let location = &body.results.first()?.geometry.location;
    Some(Coordinates {
        latitude: location.lat,
        longitude: location.lng,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_yields_none() {
        let client = Client::new();
        let result = geocode(&client, None, "123 Main St").await;
        assert!(result.is_none());
    }
}
