//! City geocoding through the Nominatim search API.

use anyhow::{Context, Result};
use geo::Point;
use serde::Deserialize;

use crate::collect::http::Fetcher;
use crate::geo_core::{BoundingBox, CityContext};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// First search result, as served by Nominatim. Coordinates arrive as
/// strings; `boundingbox` is `[min_lat, max_lat, min_lon, max_lon]`.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub boundingbox: [String; 4],
    pub lat: String,
    pub lon: String,
}

/// Resolve a city name to its bounding box and urban-center point.
pub fn geocode_city(fetcher: &Fetcher, city_name: &str) -> Result<CityContext> {
    let request = fetcher.client().get(SEARCH_URL).query(&[
        ("q", city_name),
        ("format", "json"),
        ("limit", "1"),
        ("polygon_geojson", "1"),
    ]);
    let results: Vec<SearchResult> = fetcher
        .send(request)?
        .json()
        .context("failed to decode Nominatim response")?;
    let first = results
        .into_iter()
        .next()
        .with_context(|| format!("no geocoding result for {city_name}"))?;
    context_from_result(city_name, &first)
}

/// Convert one Nominatim result into a [`CityContext`].
pub fn context_from_result(city_name: &str, result: &SearchResult) -> Result<CityContext> {
    let [min_lat, max_lat, min_lon, max_lon] = &result.boundingbox;
    let bbox = BoundingBox::new(
        coord(min_lon)?,
        coord(min_lat)?,
        coord(max_lon)?,
        coord(max_lat)?,
    );
    let center = Point::new(coord(&result.lon)?, coord(&result.lat)?);
    Ok(CityContext {
        name: city_name.to_string(),
        bbox,
        center,
    })
}

fn coord(value: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("invalid coordinate in geocoding result: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_canned_result() {
        let json = r#"{
            "boundingbox": ["50.5703", "50.6942", "2.9677", "3.1264"],
            "lat": "50.6365654",
            "lon": "3.0635282"
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        let context = context_from_result("Lille, France", &result).unwrap();

        assert_eq!(context.name, "Lille, France");
        assert_eq!(context.bbox.min_x, 2.9677);
        assert_eq!(context.bbox.min_y, 50.5703);
        assert_eq!(context.bbox.max_x, 3.1264);
        assert_eq!(context.bbox.max_y, 50.6942);
        assert_eq!(context.center.x(), 3.0635282);
        assert_eq!(context.center.y(), 50.6365654);
    }

    #[test]
    fn test_malformed_coordinate_is_an_error() {
        let json = r#"{
            "boundingbox": ["a", "50.69", "2.96", "3.12"],
            "lat": "50.63",
            "lon": "3.06"
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert!(context_from_result("Lille", &result).is_err());
    }
}
