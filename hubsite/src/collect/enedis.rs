//! HTA network acquisition from the Enedis open-data records API.

use anyhow::{Context, Result};
use geo::{Coord, LineString};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::collect::http::Fetcher;
use crate::geo_core::BoundingBox;

const DOWNLOAD_URL: &str = "https://data.enedis.fr/api/records/1.0/download/";

/// Default dataset: the underground medium-voltage network.
pub const HTA_DATASET: &str = "reseau-souterrain-hta";

/// One record of an Enedis records download.
#[derive(Debug, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub fields: RecordFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordFields {
    pub geo_shape: Option<GeoShape>,
}

/// The `geo_shape` payload. Coordinates stay untyped until the shape type
/// is known: datasets mix `LineString` records with other geometries whose
/// nesting differs.
#[derive(Debug, Deserialize)]
pub struct GeoShape {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub coordinates: serde_json::Value,
}

/// Download the HTA line records inside a bounding box and decode them into
/// line features.
pub fn fetch_hta_lines(
    fetcher: &Fetcher,
    bbox: &BoundingBox,
    dataset: &str,
) -> Result<Vec<LineString<f64>>> {
    let mut url = Url::parse(DOWNLOAD_URL).context("invalid Enedis endpoint")?;
    url.query_pairs_mut()
        .append_pair("rows", "1000")
        .append_pair("format", "json")
        .append_pair("geo_simplify", "true")
        .append_pair("geo_simplify_zoom", "14")
        // geofilter.bbox wants lat,lon pairs
        .append_pair(
            "geofilter.bbox",
            &format!("{},{},{},{}", bbox.min_y, bbox.min_x, bbox.max_y, bbox.max_x),
        )
        .append_pair("fields", "geo_shape")
        .append_pair("dataset", dataset);

    let records: Vec<Record> = fetcher
        .send(fetcher.client().get(url))?
        .json()
        .context("failed to decode Enedis records")?;
    let lines = lines_from_records(&records);
    info!(dataset, records = records.len(), lines = lines.len(), "fetched HTA network");
    Ok(lines)
}

/// Decode the `LineString`-typed records into line features, keeping input
/// order. Records carrying any other geometry type are ignored.
pub fn lines_from_records(records: &[Record]) -> Vec<LineString<f64>> {
    let mut lines = Vec::new();
    for record in records {
        let shape = match &record.fields.geo_shape {
            Some(shape) if shape.shape_type == "LineString" => shape,
            _ => continue,
        };
        let coords: Vec<[f64; 2]> = match serde_json::from_value(shape.coordinates.clone()) {
            Ok(coords) => coords,
            Err(error) => {
                warn!(%error, "LineString record with malformed coordinates, skipped");
                continue;
            }
        };
        lines.push(LineString::new(
            coords
                .into_iter()
                .map(|[lon, lat]| Coord { x: lon, y: lat })
                .collect(),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(json: &str) -> Vec<Record> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_linestring_records_decode_in_order() {
        let records = records(
            r#"[
                {"fields": {"geo_shape": {"type": "LineString", "coordinates": [[3.0, 50.6], [3.1, 50.7]]}}},
                {"fields": {"geo_shape": {"type": "Point", "coordinates": [3.0, 50.6]}}},
                {"fields": {}},
                {"fields": {"geo_shape": {"type": "LineString", "coordinates": [[2.9, 50.5], [2.95, 50.55], [3.0, 50.6]]}}}
            ]"#,
        );
        let lines = lines_from_records(&records);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0.len(), 2);
        assert_eq!(lines[0].0[0], Coord { x: 3.0, y: 50.6 });
        assert_eq!(lines[1].0.len(), 3);
        assert_eq!(lines[1].0[2], Coord { x: 3.0, y: 50.6 });
    }

    #[test]
    fn test_malformed_coordinates_are_skipped() {
        let records = records(
            r#"[
                {"fields": {"geo_shape": {"type": "LineString", "coordinates": "oops"}}},
                {"fields": {"geo_shape": {"type": "LineString", "coordinates": [[3.0, 50.6], [3.1, 50.7]]}}}
            ]"#,
        );
        assert_eq!(lines_from_records(&records).len(), 1);
    }
}
