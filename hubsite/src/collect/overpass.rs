//! Road-axis acquisition from the Overpass API.

use std::collections::HashMap;

use anyhow::{Context, Result};
use geo::{Coord, LineString};
use serde::Deserialize;
use tracing::{info, warn};

use crate::collect::http::Fetcher;
use crate::geo_core::BoundingBox;

const API_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass QL query for major road axes inside a bounding box.
fn axes_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:25];\n\
         (\n  way[\"highway\"~\"motorway|trunk|primary|secondary|tertiary\"]({},{},{},{});\n);\n\
         out body;\n>;\nout skel qt;",
        bbox.min_y, bbox.min_x, bbox.max_y, bbox.max_x
    )
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// An Overpass element; only nodes and ways matter here.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    #[serde(other)]
    Other,
}

/// Query the major road axes inside a bounding box and assemble them into
/// line features.
pub fn fetch_road_axes(fetcher: &Fetcher, bbox: &BoundingBox) -> Result<Vec<LineString<f64>>> {
    let request = fetcher.client().post(API_URL).body(axes_query(bbox));
    let response: OverpassResponse = fetcher
        .send(request)?
        .json()
        .context("failed to decode Overpass response")?;
    let lines = lines_from_elements(&response.elements);
    info!(elements = response.elements.len(), lines = lines.len(), "fetched road axes");
    Ok(lines)
}

/// Assemble way elements into line features by resolving their node
/// references. A way referencing a node absent from the payload is skipped
/// with a warning; Overpass recursion normally ships every referenced node.
pub fn lines_from_elements(elements: &[Element]) -> Vec<LineString<f64>> {
    let mut nodes: HashMap<i64, Coord<f64>> = HashMap::new();
    for element in elements {
        if let Element::Node { id, lat, lon } = element {
            nodes.insert(*id, Coord { x: *lon, y: *lat });
        }
    }

    let mut lines = Vec::new();
    for element in elements {
        let (id, refs) = match element {
            Element::Way { id, nodes } => (id, nodes),
            _ => continue,
        };
        if refs.len() < 2 {
            continue;
        }
        let coords: Option<Vec<Coord<f64>>> =
            refs.iter().map(|r| nodes.get(r).copied()).collect();
        match coords {
            Some(coords) => lines.push(LineString::new(coords)),
            None => warn!(way = id, "way references nodes missing from the response, skipped"),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ways_resolve_nodes_in_order() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{
                "elements": [
                    {"type": "way", "id": 1, "nodes": [10, 11, 12]},
                    {"type": "node", "id": 10, "lat": 50.6, "lon": 3.0},
                    {"type": "node", "id": 11, "lat": 50.61, "lon": 3.01},
                    {"type": "node", "id": 12, "lat": 50.62, "lon": 3.02}
                ]
            }"#,
        )
        .unwrap();
        let lines = lines_from_elements(&response.elements);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0.len(), 3);
        assert_eq!(lines[0].0[0], Coord { x: 3.0, y: 50.6 });
        assert_eq!(lines[0].0[2], Coord { x: 3.02, y: 50.62 });
    }

    #[test]
    fn test_way_with_unresolved_node_is_skipped() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{
                "elements": [
                    {"type": "node", "id": 10, "lat": 50.6, "lon": 3.0},
                    {"type": "node", "id": 11, "lat": 50.61, "lon": 3.01},
                    {"type": "way", "id": 1, "nodes": [10, 11]},
                    {"type": "way", "id": 2, "nodes": [10, 99]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(lines_from_elements(&response.elements).len(), 1);
    }

    #[test]
    fn test_unknown_element_types_are_tolerated() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"elements": [{"type": "relation", "id": 5}]}"#,
        )
        .unwrap();
        assert!(lines_from_elements(&response.elements).is_empty());
    }

    #[test]
    fn test_query_embeds_bbox_in_lat_lon_order() {
        let query = axes_query(&BoundingBox::new(2.9, 50.5, 3.2, 50.7));
        assert!(query.contains("(50.5,2.9,50.7,3.2)"));
        assert!(query.contains("motorway|trunk|primary|secondary|tertiary"));
    }
}
