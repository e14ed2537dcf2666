//! End-to-end siting pipeline over one commune dataset.

use std::path::Path;

use anyhow::Context;
use geo::{LineString, Point};
use geojson::FeatureCollection;
use tracing::info;

use crate::collect::storage;
use crate::commons::units::{km_to_degrees, meters_to_degrees};
use crate::siting::buffer::{line_network_buffer, point_buffer, BufferRegion};
use crate::siting::criteria::SitingCriteria;
use crate::siting::error::SitingError;
use crate::siting::filter::{display_subset, filter_parcels, BufferConstraint};

/// Hub-siting pipeline: builds the urban, network and road-axis buffer
/// regions from the criteria, filters the parcel collection through them in
/// that order, and keeps the surviving parcels for display or export.
///
/// Inputs are set individually, then `run()` consumes and returns the
/// pipeline with its result attached:
///
/// ```no_run
/// # fn parcels() -> geojson::FeatureCollection { unimplemented!() }
/// use geo::point;
/// use hubsite::siting::criteria::SitingCriteria;
/// use hubsite::siting::pipeline::SitingPipeline;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut pipeline = SitingPipeline::new(SitingCriteria::default());
/// pipeline.set_parcels(parcels());
/// pipeline.set_urban_center(point!(x: 3.0573, y: 50.6292));
/// let pipeline = pipeline.run()?;
/// println!("{} candidates", pipeline.get_geojson().unwrap().features.len());
/// # Ok(())
/// # }
/// ```
pub struct SitingPipeline {
    criteria: SitingCriteria,
    parcels: Option<FeatureCollection>,
    urban_center: Option<Point<f64>>,
    network_lines: Vec<LineString<f64>>,
    road_axes: Vec<LineString<f64>>,
    result: Option<FeatureCollection>,
}

impl SitingPipeline {
    pub fn new(criteria: SitingCriteria) -> Self {
        SitingPipeline {
            criteria,
            parcels: None,
            urban_center: None,
            network_lines: Vec::new(),
            road_axes: Vec::new(),
            result: None,
        }
    }

    pub fn set_parcels(&mut self, parcels: FeatureCollection) {
        self.parcels = Some(parcels);
    }

    pub fn set_urban_center(&mut self, center: Point<f64>) {
        self.urban_center = Some(center);
    }

    pub fn set_network_lines(&mut self, lines: Vec<LineString<f64>>) {
        self.network_lines = lines;
    }

    pub fn set_road_axes(&mut self, lines: Vec<LineString<f64>>) {
        self.road_axes = lines;
    }

    /// Run filtering: area threshold first, then the enabled buffer
    /// constraints in urban → network → axis order, then the display
    /// subset when the criteria ask for less than the full collection.
    pub fn run(mut self) -> Result<Self, SitingError> {
        let parcels = self
            .parcels
            .take()
            .ok_or(SitingError::MissingInput("parcels"))?;

        // Disabled constraints never pay for buffer construction.
        let urban: Option<BufferRegion> = match (self.criteria.urban_buffer_enabled, self.urban_center) {
            (true, Some(center)) => Some(point_buffer(
                center,
                km_to_degrees(self.criteria.urban_buffer_km),
            )?),
            _ => None,
        };
        let network = if self.criteria.network_buffer_enabled {
            line_network_buffer(
                &self.network_lines,
                meters_to_degrees(self.criteria.network_buffer_m),
            )?
        } else {
            None
        };
        let axis = if self.criteria.axis_buffer_enabled {
            line_network_buffer(
                &self.road_axes,
                meters_to_degrees(self.criteria.axis_buffer_m),
            )?
        } else {
            None
        };

        let constraints = [
            BufferConstraint {
                label: "urban",
                region: urban.as_ref(),
                enabled: self.criteria.urban_buffer_enabled,
            },
            BufferConstraint {
                label: "network",
                region: network.as_ref(),
                enabled: self.criteria.network_buffer_enabled,
            },
            BufferConstraint {
                label: "axis",
                region: axis.as_ref(),
                enabled: self.criteria.axis_buffer_enabled,
            },
        ];

        let mut filtered = filter_parcels(
            &parcels,
            &self.criteria.area_field,
            self.criteria.area_threshold,
            &constraints,
        )?;

        if self.criteria.display_percentage < 100 {
            filtered = display_subset(
                filtered,
                self.criteria.display_percentage,
                self.criteria.display_seed,
            );
        }

        info!(candidates = filtered.features.len(), "siting pipeline done");
        self.result = Some(filtered);
        Ok(self)
    }

    /// The filtered collection, once `run()` has completed.
    pub fn get_geojson(&self) -> Option<&FeatureCollection> {
        self.result.as_ref()
    }

    /// Save the filtered collection as a GeoJSON file.
    pub fn to_geojson(&self, path: &Path) -> anyhow::Result<()> {
        let result = self
            .result
            .as_ref()
            .context("no result available, call run() first")?;
        storage::save_feature_collection(result, path)
    }
}

#[cfg(test)]
mod tests {
    use geo::point;
    use serde_json::json;

    use super::*;
    use crate::siting::parcel::parcel_id;
    use crate::siting::parcel::test_support::parcel;

    fn parcels() -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![
                parcel("near", json!(5000), 0.0),
                parcel("far", json!(5000), 30.0),
                parcel("small", json!(100), 0.0),
            ],
            foreign_members: None,
        }
    }

    fn criteria() -> SitingCriteria {
        SitingCriteria {
            // 111 km buffer = 1 degree, covers the unit square at x = 0 only.
            urban_buffer_km: 111.0,
            network_buffer_enabled: false,
            axis_buffer_enabled: false,
            ..SitingCriteria::default()
        }
    }

    #[test]
    fn test_pipeline_requires_parcels() {
        let pipeline = SitingPipeline::new(criteria());
        assert!(matches!(
            pipeline.run(),
            Err(SitingError::MissingInput("parcels"))
        ));
    }

    #[test]
    fn test_pipeline_filters_by_urban_proximity() {
        let mut pipeline = SitingPipeline::new(criteria());
        pipeline.set_parcels(parcels());
        pipeline.set_urban_center(point!(x: 0.5, y: 0.5));
        let pipeline = pipeline.run().unwrap();

        let result = pipeline.get_geojson().unwrap();
        let ids: Vec<_> = result.features.iter().filter_map(|f| parcel_id(f)).collect();
        assert_eq!(ids, vec!["near"]);
    }

    #[test]
    fn test_enabled_network_without_lines_fails_closed() {
        let mut criteria = criteria();
        criteria.network_buffer_enabled = true;
        let mut pipeline = SitingPipeline::new(criteria);
        pipeline.set_parcels(parcels());
        pipeline.set_urban_center(point!(x: 0.5, y: 0.5));
        let pipeline = pipeline.run().unwrap();
        assert!(pipeline.get_geojson().unwrap().features.is_empty());
    }

    #[test]
    fn test_disabled_urban_buffer_skips_the_center_entirely() {
        let mut criteria = criteria();
        criteria.urban_buffer_enabled = false;
        let mut pipeline = SitingPipeline::new(criteria);
        pipeline.set_parcels(parcels());
        // No urban center set at all: irrelevant while the buffer is disabled.
        let pipeline = pipeline.run().unwrap();

        let result = pipeline.get_geojson().unwrap();
        assert_eq!(result.features.len(), 2);
    }

    #[test]
    fn test_display_percentage_truncates_result() {
        let features: Vec<_> = (0..10)
            .map(|i| parcel(&format!("p{i}"), json!(5000), i as f64 * 2.0))
            .collect();
        let mut criteria = SitingCriteria {
            urban_buffer_enabled: false,
            network_buffer_enabled: false,
            axis_buffer_enabled: false,
            display_percentage: 50,
            ..SitingCriteria::default()
        };
        criteria.display_seed = 3;
        let mut pipeline = SitingPipeline::new(criteria);
        pipeline.set_parcels(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        });
        let pipeline = pipeline.run().unwrap();
        assert_eq!(pipeline.get_geojson().unwrap().features.len(), 5);
    }
}
