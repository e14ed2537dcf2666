//! Buffer construction around reference geometries.
//!
//! Radii are expressed in degrees (see [`crate::commons::units`]); the
//! underlying buffer, union and predicate operations go through GEOS rather
//! than a hand-rolled kernel.

use geo::{Geometry as GeoGeometry, LineString, Point};
use geos::{Geom, Geometry as GeosGeometry};

use crate::siting::error::SitingError;

/// Segments per quarter circle when approximating round buffer caps.
const QUADRANT_SEGMENTS: i32 = 8;

/// The planar region within a fixed radius of a reference geometry,
/// possibly multi-part.
///
/// Derived data: rebuilt whenever the radius or the reference geometry
/// changes, never persisted as authoritative state.
pub struct BufferRegion {
    geos: GeosGeometry,
    geo: GeoGeometry<f64>,
}

impl BufferRegion {
    fn from_geos(geom: GeosGeometry) -> Result<Self, SitingError> {
        let geo: GeoGeometry<f64> = geom.try_into()?;
        let geos: GeosGeometry = geo.clone().try_into()?;
        Ok(BufferRegion { geos, geo })
    }

    pub fn is_empty(&self) -> Result<bool, SitingError> {
        Ok(self.geos.is_empty()?)
    }

    /// Intersection predicate; boundary contact counts as intersecting.
    pub fn intersects(&self, geometry: &GeoGeometry<f64>) -> Result<bool, SitingError> {
        let other: GeosGeometry = geometry.clone().try_into()?;
        Ok(self.geos.intersects(&other)?)
    }

    /// True when the region entirely covers `geometry`.
    pub fn covers(&self, geometry: &GeoGeometry<f64>) -> Result<bool, SitingError> {
        let other: GeosGeometry = geometry.clone().try_into()?;
        Ok(self.geos.covers(&other)?)
    }

    /// The region as a GeoJSON geometry, for display layers.
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.geo))
    }
}

/// Circular buffer around a single point.
pub fn point_buffer(center: Point<f64>, radius_degrees: f64) -> Result<BufferRegion, SitingError> {
    let point: GeosGeometry = GeoGeometry::Point(center).try_into()?;
    let buffered = point.buffer(radius_degrees, QUADRANT_SEGMENTS)?;
    BufferRegion::from_geos(buffered)
}

/// Buffers every line independently and folds the results into one union.
///
/// Returns `Ok(None)` for an empty input slice: the absence of a reference
/// network means "no constraint", which callers must keep distinct from a
/// present-but-empty region (a configured constraint with nothing
/// underneath fails closed in the filter instead).
pub fn line_network_buffer(
    lines: &[LineString<f64>],
    radius_degrees: f64,
) -> Result<Option<BufferRegion>, SitingError> {
    let mut merged: Option<GeosGeometry> = None;
    for line in lines {
        let geom: GeosGeometry = GeoGeometry::LineString(line.clone()).try_into()?;
        let buffered = geom.buffer(radius_degrees, QUADRANT_SEGMENTS)?;
        merged = Some(match merged {
            Some(acc) => acc.union(&buffered)?,
            None => buffered,
        });
    }
    merged.map(BufferRegion::from_geos).transpose()
}

#[cfg(test)]
mod tests {
    use geo::{line_string, point};

    use super::*;

    #[test]
    fn test_point_buffer_contains_its_center() {
        let center = point!(x: 3.06, y: 50.63);
        let region = point_buffer(center, 0.05).unwrap();
        assert!(!region.is_empty().unwrap());
        assert!(region.intersects(&GeoGeometry::Point(center)).unwrap());
    }

    #[test]
    fn test_point_buffer_excludes_distant_point() {
        let region = point_buffer(point!(x: 0.0, y: 0.0), 0.01).unwrap();
        let far = GeoGeometry::Point(point!(x: 1.0, y: 1.0));
        assert!(!region.intersects(&far).unwrap());
    }

    #[test]
    fn test_empty_line_set_yields_absence() {
        let region = line_network_buffer(&[], 0.01).unwrap();
        assert!(region.is_none());
    }

    #[test]
    fn test_union_covers_every_individual_buffer() {
        // Two disjoint lines far enough apart that their buffers cannot
        // overlap; the union must still cover both.
        let lines = vec![
            line_string![(x: 0.0, y: 0.0), (x: 0.1, y: 0.0)],
            line_string![(x: 1.0, y: 1.0), (x: 1.1, y: 1.0)],
        ];
        let merged = line_network_buffer(&lines, 0.01).unwrap().unwrap();
        assert!(!merged.is_empty().unwrap());
        for line in &lines {
            let single = line_network_buffer(std::slice::from_ref(line), 0.01)
                .unwrap()
                .unwrap();
            assert!(merged.covers(&single.geo).unwrap());
            assert!(merged.intersects(&GeoGeometry::LineString(line.clone())).unwrap());
        }
    }

    #[test]
    fn test_region_converts_to_geojson() {
        let region = point_buffer(point!(x: 0.0, y: 0.0), 0.01).unwrap();
        let geometry = region.to_geojson();
        assert!(matches!(geometry.value, geojson::Value::Polygon(_)));
    }
}
