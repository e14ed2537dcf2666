use geo::Point;

/// Geographic bounding box in lon/lat degrees (WGS84).
///
/// All datasets consumed by this crate are served in geographic coordinates;
/// no other CRS is supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// min longitude
    pub min_x: f64,
    /// min latitude
    pub min_y: f64,
    /// max longitude
    pub max_x: f64,
    /// max latitude
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// A geocoded city: the bounding box used to scope dataset queries plus the
/// urban-center point that seeds the proximity buffer.
#[derive(Debug, Clone)]
pub struct CityContext {
    pub name: String,
    pub bbox: BoundingBox,
    pub center: Point<f64>,
}
