//! Conversion of operator-facing distances into the degree-based radii used
//! by the geometry layer.
//!
//! The whole pipeline works in geographic lon/lat degrees and approximates
//! one degree of arc as 111 km. The approximation is latitude-independent on
//! purpose: it is accurate enough near mid-latitudes (metropolitan France)
//! and keeps buffer radii trivially derivable from slider values.

/// Kilometers per degree of arc.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Meters per degree of arc.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Buffer radius in degrees for a distance given in kilometers.
pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Buffer radius in degrees for a distance given in meters.
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}
