use serde::{Deserialize, Serialize};

/// Filtering criteria for one siting run.
///
/// An explicit structure passed into the pipeline, replacing any ambient
/// per-session state: every knob an operator can turn lives here, and a
/// criteria value fully determines the pipeline's behavior for a given set
/// of inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitingCriteria {
    /// Name of the parcel attribute holding the area in square meters.
    pub area_field: String,
    /// Parcels must have an area strictly greater than this, in m².
    pub area_threshold: f64,
    /// Radius of the urban-center buffer, in kilometers.
    pub urban_buffer_km: f64,
    pub urban_buffer_enabled: bool,
    /// Radius of the HTA network buffer, in meters.
    pub network_buffer_m: f64,
    pub network_buffer_enabled: bool,
    /// Radius of the road-axis buffer, in meters.
    pub axis_buffer_m: f64,
    pub axis_buffer_enabled: bool,
    /// Share of the surviving parcels kept for display, 0..=100.
    pub display_percentage: u8,
    /// Seed for the display shuffle; a fixed seed reproduces the subset.
    pub display_seed: u64,
}

impl Default for SitingCriteria {
    fn default() -> Self {
        SitingCriteria {
            area_field: "contenance".to_string(),
            area_threshold: 4000.0,
            urban_buffer_km: 5.0,
            urban_buffer_enabled: true,
            network_buffer_m: 100.0,
            network_buffer_enabled: true,
            axis_buffer_m: 5000.0,
            axis_buffer_enabled: false,
            display_percentage: 100,
            display_seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_json() {
        let criteria = SitingCriteria::default();
        let json = serde_json::to_string(&criteria).unwrap();
        let back: SitingCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back.area_field, "contenance");
        assert_eq!(back.area_threshold, 4000.0);
        assert_eq!(back.display_percentage, 100);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let criteria: SitingCriteria =
            serde_json::from_str(r#"{"area_threshold": 2500.0, "axis_buffer_enabled": true}"#)
                .unwrap();
        assert_eq!(criteria.area_threshold, 2500.0);
        assert!(criteria.axis_buffer_enabled);
        assert_eq!(criteria.urban_buffer_km, 5.0);
    }
}
