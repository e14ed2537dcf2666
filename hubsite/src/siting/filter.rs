//! Multi-criteria parcel filtering.

use geo::Geometry as GeoGeometry;
use geojson::{Feature, FeatureCollection};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::siting::buffer::BufferRegion;
use crate::siting::error::SitingError;
use crate::siting::parcel::coerce_area;

/// One spatial constraint, in the order it is applied by [`filter_parcels`].
pub struct BufferConstraint<'a> {
    /// Tag used in log events.
    pub label: &'a str,
    /// The buffered reference geometry; `None` when the underlying dataset
    /// produced no geometry at all.
    pub region: Option<&'a BufferRegion>,
    /// Disabled constraints are skipped entirely, not applied as a
    /// zero-radius buffer.
    pub enabled: bool,
}

/// Filter a parcel collection by area threshold and spatial constraints.
///
/// The area pass is strict: a parcel whose area attribute exists but cannot
/// be coerced fails the whole batch with [`SitingError::DataFormat`], since
/// silently dropping it would corrupt every downstream area-based
/// conclusion. Parcels with no area attribute simply fail the threshold.
///
/// Spatial constraints are conjunctive and applied in order. A disabled
/// constraint imposes nothing. An *enabled* constraint whose region is
/// absent or empty fails closed — no parcel can match: "no network
/// available" must never read as "no network required".
pub fn filter_parcels(
    parcels: &FeatureCollection,
    area_field: &str,
    area_threshold: f64,
    constraints: &[BufferConstraint<'_>],
) -> Result<FeatureCollection, SitingError> {
    let total_read = parcels.features.len();

    let mut retained: Vec<Feature> = Vec::new();
    for feature in &parcels.features {
        if let Some(area) = coerce_area(feature, area_field)? {
            if area > area_threshold {
                retained.push(feature.clone());
            }
        }
    }

    for constraint in constraints {
        if !constraint.enabled {
            continue;
        }
        let region = match constraint.region {
            Some(region) if !region.is_empty()? => region,
            _ => {
                info!(
                    constraint = constraint.label,
                    "enabled constraint has no reference geometry, no parcel can match"
                );
                retained.clear();
                break;
            }
        };
        let mut surviving = Vec::with_capacity(retained.len());
        for feature in retained {
            if feature_intersects(&feature, region)? {
                surviving.push(feature);
            }
        }
        retained = surviving;
    }

    info!(
        total_read,
        total_retained = retained.len(),
        "parcel filtering done"
    );
    Ok(collection(retained))
}

/// Seed-reproducible display subset: shuffle, then truncate to `percentage`
/// of the surviving parcels, so the displayed sample is not biased toward
/// the cadastral ordering of the source file.
pub fn display_subset(parcels: FeatureCollection, percentage: u8, seed: u64) -> FeatureCollection {
    let percentage = percentage.min(100) as usize;
    let mut features = parcels.features;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    features.shuffle(&mut rng);
    let keep = features.len() * percentage / 100;
    features.truncate(keep);
    collection(features)
}

fn feature_intersects(feature: &Feature, region: &BufferRegion) -> Result<bool, SitingError> {
    let geometry = match &feature.geometry {
        Some(geometry) => geometry,
        // A parcel without geometry cannot intersect anything.
        None => return Ok(false),
    };
    let geo: GeoGeometry<f64> = geometry.clone().try_into()?;
    region.intersects(&geo)
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
