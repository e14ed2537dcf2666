//! Merging of per-arrondissement parcel collections.
//!
//! Big cities publish cadastral data per arrondissement; the pipeline wants
//! one commune-wide collection. Merging operates over already-fetched,
//! possibly heterogeneous data, so individually malformed features are
//! skipped with a warning rather than failing the merge.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection};
use tracing::{info, warn};

use crate::collect::storage;
use crate::siting::parcel::coerce_area;

/// Counts reported by one merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub total_read: usize,
    pub total_retained: usize,
}

/// Concatenate district collections into one, keeping only features whose
/// area attribute strictly exceeds the threshold.
pub fn merge_districts(
    districts: Vec<FeatureCollection>,
    area_field: &str,
    area_threshold: f64,
) -> (FeatureCollection, MergeReport) {
    let mut total_read = 0;
    let mut merged: Vec<Feature> = Vec::new();

    for district in districts {
        for feature in district.features {
            total_read += 1;
            match coerce_area(&feature, area_field) {
                Ok(Some(area)) if area > area_threshold => merged.push(feature),
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "skipping malformed feature during merge");
                }
            }
        }
    }

    let report = MergeReport {
        total_read,
        total_retained: merged.len(),
    };
    info!(
        total_read = report.total_read,
        total_retained = report.total_retained,
        "district merge done"
    );
    (
        FeatureCollection {
            bbox: None,
            features: merged,
            foreign_members: None,
        },
        report,
    )
}

/// File-backed merge for multi-district cities.
///
/// Reads every district file, merges under the threshold, writes the merged
/// collection to `output`, and only then — once the merged output is
/// durably on disk — optionally removes the per-district source files.
pub fn merge_district_files(
    sources: &[PathBuf],
    output: &Path,
    area_field: &str,
    area_threshold: f64,
    discard_sources: bool,
) -> Result<MergeReport> {
    let mut districts = Vec::with_capacity(sources.len());
    for source in sources {
        districts.push(storage::load_feature_collection(source)?);
    }

    let (merged, report) = merge_districts(districts, area_field, area_threshold);
    storage::save_feature_collection(&merged, output)?;

    if discard_sources {
        for source in sources {
            fs::remove_file(source)
                .with_context(|| format!("failed to remove district file {}", source.display()))?;
        }
    }
    Ok(report)
}
