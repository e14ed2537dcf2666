//! GeoJSON persistence for fetched and merged datasets.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{FeatureCollection, GeoJson};

/// Write a feature collection as a GeoJSON file, creating parent
/// directories as needed.
pub fn save_feature_collection(collection: &FeatureCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string(collection).context("failed to serialize GeoJSON")?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read a feature collection back from a GeoJSON file.
pub fn load_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let geojson: GeoJson = body
        .parse()
        .with_context(|| format!("invalid GeoJSON in {}", path.display()))?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => anyhow::bail!("{} does not contain a FeatureCollection", path.display()),
    }
}
