//! Cadastral parcel acquisition from the cadastre.data.gouv.fr bundler.

use anyhow::{Context, Result};
use geojson::{FeatureCollection, GeoJson};
use tracing::{info, warn};

use crate::collect::http::Fetcher;

const BUNDLER_URL: &str = "https://cadastre.data.gouv.fr/bundler/cadastre-etalab/communes";

/// Download the cadastral parcel collection for one commune, keyed by its
/// INSEE code.
pub fn fetch_commune_parcels(fetcher: &Fetcher, insee_code: &str) -> Result<FeatureCollection> {
    let url = format!("{BUNDLER_URL}/{insee_code}/geojson/parcelles");
    let body = fetcher
        .send(fetcher.client().get(&url))?
        .text()
        .with_context(|| format!("failed to read parcel payload for commune {insee_code}"))?;
    let geojson: GeoJson = body
        .parse()
        .with_context(|| format!("invalid parcel GeoJSON for commune {insee_code}"))?;
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            info!(commune = insee_code, parcels = fc.features.len(), "fetched parcels");
            Ok(fc)
        }
        _ => anyhow::bail!("parcel payload for commune {insee_code} is not a FeatureCollection"),
    }
}

/// Download parcels for every arrondissement of a multi-district city.
///
/// A failing district is logged and skipped so one outage does not lose the
/// whole city; the surviving datasets feed the merger.
pub fn fetch_arrondissement_parcels(
    fetcher: &Fetcher,
    district_codes: &[String],
) -> Vec<(String, FeatureCollection)> {
    let mut datasets = Vec::new();
    for code in district_codes {
        match fetch_commune_parcels(fetcher, code) {
            Ok(fc) => datasets.push((code.clone(), fc)),
            Err(error) => {
                warn!(district = code.as_str(), %error, "failed to fetch district parcels");
            }
        }
    }
    datasets
}

/// Arrondissement INSEE codes for the cities whose cadastre is published
/// per district rather than commune-wide.
pub fn arrondissement_codes(insee_global: &str) -> Option<Vec<String>> {
    let (prefix, first, count) = match insee_global {
        // Paris
        "75056" => (75100, 1, 20),
        // Marseille
        "13055" => (13200, 1, 16),
        // Lyon
        "69123" => (69380, 1, 9),
        _ => return None,
    };
    Some(
        (first..first + count)
            .map(|i| format!("{}", prefix + i))
            .collect(),
    )
}
