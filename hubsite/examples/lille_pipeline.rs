use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use hubsite::collect::http::Fetcher;
use hubsite::collect::owners::MajicOwnerClient;
use hubsite::collect::{cadastre, enedis, nominatim, overpass};
use hubsite::siting::criteria::SitingCriteria;
use hubsite::siting::enrich::{enrich_owners, DEFAULT_BATCH_SIZE};
use hubsite::siting::pipeline::SitingPipeline;

/// Example: full siting run for Lille (INSEE 59350).
///
/// Fetches the cadastral parcels, the HTA network and the major road axes,
/// then filters parcels to those above 4000 m² that sit close to both the
/// urban center and the network. Set `MAJIC_BASE_URL` to also enrich the
/// candidates with owner names.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let fetcher = Fetcher::new(Duration::from_secs(1))?;

    println!("Geocoding Lille...");
    let city = nominatim::geocode_city(&fetcher, "Lille, France")?;
    println!("  - center: ({:.4}, {:.4})", city.center.x(), city.center.y());

    println!("Downloading parcels for commune 59350...");
    let parcels = cadastre::fetch_commune_parcels(&fetcher, "59350")?;
    println!("  - {} parcels", parcels.features.len());

    println!("Downloading HTA network...");
    let network = enedis::fetch_hta_lines(&fetcher, &city.bbox, enedis::HTA_DATASET)?;
    println!("  - {} line segments", network.len());

    println!("Downloading road axes...");
    let axes = overpass::fetch_road_axes(&fetcher, &city.bbox)?;
    println!("  - {} ways", axes.len());

    let mut pipeline = SitingPipeline::new(SitingCriteria::default());
    pipeline.set_parcels(parcels);
    pipeline.set_urban_center(city.center);
    pipeline.set_network_lines(network);
    pipeline.set_road_axes(axes);
    let pipeline = pipeline.run()?;

    let mut candidates = pipeline
        .get_geojson()
        .expect("run() completed")
        .clone();
    println!("Candidate parcels: {}", candidates.features.len());

    if let Ok(base_url) = std::env::var("MAJIC_BASE_URL") {
        println!("Enriching candidates with owner names...");
        let lookup = MajicOwnerClient::new(&fetcher, base_url);
        let (enriched, report) = enrich_owners(
            candidates,
            "contenance",
            4000.0,
            &lookup,
            DEFAULT_BATCH_SIZE,
        );
        println!(
            "  - {} batches sent, {} failed, {} parcels annotated",
            report.batches_sent, report.batches_failed, report.parcels_annotated
        );
        candidates = enriched;
    }

    let output = Path::new("./candidates_59350.geojson");
    hubsite::collect::storage::save_feature_collection(&candidates, output)?;
    println!("Saved to {}", output.display());

    Ok(())
}
