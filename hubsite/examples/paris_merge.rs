use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use hubsite::collect::http::Fetcher;
use hubsite::collect::{cadastre, storage};
use hubsite::siting::merge::merge_district_files;

/// Example: per-arrondissement download and merge for Paris (INSEE 75056).
///
/// Paris publishes its cadastre per arrondissement; this downloads the 20
/// district files, then merges them into one commune-wide collection under
/// the 4000 m² threshold and discards the district files.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let fetcher = Fetcher::new(Duration::from_secs(1))?;
    let data_dir = PathBuf::from("./data/parcelles");

    let codes = cadastre::arrondissement_codes("75056").expect("Paris has arrondissements");
    println!("Downloading {} arrondissements...", codes.len());
    let datasets = cadastre::fetch_arrondissement_parcels(&fetcher, &codes);

    let mut sources = Vec::new();
    for (code, dataset) in &datasets {
        let path = data_dir.join(format!("parcelles_{code}.geojson"));
        storage::save_feature_collection(dataset, &path)?;
        println!("  - {} ({} parcels)", path.display(), dataset.features.len());
        sources.push(path);
    }

    let output = data_dir.join("parcelles_75056.geojson");
    let report = merge_district_files(&sources, &output, "contenance", 4000.0, true)?;
    println!(
        "Merged {} features read, {} retained -> {}",
        report.total_read,
        report.total_retained,
        output.display()
    );

    Ok(())
}
