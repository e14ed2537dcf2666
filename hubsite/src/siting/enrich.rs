//! Ownership enrichment of filtered parcels.
//!
//! Ownership data is expensive to fetch and supplementary by nature: the
//! enricher only queries parcels that can survive the area threshold, and a
//! failed lookup batch leaves its identifiers unenriched instead of
//! aborting the pass.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use geojson::FeatureCollection;
use tracing::{info, warn};

use crate::siting::parcel::{coerce_area, parcel_id};

/// Default number of identifiers per lookup call, chosen to keep the
/// upstream query string under the transport URL-length limit.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// One owner entry as reported by the lookup collaborator.
#[derive(Debug, Clone)]
pub struct OwnerRecord {
    pub owner_id: String,
    pub display_name: Option<String>,
    pub parcel_ids: Vec<String>,
}

/// Batched parcel-owner lookup.
///
/// Implemented over HTTP by [`crate::collect::owners::MajicOwnerClient`] and
/// by in-memory tables in tests, so enrichment never depends on a live
/// endpoint to be exercised.
pub trait OwnerLookup {
    fn lookup_batch(&self, parcel_ids: &[String]) -> anyhow::Result<Vec<OwnerRecord>>;
}

/// Owner identifier → owned parcels, accumulated across batches.
#[derive(Debug, Default)]
pub struct OwnerDirectory {
    owners: BTreeMap<String, OwnerEntry>,
}

#[derive(Debug, Default)]
struct OwnerEntry {
    display_name: Option<String>,
    parcels: BTreeSet<String>,
}

impl OwnerDirectory {
    /// Fold one batch of records in. Parcel membership is a set: an owner
    /// reported by several overlapping batches accumulates parcels without
    /// duplication.
    pub fn absorb(&mut self, records: Vec<OwnerRecord>) {
        for record in records {
            let entry = self.owners.entry(record.owner_id).or_default();
            if entry.display_name.is_none() {
                entry.display_name = record.display_name;
            }
            entry.parcels.extend(record.parcel_ids);
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Display label for every owner of `parcel`, in owner-identifier order
    /// so repeated runs produce identical attributes.
    fn owner_names_for(&self, parcel: &str) -> Vec<&str> {
        self.owners
            .iter()
            .filter(|(_, entry)| entry.parcels.contains(parcel))
            .map(|(id, entry)| entry.display_name.as_deref().unwrap_or(id.as_str()))
            .collect()
    }
}

/// Counts reported by one enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichReport {
    pub identifiers_queried: usize,
    pub batches_sent: usize,
    pub batches_failed: usize,
    pub parcels_annotated: usize,
}

/// Attach an `owner_name` attribute to every parcel the lookup collaborator
/// knows an owner for.
///
/// Identifiers of parcels above the area threshold are deduplicated in
/// first-seen order and partitioned into `batch_size` chunks, one lookup
/// call per chunk. Re-running with the same collaborator overwrites the
/// same attributes: enrichment is idempotent.
pub fn enrich_owners<L: OwnerLookup + ?Sized>(
    mut parcels: FeatureCollection,
    area_field: &str,
    area_threshold: f64,
    lookup: &L,
    batch_size: usize,
) -> (FeatureCollection, EnrichReport) {
    let ids = qualifying_ids(&parcels, area_field, area_threshold);
    let mut report = EnrichReport {
        identifiers_queried: ids.len(),
        ..EnrichReport::default()
    };

    let mut directory = OwnerDirectory::default();
    for batch in ids.chunks(batch_size.max(1)) {
        report.batches_sent += 1;
        match lookup.lookup_batch(batch) {
            Ok(records) => directory.absorb(records),
            Err(error) => {
                report.batches_failed += 1;
                warn!(
                    batch_len = batch.len(),
                    %error,
                    "owner lookup batch failed, its identifiers stay unenriched"
                );
            }
        }
    }

    for feature in &mut parcels.features {
        let id = match parcel_id(feature) {
            Some(id) => id,
            None => continue,
        };
        let names = directory.owner_names_for(&id);
        if !names.is_empty() {
            feature.set_property("owner_name", names.join(", "));
            report.parcels_annotated += 1;
        }
    }

    info!(
        identifiers = report.identifiers_queried,
        batches = report.batches_sent,
        failed = report.batches_failed,
        annotated = report.parcels_annotated,
        "ownership enrichment done"
    );
    (parcels, report)
}

/// Identifiers of parcels above the area threshold, deduplicated in
/// first-seen order (stable batch boundaries across runs).
///
/// Coercion failures are tolerated here: enrichment operates on
/// already-filtered data and must not abort sibling parcels.
fn qualifying_ids(parcels: &FeatureCollection, area_field: &str, area_threshold: f64) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for feature in &parcels.features {
        let area = match coerce_area(feature, area_field) {
            Ok(Some(area)) => area,
            Ok(None) => continue,
            Err(error) => {
                warn!(%error, "skipping parcel with malformed area attribute");
                continue;
            }
        };
        if area <= area_threshold {
            continue;
        }
        let id = match parcel_id(feature) {
            Some(id) => id,
            None => continue,
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}
