//! HTTP owner-lookup client over the majic open parcels endpoint.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::collect::http::Fetcher;
use crate::siting::enrich::{OwnerLookup, OwnerRecord};

/// Owner-lookup collaborator backed by the majic `parcelles/proprietaires`
/// endpoint.
///
/// The endpoint is keyed per account, so callers pass the full base URL
/// including their key segment. One GET per batch, identifiers joined into
/// the `id_par[in]` parameter — which is why batches are capped well under
/// the URL-length limit (see
/// [`crate::siting::enrich::DEFAULT_BATCH_SIZE`]).
pub struct MajicOwnerClient<'a> {
    fetcher: &'a Fetcher,
    base_url: String,
}

impl<'a> MajicOwnerClient<'a> {
    pub fn new(fetcher: &'a Fetcher, base_url: impl Into<String>) -> Self {
        MajicOwnerClient {
            fetcher,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwnersResponse {
    #[serde(default)]
    proprietaires: Vec<Proprietaire>,
}

#[derive(Debug, Deserialize)]
struct Proprietaire {
    idprodroit: String,
    #[serde(default)]
    denomination: Option<String>,
    #[serde(default)]
    parcelles: Vec<Parcelle>,
}

#[derive(Debug, Deserialize)]
struct Parcelle {
    id_par: String,
}

fn records_from_response(response: OwnersResponse) -> Vec<OwnerRecord> {
    response
        .proprietaires
        .into_iter()
        .map(|owner| OwnerRecord {
            owner_id: owner.idprodroit,
            display_name: owner.denomination,
            parcel_ids: owner
                .parcelles
                .into_iter()
                .map(|parcelle| parcelle.id_par)
                .collect(),
        })
        .collect()
}

impl OwnerLookup for MajicOwnerClient<'_> {
    fn lookup_batch(&self, parcel_ids: &[String]) -> Result<Vec<OwnerRecord>> {
        let request = self.fetcher.client().get(&self.base_url).query(&[
            ("id_par[in]", parcel_ids.join(",").as_str()),
            ("sogefi_annee_archivee", "_last_"),
        ]);
        let response: OwnersResponse = self
            .fetcher
            .send(request)?
            .json()
            .context("failed to decode owners response")?;
        Ok(records_from_response(response))
    }
}
