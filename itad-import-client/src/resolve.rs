//! Two-phase catalog resolution.
//!
//! 1. Exact phase: every offer id goes out in one batched lookup against the
//!    storefront-identifier index.
//! 2. Fallback phase: offer ids the exact phase left unresolved are looked up
//!    by title in one batched call. A hit overwrites the null.
//!
//! A failing exact phase is an error the user retries. A failing fallback
//! phase is logged and skipped, leaving the exact-phase results as they were.

use std::collections::{HashMap, HashSet};

use itad_import_core::{LookupMethod, PurchaseRecord, ResolvedMatch};

use crate::error::ApiError;

/// Batched catalog lookups used by [`resolve`].
#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    /// Exact lookup: offer id -> catalog id (null when unknown).
    async fn lookup_offer_ids(
        &self,
        offer_ids: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError>;

    /// Fuzzy lookup: title -> catalog id (null when nothing matched).
    async fn lookup_titles(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, Option<String>>, ApiError>;
}

/// A catalog id and the phase that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub id: String,
    pub method: LookupMethod,
}

/// Offer id -> catalog match, one entry per distinct input offer id, in input
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    entries: Vec<(String, Option<CatalogMatch>)>,
    index: HashMap<String, usize>,
}

impl Resolution {
    fn insert(&mut self, offer_id: String, found: Option<CatalogMatch>) {
        match self.index.get(&offer_id) {
            Some(&i) => self.entries[i].1 = found,
            None => {
                self.index.insert(offer_id.clone(), self.entries.len());
                self.entries.push((offer_id, found));
            }
        }
    }

    /// `None` when the offer id was never submitted, `Some(None)` when it
    /// was submitted but neither phase matched it.
    pub fn get(&self, offer_id: &str) -> Option<Option<&CatalogMatch>> {
        self.index
            .get(offer_id)
            .map(|&i| self.entries[i].1.as_ref())
    }

    pub fn catalog_id(&self, offer_id: &str) -> Option<&str> {
        self.get(offer_id).flatten().map(|m| m.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CatalogMatch>)> {
        self.entries.iter().map(|(id, m)| (id.as_str(), m.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|(_, m)| m.is_some()).count()
    }

    fn unresolved(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, m)| m.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Pair each record with its resolution, in record order.
    pub fn matches_for(&self, records: &[PurchaseRecord]) -> Vec<ResolvedMatch> {
        records
            .iter()
            .map(|record| match self.get(&record.offer_id).flatten() {
                Some(m) => ResolvedMatch::new(record, Some(m.id.clone()), Some(m.method)),
                None => ResolvedMatch::unmatched(record),
            })
            .collect()
    }
}

/// Resolve every record's offer id to a catalog id.
pub async fn resolve<L: CatalogLookup>(
    lookup: &L,
    records: &[PurchaseRecord],
) -> Result<Resolution, ApiError> {
    let mut offer_ids = Vec::with_capacity(records.len());
    let mut title_of: HashMap<&str, &str> = HashMap::new();
    for record in records {
        if !title_of.contains_key(record.offer_id.as_str()) {
            title_of.insert(&record.offer_id, &record.title);
            offer_ids.push(record.offer_id.clone());
        }
    }

    let mut resolution = Resolution::default();
    if offer_ids.is_empty() {
        return Ok(resolution);
    }

    // Exact phase
    let exact = lookup.lookup_offer_ids(&offer_ids).await?;
    for offer_id in &offer_ids {
        let found = exact
            .get(offer_id)
            .cloned()
            .flatten()
            .filter(|id| !id.is_empty())
            .map(|id| CatalogMatch {
                id,
                method: LookupMethod::OfferId,
            });
        resolution.insert(offer_id.clone(), found);
    }
    log::debug!(
        "Offer id lookup matched {} of {}",
        resolution.matched_count(),
        resolution.len()
    );

    // Fallback phase
    let unresolved = resolution.unresolved();
    if unresolved.is_empty() {
        return Ok(resolution);
    }

    let mut seen = HashSet::new();
    let titles: Vec<String> = unresolved
        .iter()
        .filter_map(|id| title_of.get(id.as_str()).copied())
        .filter(|title| seen.insert(*title))
        .map(str::to_string)
        .collect();

    match lookup.lookup_titles(&titles).await {
        Ok(by_title) => {
            for offer_id in unresolved {
                let Some(title) = title_of.get(offer_id.as_str()) else {
                    continue;
                };
                let found = by_title
                    .get(*title)
                    .cloned()
                    .flatten()
                    .filter(|id| !id.is_empty());
                if let Some(id) = found {
                    resolution.insert(
                        offer_id,
                        Some(CatalogMatch {
                            id,
                            method: LookupMethod::Title,
                        }),
                    );
                }
            }
        }
        Err(e) => {
            log::warn!(
                "Title lookup failed, keeping offer id matches only: {}",
                e
            );
        }
    }

    log::debug!(
        "Resolved {} of {} offers",
        resolution.matched_count(),
        resolution.len()
    );
    Ok(resolution)
}
