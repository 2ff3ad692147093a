use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price in the storefront's minor currency unit (cents for USD).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Price {
    pub minor: i64,
    pub currency: String,
}

impl Price {
    pub fn new(minor: i64, currency: impl Into<String>) -> Self {
        Self {
            minor,
            currency: currency.into(),
        }
    }

    /// The price in major units (`1999` -> `19.99`).
    pub fn as_decimal(&self) -> f64 {
        self.minor as f64 / 100.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)?;
        if !self.currency.is_empty() {
            write!(f, " {}", self.currency)?;
        }
        Ok(())
    }
}

/// One purchased item extracted from the order export.
///
/// Created by the parser and never mutated afterwards. `offer_id` is unique
/// within a single parse result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub title: String,
    pub offer_id: String,
    pub order_id: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub price: Price,
}

/// How a record was matched to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupMethod {
    /// Matched by the storefront's offer id (exact phase)
    OfferId,
    /// Matched by title search (fallback phase)
    Title,
}

impl std::fmt::Display for LookupMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupMethod::OfferId => write!(f, "offer id"),
            LookupMethod::Title => write!(f, "title"),
        }
    }
}

/// A purchase record paired with its catalog resolution.
///
/// Only `selected` changes after creation, and only through
/// [`Selection`](crate::Selection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMatch {
    pub source_title: String,
    pub source_offer_id: String,
    pub catalog_id: Option<String>,
    pub catalog_title: Option<String>,
    pub method: Option<LookupMethod>,
    pub selected: bool,
}

impl ResolvedMatch {
    /// Build a match for `record`. Selection defaults to whether a catalog id
    /// was found.
    ///
    /// The lookup endpoints only return ids, so the catalog title shown for a
    /// match is the storefront title.
    pub fn new(record: &PurchaseRecord, catalog_id: Option<String>, method: Option<LookupMethod>) -> Self {
        let catalog_title = catalog_id.as_ref().map(|_| record.title.clone());
        let selected = catalog_id.is_some();
        Self {
            source_title: record.title.clone(),
            source_offer_id: record.offer_id.clone(),
            catalog_id,
            catalog_title,
            method: method.filter(|_| selected),
            selected,
        }
    }

    pub fn unmatched(record: &PurchaseRecord) -> Self {
        Self::new(record, None, None)
    }

    pub fn is_matched(&self) -> bool {
        self.catalog_id.is_some()
    }

    /// Whether this entry would survive `confirm()`.
    pub fn is_importable(&self) -> bool {
        self.selected && self.catalog_id.is_some()
    }
}

/// Counts reported by the declarative category sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncOutcome {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub removed: u64,
}

/// Result of committing a selection to the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Additive mode: number of catalog ids submitted and accepted.
    Added { count: usize },
    /// Declarative mode: the category now holds exactly the submitted set.
    Synced(SyncOutcome),
}

impl std::fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitOutcome::Added { count } => write!(f, "added {} games", count),
            CommitOutcome::Synced(s) => write!(
                f,
                "{} added, {} removed, {} total",
                s.added, s.removed, s.total
            ),
        }
    }
}
