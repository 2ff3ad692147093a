//! User curation of resolved matches before committing.

use crate::error::ImportError;
use crate::record::ResolvedMatch;

/// The list of resolved matches plus the user's selection over it.
///
/// All mutation goes through the methods here. `selected` may transiently
/// be set on an unmatched entry via [`toggle`](Self::toggle); such entries
/// are filtered out by [`confirm`](Self::confirm).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    matches: Vec<ResolvedMatch>,
}

impl Selection {
    pub fn new(matches: Vec<ResolvedMatch>) -> Self {
        Self { matches }
    }

    /// Flip `selected` for the entry at `index`. Returns `false` (and does
    /// nothing) when the index is out of bounds.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.matches.get_mut(index) {
            Some(m) => {
                m.selected = !m.selected;
                true
            }
            None => false,
        }
    }

    /// Select every matched entry and deselect everything else.
    pub fn select_all_matched(&mut self) {
        for m in &mut self.matches {
            m.selected = m.catalog_id.is_some();
        }
    }

    pub fn deselect_all(&mut self) {
        for m in &mut self.matches {
            m.selected = false;
        }
    }

    /// The entries to commit: selected and matched.
    pub fn confirm(&self) -> Result<Vec<ResolvedMatch>, ImportError> {
        let confirmed: Vec<ResolvedMatch> = self
            .matches
            .iter()
            .filter(|m| m.is_importable())
            .cloned()
            .collect();

        if confirmed.is_empty() {
            return Err(ImportError::NoSelection);
        }
        Ok(confirmed)
    }

    pub fn matches(&self) -> &[ResolvedMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matched entries with their positions in the full list.
    pub fn matched(&self) -> impl Iterator<Item = (usize, &ResolvedMatch)> {
        self.matches.iter().enumerate().filter(|(_, m)| m.is_matched())
    }

    pub fn unmatched(&self) -> impl Iterator<Item = (usize, &ResolvedMatch)> {
        self.matches.iter().enumerate().filter(|(_, m)| !m.is_matched())
    }

    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_matched()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.matches.len() - self.matched_count()
    }

    pub fn selected_count(&self) -> usize {
        self.matches.iter().filter(|m| m.selected).count()
    }

    /// Position of the entry for `offer_id`, if present.
    pub fn position(&self, offer_id: &str) -> Option<usize> {
        self.matches.iter().position(|m| m.source_offer_id == offer_id)
    }
}

#[cfg(test)]
#[path = "tests/curator_tests.rs"]
mod tests;
