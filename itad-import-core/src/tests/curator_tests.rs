use super::*;
use crate::record::{LookupMethod, Price, PurchaseRecord};

fn record(title: &str, offer_id: &str) -> PurchaseRecord {
    PurchaseRecord {
        title: title.to_string(),
        offer_id: offer_id.to_string(),
        order_id: None,
        purchased_at: None,
        price: Price::default(),
    }
}

/// A1 and A3 matched, A2 unmatched.
fn sample() -> Selection {
    Selection::new(vec![
        ResolvedMatch::new(
            &record("Game One", "A1"),
            Some("itad-1".to_string()),
            Some(LookupMethod::OfferId),
        ),
        ResolvedMatch::unmatched(&record("Game Two", "A2")),
        ResolvedMatch::new(
            &record("Game Three", "A3"),
            Some("itad-3".to_string()),
            Some(LookupMethod::Title),
        ),
    ])
}

fn offer_ids(matches: &[ResolvedMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.source_offer_id.as_str()).collect()
}

#[test]
fn defaults_select_matched_only() {
    let sel = sample();
    assert_eq!(sel.selected_count(), 2);
    assert_eq!(sel.matched_count(), 2);
    assert_eq!(sel.unmatched_count(), 1);
    assert_eq!(offer_ids(&sel.confirm().unwrap()), vec!["A1", "A3"]);
}

#[test]
fn toggle_flips_selection() {
    let mut sel = sample();
    assert!(sel.toggle(0));
    assert!(!sel.matches()[0].selected);
    assert_eq!(offer_ids(&sel.confirm().unwrap()), vec!["A3"]);

    assert!(sel.toggle(0));
    assert!(sel.matches()[0].selected);
}

#[test]
fn toggle_out_of_bounds_is_noop() {
    let mut sel = sample();
    let before = sel.clone();
    assert!(!sel.toggle(3));
    assert_eq!(sel, before);
}

#[test]
fn toggled_unmatched_entry_is_filtered_at_confirm() {
    let mut sel = sample();
    sel.toggle(1);
    assert!(sel.matches()[1].selected);
    assert_eq!(sel.selected_count(), 3);
    assert_eq!(offer_ids(&sel.confirm().unwrap()), vec!["A1", "A3"]);
}

#[test]
fn select_all_matched_never_selects_unmatched() {
    let mut sel = sample();
    sel.toggle(1);
    sel.deselect_all();
    sel.select_all_matched();
    assert!(sel.matches()[0].selected);
    assert!(!sel.matches()[1].selected);
    assert!(sel.matches()[2].selected);
}

#[test]
fn deselect_all_clears_everything() {
    let mut sel = sample();
    sel.deselect_all();
    assert_eq!(sel.selected_count(), 0);
    assert!(matches!(sel.confirm(), Err(ImportError::NoSelection)));
}

#[test]
fn confirm_fails_when_nothing_matched() {
    let mut sel = Selection::new(vec![
        ResolvedMatch::unmatched(&record("Game One", "A1")),
        ResolvedMatch::unmatched(&record("Game Two", "A2")),
    ]);
    sel.toggle(0);
    sel.toggle(1);
    assert!(matches!(sel.confirm(), Err(ImportError::NoSelection)));
}

#[test]
fn confirm_fails_on_empty_list() {
    assert!(matches!(
        Selection::default().confirm(),
        Err(ImportError::NoSelection)
    ));
}

#[test]
fn matched_and_unmatched_keep_original_positions() {
    let sel = sample();
    let matched: Vec<usize> = sel.matched().map(|(i, _)| i).collect();
    let unmatched: Vec<usize> = sel.unmatched().map(|(i, _)| i).collect();
    assert_eq!(matched, vec![0, 2]);
    assert_eq!(unmatched, vec![1]);
    assert_eq!(sel.position("A3"), Some(2));
    assert_eq!(sel.position("missing"), None);
}
