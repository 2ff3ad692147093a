use itad_import_core::*;

const EXPORT: &str = r#"[
    {
        "orderType": "PURCHASE",
        "orderId": "O1",
        "createdAtMillis": 1700000000000,
        "items": [
            {"offerId": "A1", "description": "Game One", "amount": 1999, "currency": "USD", "quantity": 1},
            {"offerId": "A2", "description": "Game Two", "amount": 0, "currency": "USD", "quantity": 1}
        ]
    },
    {
        "orderType": "PURCHASE",
        "orderId": "O2",
        "createdAtMillis": 1700000500000,
        "items": [
            {"offerId": "A1", "description": "Game One", "amount": 1999, "currency": "USD"},
            {"offerId": "A3", "description": "Game Three", "amount": 499, "currency": "USD"}
        ]
    }
]"#;

#[test]
fn parse_never_emits_duplicate_offer_ids() {
    let records = load_purchases(EXPORT).unwrap();
    let mut ids: Vec<&str> = records.iter().map(|r| r.offer_id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A2", "A3"]);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), records.len());
}

#[test]
fn session_commits_only_matched_selection() {
    let records = load_purchases(EXPORT).unwrap();
    let mut session = ImportSession::new();
    let ticket = session.load(records.clone()).unwrap();

    // A2 did not resolve; A3 resolved through the title fallback.
    let matches = vec![
        ResolvedMatch::new(&records[0], Some("itad-1".into()), Some(LookupMethod::OfferId)),
        ResolvedMatch::unmatched(&records[1]),
        ResolvedMatch::new(&records[2], Some("itad-3".into()), Some(LookupMethod::Title)),
    ];
    session.apply_resolution(ticket, matches).unwrap();

    let selection = session.selection_mut().unwrap();
    selection.toggle(1);
    selection.toggle(2);

    let confirmed = session.confirm().unwrap();
    let ids: Vec<&str> = confirmed
        .iter()
        .filter_map(|m| m.catalog_id.as_deref())
        .collect();
    assert_eq!(ids, vec!["itad-1"]);
}
