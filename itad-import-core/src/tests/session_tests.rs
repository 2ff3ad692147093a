use super::*;
use crate::error::ImportError;
use crate::record::{LookupMethod, Price, SyncOutcome};

fn record(title: &str, offer_id: &str) -> PurchaseRecord {
    PurchaseRecord {
        title: title.to_string(),
        offer_id: offer_id.to_string(),
        order_id: None,
        purchased_at: None,
        price: Price::default(),
    }
}

fn records() -> Vec<PurchaseRecord> {
    vec![record("Game One", "A1"), record("Game Two", "A2")]
}

fn resolved(records: &[PurchaseRecord]) -> Vec<ResolvedMatch> {
    vec![
        ResolvedMatch::new(
            &records[0],
            Some("itad-1".to_string()),
            Some(LookupMethod::OfferId),
        ),
        ResolvedMatch::unmatched(&records[1]),
    ]
}

#[test]
fn happy_path_walks_every_step() {
    let mut session = ImportSession::new();
    assert_eq!(session.step(), WizardStep::Input);

    let ticket = session.load(records()).unwrap();
    assert_eq!(session.step(), WizardStep::Match);

    let matches = resolved(session.records());
    session.apply_resolution(ticket, matches).unwrap();
    assert_eq!(session.selection().matched_count(), 1);

    let confirmed = session.confirm().unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(session.step(), WizardStep::Confirm);

    let commit = session.begin_commit().unwrap();
    session
        .finish(commit, CommitOutcome::Added { count: 1 })
        .unwrap();
    assert_eq!(session.step(), WizardStep::Result);
    assert_eq!(session.outcome(), Some(CommitOutcome::Added { count: 1 }));
}

#[test]
fn result_after_back_is_stale() {
    let mut session = ImportSession::new();
    let ticket = session.load(records()).unwrap();
    session.back();
    assert_eq!(session.step(), WizardStep::Input);

    let matches = resolved(&records());
    let err = session.apply_resolution(ticket, matches).unwrap_err();
    assert!(matches!(err, SessionError::Stale { .. }));
    assert!(session.selection().is_empty());
}

#[test]
fn retry_invalidates_earlier_ticket() {
    let mut session = ImportSession::new();
    let first = session.load(records()).unwrap();
    let second = session.retry_resolution().unwrap();
    assert_ne!(first, second);

    let err = session
        .apply_resolution(first, resolved(&records()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Stale { .. }));

    session
        .apply_resolution(second, resolved(&records()))
        .unwrap();
    assert_eq!(session.selection().len(), 2);
}

#[test]
fn commit_result_after_reset_is_discarded() {
    let mut session = ImportSession::new();
    let ticket = session.load(records()).unwrap();
    session.apply_resolution(ticket, resolved(&records())).unwrap();
    session.confirm().unwrap();
    let commit = session.begin_commit().unwrap();

    session.reset();
    let outcome = CommitOutcome::Synced(SyncOutcome::default());
    assert!(matches!(
        session.finish(commit, outcome),
        Err(SessionError::Stale { .. })
    ));
    assert_eq!(session.step(), WizardStep::Input);
    assert!(session.records().is_empty());
    assert!(session.outcome().is_none());
}

#[test]
fn confirm_with_nothing_selected_stays_on_match() {
    let mut session = ImportSession::new();
    let ticket = session.load(records()).unwrap();
    session.apply_resolution(ticket, resolved(&records())).unwrap();
    session.selection_mut().unwrap().deselect_all();

    let err = session.confirm().unwrap_err();
    assert!(matches!(err, SessionError::Import(ImportError::NoSelection)));
    assert_eq!(session.step(), WizardStep::Match);
}

#[test]
fn selection_is_locked_outside_match_step() {
    let mut session = ImportSession::new();
    assert!(matches!(
        session.selection_mut(),
        Err(SessionError::WrongStep { .. })
    ));

    let ticket = session.load(records()).unwrap();
    session.apply_resolution(ticket, resolved(&records())).unwrap();
    session.confirm().unwrap();
    assert!(session.selection_mut().is_err());

    session.back();
    assert_eq!(session.step(), WizardStep::Match);
    assert!(session.confirmed().is_empty());
    assert!(session.selection_mut().is_ok());
}

#[test]
fn load_requires_input_step() {
    let mut session = ImportSession::new();
    session.load(records()).unwrap();
    assert!(matches!(
        session.load(records()),
        Err(SessionError::WrongStep {
            step: WizardStep::Match,
            ..
        })
    ));
}

#[test]
fn back_from_result_does_not_allow_second_commit() {
    let mut session = ImportSession::new();
    let ticket = session.load(records()).unwrap();
    let matches = resolved(session.records());
    session.apply_resolution(ticket, matches).unwrap();
    session.confirm().unwrap();
    let commit = session.begin_commit().unwrap();
    session
        .finish(commit, CommitOutcome::Added { count: 1 })
        .unwrap();

    session.back();
    assert_eq!(session.step(), WizardStep::Result);
    assert!(matches!(
        session.begin_commit(),
        Err(SessionError::WrongStep { .. })
    ));
    assert_eq!(session.outcome(), Some(CommitOutcome::Added { count: 1 }));

    session.reset();
    assert_eq!(session.step(), WizardStep::Input);
    assert_eq!(session.outcome(), None);
}
