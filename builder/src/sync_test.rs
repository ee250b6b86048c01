use uuid::Uuid;

use super::*;

fn uid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[test]
fn new_tracker_is_empty() {
    let tracker = SyncTracker::new();
    assert!(tracker.pending().is_empty());
    assert!(!tracker.has_unconfirmed());
    assert!(!tracker.needs_reconcile());
}

#[test]
fn record_assigns_increasing_seqs() {
    let mut tracker = SyncTracker::new();
    let a = tracker.record(MutationKind::Create(uid(1)));
    let b = tracker.record(MutationKind::Update(uid(1)));
    assert!(b > a);
    assert_eq!(tracker.pending().len(), 2);
}

#[test]
fn recorded_mutation_starts_applied_locally() {
    let mut tracker = SyncTracker::new();
    tracker.record(MutationKind::Create(uid(1)));
    assert_eq!(tracker.pending()[0].state, MutationState::AppliedLocally);
    assert!(tracker.has_unconfirmed());
}

#[test]
fn confirm_transitions_to_confirmed() {
    let mut tracker = SyncTracker::new();
    let seq = tracker.record(MutationKind::Create(uid(1)));
    assert!(tracker.confirm(seq));
    assert_eq!(tracker.pending()[0].state, MutationState::Confirmed);
    assert!(!tracker.has_unconfirmed());
}

#[test]
fn confirm_unknown_seq_returns_false() {
    let mut tracker = SyncTracker::new();
    assert!(!tracker.confirm(42));
}

#[test]
fn gc_drops_confirmed_entries() {
    let mut tracker = SyncTracker::new();
    let a = tracker.record(MutationKind::Create(uid(1)));
    tracker.record(MutationKind::Update(uid(1)));
    tracker.confirm(a);

    assert_eq!(tracker.gc(), 1);
    assert_eq!(tracker.pending().len(), 1);
    assert!(tracker.has_unconfirmed());
}

#[test]
fn fail_flags_reconciliation() {
    let mut tracker = SyncTracker::new();
    let seq = tracker.record(MutationKind::Delete(vec![uid(1), uid(2)]));
    assert!(tracker.fail(seq));
    assert!(tracker.needs_reconcile());
    assert!(tracker.pending().is_empty());
}

#[test]
fn fail_unknown_seq_does_not_flag() {
    let mut tracker = SyncTracker::new();
    assert!(!tracker.fail(42));
    assert!(!tracker.needs_reconcile());
}

#[test]
fn fail_leaves_other_mutations_tracked() {
    let mut tracker = SyncTracker::new();
    let a = tracker.record(MutationKind::Create(uid(1)));
    tracker.record(MutationKind::Move(vec![uid(1)]));
    tracker.fail(a);
    assert_eq!(tracker.pending().len(), 1);
    assert!(matches!(tracker.pending()[0].kind, MutationKind::Move(_)));
}

#[test]
fn clear_resets_everything() {
    let mut tracker = SyncTracker::new();
    let seq = tracker.record(MutationKind::Create(uid(1)));
    tracker.fail(seq);
    tracker.record(MutationKind::Update(uid(2)));

    tracker.clear();
    assert!(tracker.pending().is_empty());
    assert!(!tracker.needs_reconcile());
    assert!(!tracker.has_unconfirmed());
}

#[test]
fn seqs_are_not_reused_after_clear() {
    let mut tracker = SyncTracker::new();
    let a = tracker.record(MutationKind::Create(uid(1)));
    tracker.clear();
    let b = tracker.record(MutationKind::Create(uid(2)));
    assert!(b > a);
}
