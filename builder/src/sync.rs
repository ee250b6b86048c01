//! Optimistic-mutation ledger for server reconciliation.
//!
//! Every committed gesture or property edit is applied to the local store
//! immediately and recorded here while its persistence call is in flight.
//! A mutation moves through two explicit states: `AppliedLocally` (local
//! store updated, server outcome unknown) and `Confirmed` (server
//! acknowledged). A failed persistence call does not roll the mutation back
//! piecewise; it flags the tracker so the host re-fetches the page snapshot
//! and calls [`crate::engine::EngineCore::reconcile`], which replaces local
//! state wholesale with the last known server state.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::doc::InstanceId;

/// What a pending mutation did, for diagnostics and targeted retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// A new instance was created.
    Create(InstanceId),
    /// An instance's props were patched.
    Update(InstanceId),
    /// One drag commit re-parented/reordered these instances.
    Move(Vec<InstanceId>),
    /// An instance and its subtree were deleted.
    Delete(Vec<InstanceId>),
}

/// Lifecycle of a pending mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied to the local store; persistence call in flight.
    AppliedLocally,
    /// Acknowledged by the server.
    Confirmed,
}

/// One tracked mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    /// Ledger sequence number, handed back to the host for confirm/fail.
    pub seq: u64,
    /// What the mutation did.
    pub kind: MutationKind,
    /// Current lifecycle state.
    pub state: MutationState,
}

/// Ledger of in-flight local mutations.
#[derive(Debug, Default)]
pub struct SyncTracker {
    next_seq: u64,
    pending: Vec<PendingMutation>,
    needs_reconcile: bool,
}

impl SyncTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a locally-applied mutation. Returns its sequence number.
    pub fn record(&mut self, kind: MutationKind) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingMutation { seq, kind, state: MutationState::AppliedLocally });
        seq
    }

    /// Mark a mutation as acknowledged by the server. Returns false for an
    /// unknown sequence number.
    pub fn confirm(&mut self, seq: u64) -> bool {
        match self.pending.iter_mut().find(|m| m.seq == seq) {
            Some(mutation) => {
                mutation.state = MutationState::Confirmed;
                true
            }
            None => false,
        }
    }

    /// Mark a mutation's persistence call as failed. The local edit stays
    /// applied; the tracker is flagged for snapshot reconciliation. Returns
    /// false for an unknown sequence number.
    pub fn fail(&mut self, seq: u64) -> bool {
        let found = self.pending.iter().any(|m| m.seq == seq);
        if found {
            self.pending.retain(|m| m.seq != seq);
            self.needs_reconcile = true;
        }
        found
    }

    /// Drop confirmed entries, returning how many were removed.
    pub fn gc(&mut self) -> usize {
        let before = self.pending.len();
        self.pending.retain(|m| m.state != MutationState::Confirmed);
        before - self.pending.len()
    }

    /// Whether a failed mutation requires a snapshot re-fetch.
    #[must_use]
    pub fn needs_reconcile(&self) -> bool {
        self.needs_reconcile
    }

    /// Whether any mutation is still awaiting server acknowledgement.
    #[must_use]
    pub fn has_unconfirmed(&self) -> bool {
        self.pending
            .iter()
            .any(|m| m.state == MutationState::AppliedLocally)
    }

    /// All tracked mutations, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[PendingMutation] {
        &self.pending
    }

    /// Reset after a snapshot reconciliation: the server state just became
    /// the local state, so nothing is pending any more.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.needs_reconcile = false;
    }
}
