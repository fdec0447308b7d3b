//! Transaction lifecycle tracking.
//!
//! A transaction moves `Built -> Signed -> Submitted -> Pending` and ends in
//! `Confirmed` or `Failed`. Pending may repeat while the node has not decided.
//! Nothing moves backwards and terminal states are final.
use tracing::trace;

use crate::models::{TokenManagerError, TransactionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLifecycle {
    state: TransactionState,
}

impl Default for TransactionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLifecycle {
    pub fn new() -> Self {
        Self {
            state: TransactionState::Built,
        }
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    /// Moves to `next`, rejecting any transition the lifecycle does not allow.
    pub fn advance(&mut self, next: TransactionState) -> Result<(), TokenManagerError> {
        if !Self::is_allowed(&self.state, &next) {
            return Err(TokenManagerError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        trace!(from = %self.state, to = %next, "transaction state transition");
        self.state = next;
        Ok(())
    }

    fn is_allowed(from: &TransactionState, to: &TransactionState) -> bool {
        use TransactionState::*;

        matches!(
            (from, to),
            (Built, Signed)
                | (Signed, Submitted)
                | (Submitted, Pending)
                | (Pending, Pending)
                | (Pending, Confirmed)
                | (Pending, Failed(_))
        )
    }
}
