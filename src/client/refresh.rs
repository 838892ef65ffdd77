//! Single-flight coordination of token refreshes.
//!
//! When several requests discover an expired token at the same time, only
//! the first one (the leader) calls the refresh endpoint. The others
//! (followers) subscribe to the leader's outcome. The slot is released by
//! [`LeaderGuard`] whether the leader finishes, fails or is dropped
//! mid-flight.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::error::{ApiError, ApiResult, ErrorCode};

/// Result shared with every waiter of one refresh.
pub(super) type RefreshOutcome = ApiResult<()>;

/// Owner of the in-flight refresh slot.
#[derive(Debug, Default)]
pub(super) struct RefreshGate {
    /// Sender of the refresh currently in flight, if any. Never held
    /// across an `.await`.
    in_flight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
    /// Error of the latest refresh, cleared by the next success.
    last_failure: Mutex<Option<ApiError>>,
}

/// What a caller should do after entering the gate.
#[derive(Debug)]
pub(super) enum Role<'gate> {
    /// Perform the refresh and report through the guard.
    Leader(LeaderGuard<'gate>),
    /// Wait for the leader's outcome.
    Follower(broadcast::Receiver<RefreshOutcome>),
}

impl RefreshGate {
    /// Locks the slot, recovering from poisoning (the slot holds no
    /// invariant a panic could break).
    fn slot(&self) -> MutexGuard<'_, Option<broadcast::Sender<RefreshOutcome>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Joins the refresh in flight, or starts one.
    pub(super) fn enter(&self) -> Role<'_> {
        let mut slot = self.slot();
        if let Some(sender) = slot.as_ref() {
            return Role::Follower(sender.subscribe());
        }
        let (sender, _receiver) = broadcast::channel(1);
        *slot = Some(sender.clone());
        Role::Leader(LeaderGuard {
            gate: self,
            sender,
            released: false,
        })
    }

    /// Error the latest refresh ended with, if it failed.
    pub(super) fn last_failure(&self) -> Option<ApiError> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records how a refresh ended.
    fn record(&self, outcome: &RefreshOutcome) {
        *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) =
            outcome.as_ref().err().cloned();
    }

    /// Whether a refresh is in flight.
    #[cfg(test)]
    pub(super) fn is_busy(&self) -> bool {
        self.slot().is_some()
    }
}

/// Held by the leader for the duration of one refresh.
#[derive(Debug)]
pub(super) struct LeaderGuard<'gate> {
    /// Gate whose slot this guard owns.
    gate: &'gate RefreshGate,
    /// Channel the followers listen on.
    sender: broadcast::Sender<RefreshOutcome>,
    /// Whether the slot was already cleared.
    released: bool,
}

impl LeaderGuard<'_> {
    /// Clears the slot so the next expiry starts a fresh refresh.
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            *self.gate.slot() = None;
        }
    }

    /// Publishes the outcome to all followers and frees the slot.
    pub(super) fn finish(mut self, outcome: RefreshOutcome) {
        self.gate.record(&outcome);
        self.release();
        let waiting = self.sender.send(outcome).unwrap_or_default();
        tracing::trace!(waiting, "refresh outcome published");
    }
}

impl Drop for LeaderGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        if !self.released {
            tracing::debug!("refresh abandoned before completion");
        }
        self.release();
    }
}

/// Waits for the leader's outcome.
///
/// A leader dropped without publishing counts as a failed refresh.
pub(super) async fn follow(mut receiver: broadcast::Receiver<RefreshOutcome>) -> RefreshOutcome {
    match receiver.recv().await {
        Ok(outcome) => outcome,
        Err(broadcast::error::RecvError::Closed | broadcast::error::RecvError::Lagged(_)) => Err(
            ApiError::new(ErrorCode::AuthExpired, "session refresh was abandoned"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn followers_receive_leader_outcome() {
        let gate = RefreshGate::default();
        let Role::Leader(guard) = gate.enter() else {
            panic!("first caller must lead");
        };
        let Role::Follower(first) = gate.enter() else {
            panic!("second caller must follow");
        };
        let Role::Follower(second) = gate.enter() else {
            panic!("third caller must follow");
        };

        guard.finish(Ok(()));
        assert!(!gate.is_busy());
        assert_eq!(follow(first).await, Ok(()));
        assert_eq!(follow(second).await, Ok(()));
    }

    #[tokio::test]
    async fn failure_is_shared() {
        let gate = RefreshGate::default();
        let Role::Leader(guard) = gate.enter() else {
            panic!("first caller must lead");
        };
        let Role::Follower(follower) = gate.enter() else {
            panic!("second caller must follow");
        };
        let error = ApiError::new(ErrorCode::AuthExpired, "refresh rejected");
        guard.finish(Err(error.clone()));
        assert_eq!(follow(follower).await, Err(error));
    }

    #[tokio::test]
    async fn dropped_leader_releases_slot_and_fails_followers() {
        let gate = RefreshGate::default();
        let Role::Leader(guard) = gate.enter() else {
            panic!("first caller must lead");
        };
        let Role::Follower(follower) = gate.enter() else {
            panic!("second caller must follow");
        };
        drop(guard);

        assert!(!gate.is_busy());
        let outcome = follow(follower).await;
        assert_eq!(outcome.unwrap_err().code, ErrorCode::AuthExpired);
        assert!(matches!(gate.enter(), Role::Leader(_)));
    }

    #[test]
    fn last_failure_tracks_latest_outcome() {
        let gate = RefreshGate::default();
        assert!(gate.last_failure().is_none());

        let Role::Leader(guard) = gate.enter() else {
            panic!("first caller must lead");
        };
        let error = ApiError::new(ErrorCode::AuthExpired, "refresh rejected");
        guard.finish(Err(error.clone()));
        assert_eq!(gate.last_failure(), Some(error));

        let Role::Leader(guard) = gate.enter() else {
            panic!("slot must be free");
        };
        guard.finish(Ok(()));
        assert!(gate.last_failure().is_none());
    }

    #[test]
    fn new_leader_after_finish() {
        let gate = RefreshGate::default();
        let Role::Leader(guard) = gate.enter() else {
            panic!("first caller must lead");
        };
        guard.finish(Ok(()));
        assert!(matches!(gate.enter(), Role::Leader(_)));
    }
}
