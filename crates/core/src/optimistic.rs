//! Optimistic updates: apply a value locally, call the backend, then commit
//! or revert once the call settles.
//!
//! [`Optimistic`] is the reusable primitive; [`StatusToggle`] wires it to a
//! draft's availability flag. Only one action may be in flight at a time;
//! while it is, the control reports itself disabled and further attempts
//! are rejected with [`CoreError::Conflict`].

use std::future::Future;

use crate::draft::ProductDraft;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    InFlight,
}

/// A value with a locally displayed copy that may run ahead of the
/// committed one while a remote call is pending.
#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    committed: T,
    displayed: T,
    in_flight: bool,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            displayed: value,
            in_flight: false,
        }
    }

    pub fn displayed(&self) -> &T {
        &self.displayed
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn state(&self) -> ActionState {
        if self.in_flight {
            ActionState::InFlight
        } else {
            ActionState::Idle
        }
    }

    /// Whether the triggering control should accept input.
    pub fn is_enabled(&self) -> bool {
        !self.in_flight
    }

    /// Show `next` immediately and mark the action in flight.
    pub fn begin(&mut self, next: T) -> Result<(), CoreError> {
        if self.in_flight {
            return Err(CoreError::Conflict(
                "an update for this value is already in flight".to_string(),
            ));
        }
        self.displayed = next;
        self.in_flight = true;
        Ok(())
    }

    /// Accept the displayed value as the new committed value.
    pub fn commit(&mut self) {
        self.committed = self.displayed.clone();
        self.in_flight = false;
    }

    /// Restore the value shown before [`begin`](Self::begin).
    pub fn revert(&mut self) {
        self.displayed = self.committed.clone();
        self.in_flight = false;
    }

    /// Replace both copies, e.g. after reloading from the backend.
    pub fn reset(&mut self, value: T) {
        self.committed = value.clone();
        self.displayed = value;
        self.in_flight = false;
    }

    /// Run `call` with `next` applied optimistically. The value is committed
    /// if the call succeeds and reverted if it fails or the future is dropped
    /// before settling.
    pub async fn apply<F, Fut, R, E>(&mut self, next: T, call: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<CoreError>,
    {
        self.begin(next)?;
        let mut guard = RevertOnDrop {
            cell: self,
            armed: true,
        };

        let result = call().await;
        match &result {
            Ok(_) => guard.cell.commit(),
            Err(_) => guard.cell.revert(),
        }
        guard.armed = false;
        result
    }
}

struct RevertOnDrop<'a, T: Clone> {
    cell: &'a mut Optimistic<T>,
    armed: bool,
}

impl<T: Clone> Drop for RevertOnDrop<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.cell.revert();
        }
    }
}

/// Availability toggle for a saved product.
///
/// `Idle → Toggling → Idle`. The draft's `status` is only written after the
/// backend confirms the change.
#[derive(Debug, Clone)]
pub struct StatusToggle {
    inner: Optimistic<bool>,
}

impl StatusToggle {
    pub fn new(status: bool) -> Self {
        Self {
            inner: Optimistic::new(status),
        }
    }

    pub fn displayed(&self) -> bool {
        *self.inner.displayed()
    }

    pub fn is_toggling(&self) -> bool {
        self.inner.state() == ActionState::InFlight
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn reset(&mut self, status: bool) {
        self.inner.reset(status);
    }

    /// Flip the displayed status, run `call`, and on success write the new
    /// value into `draft`. On failure the displayed value reverts and the
    /// draft is left alone.
    pub async fn toggle<F, Fut, R, E>(&mut self, draft: &mut ProductDraft, call: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<CoreError>,
    {
        let next = !self.displayed();
        let response = self.inner.apply(next, call).await?;
        draft.status = *self.inner.committed();
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug)]
    struct Failed;

    impl From<CoreError> for Failed {
        fn from(_: CoreError) -> Self {
            Failed
        }
    }

    #[test]
    fn begin_rejects_second_action_in_flight() {
        let mut value = Optimistic::new(1);
        value.begin(2).unwrap();
        assert_eq!(value.state(), ActionState::InFlight);
        assert!(!value.is_enabled());
        assert_matches!(value.begin(3), Err(CoreError::Conflict(_)));
        assert_eq!(*value.displayed(), 2);

        value.revert();
        assert_eq!(*value.displayed(), 1);
        assert!(value.is_enabled());
    }

    #[tokio::test]
    async fn apply_commits_on_success() {
        let mut value = Optimistic::new("old".to_string());
        let out: Result<u8, Failed> = value.apply("new".to_string(), || async { Ok(7) }).await;
        assert_eq!(out.unwrap(), 7);
        assert_eq!(value.committed(), "new");
        assert_eq!(value.state(), ActionState::Idle);
    }

    #[tokio::test]
    async fn apply_reverts_on_failure() {
        let mut value = Optimistic::new(false);
        let out: Result<(), Failed> = value.apply(true, || async { Err(Failed) }).await;
        assert!(out.is_err());
        assert!(!*value.displayed());
        assert!(value.is_enabled());
    }

    #[tokio::test]
    async fn dropped_action_reverts() {
        let mut value = Optimistic::new(10);
        {
            let pending = value.apply(11, || std::future::pending::<Result<(), Failed>>());
            // Poll once so the optimistic value is applied, then drop.
            let _ = tokio::time::timeout(std::time::Duration::from_millis(5), pending).await;
        }
        assert_eq!(*value.displayed(), 10);
        assert!(value.is_enabled());
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_status() {
        let mut draft = ProductDraft::new();
        draft.set_status(true);
        let mut toggle = StatusToggle::new(draft.status);

        toggle
            .toggle(&mut draft, || async { Ok::<_, Failed>(()) })
            .await
            .unwrap();
        assert!(!draft.status);
        assert!(!toggle.displayed());

        toggle
            .toggle(&mut draft, || async { Ok::<_, Failed>(()) })
            .await
            .unwrap();
        assert!(draft.status);
        assert!(toggle.displayed());
    }

    #[tokio::test]
    async fn failed_toggle_reverts_display_and_keeps_draft() {
        let mut draft = ProductDraft::new();
        draft.set_status(false);
        let mut toggle = StatusToggle::new(false);

        let result = toggle
            .toggle(&mut draft, || async { Err::<(), _>(Failed) })
            .await;
        assert!(result.is_err());
        assert!(!toggle.displayed());
        assert!(!draft.status);
        assert!(!toggle.is_toggling());
    }
}
