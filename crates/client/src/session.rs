//! Session context: the bearer token plus a broadcast of session changes.
//!
//! Every call site goes through [`Session`] instead of touching the token
//! store directly. A top-level guard subscribes to [`SessionEvent`]s and
//! sends the user to the login screen on [`SessionEvent::Expired`].

use std::sync::Arc;

use atelier_core::routes::Route;
use atelier_core::types::Timestamp;
use chrono::Utc;
use tokio::sync::broadcast;

use crate::error::ClientResult;
use crate::store::TokenStore;

/// Buffer capacity for the session event channel.
const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { at: Timestamp },
    /// Explicit logout or password change.
    SignedOut { at: Timestamp },
    /// The backend rejected the token.
    Expired { at: Timestamp },
}

impl SessionEvent {
    /// Where a navigation guard should send the user, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            SessionEvent::SignedIn { .. } => None,
            SessionEvent::SignedOut { .. } | SessionEvent::Expired { .. } => Some(Route::Login),
        }
    }
}

/// Cheaply cloneable handle to the current session.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn token(&self) -> ClientResult<Option<String>> {
        self.with_store(|store| store.get()).await
    }

    pub async fn is_signed_in(&self) -> ClientResult<bool> {
        Ok(self.token().await?.is_some())
    }

    pub async fn sign_in(&self, token: &str) -> ClientResult<()> {
        let token = token.to_string();
        self.with_store(move |store| store.set(&token)).await?;
        self.publish(SessionEvent::SignedIn { at: Utc::now() });
        Ok(())
    }

    pub async fn sign_out(&self) -> ClientResult<()> {
        self.with_store(|store| store.clear()).await?;
        self.publish(SessionEvent::SignedOut { at: Utc::now() });
        Ok(())
    }

    /// Drop the token after the backend rejected it. Storage failures are
    /// logged rather than returned so the caller still sees the expiry.
    pub async fn expire(&self) {
        if let Err(e) = self.with_store(|store| store.clear()).await {
            tracing::error!(error = %e, "Failed to clear expired session token");
        }
        tracing::warn!("Session expired");
        self.publish(SessionEvent::Expired { at: Utc::now() });
    }

    /// Run a token store operation on the blocking pool; stores may do
    /// file I/O.
    async fn with_store<T, F>(&self, op: F) -> ClientResult<T>
    where
        F: FnOnce(&dyn TokenStore) -> std::io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(std::io::Error::other)?;
        Ok(result?)
    }

    fn publish(&self, event: SessionEvent) {
        // Only fails when nobody is subscribed.
        let _ = self.events.send(event);
    }
}
