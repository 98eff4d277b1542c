//! Session state store.
//!
//! DESIGN
//! ======
//! `SessionStore` is the explicit context object handed to every component
//! that needs session data. It is a cheap `Clone` over shared `watch`
//! channels:
//!
//! - `state` holds the [`SessionState`] and notifies subscribers after every
//!   write. Each write is a single `send_modify`, so readers never observe a
//!   half-applied update. The [`HttpClient`] reads its auth token from this
//!   same channel, so the header and `token()` always agree.
//! - `http` holds the shared client handle.
//!
//! Fields are only changed through the named operations below.

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::http::HttpClient;
use crate::types::User;

// =============================================================================
// SESSION STATE
// =============================================================================

/// Current session values as seen by subscribers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Demo counter.
    pub counter: i64,
    pub logged_in: bool,
    pub user: Option<User>,
    /// Mirrors `user.token` whenever a user is set.
    pub token: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn double_counter(&self) -> i64 {
        self.counter.saturating_mul(2)
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

struct StoreInner {
    state: watch::Sender<SessionState>,
    http: watch::Sender<HttpClient>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    /// Build a store with a fresh client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, SessionError> {
        Ok(Self::with_client(HttpClient::new(config)?))
    }

    /// Build a store around an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient) -> Self {
        let (state, session) = watch::channel(SessionState::default());
        let (http, _) = watch::channel(client.with_token_source(session));
        Self { inner: Arc::new(StoreInner { state, http }) }
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[must_use]
    pub fn counter(&self) -> i64 {
        self.inner.state.borrow().counter
    }

    #[must_use]
    pub fn double_counter(&self) -> i64 {
        self.inner.state.borrow().double_counter()
    }

    /// Handle to the shared client. Clones stay bound to this store's token.
    #[must_use]
    pub fn http_client(&self) -> HttpClient {
        self.inner.http.borrow().clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().logged_in
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    /// Consistent copy of the session values.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that wakes after every write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Replace the shared client. The new client reads this store's token.
    pub fn set_http_client(&self, client: HttpClient) {
        let client = client.with_token_source(self.inner.state.subscribe());
        tracing::debug!(base_url = %client.base_url(), "http client replaced");
        self.inner.http.send_replace(client);
    }

    pub fn increment_counter(&self, n: i64) {
        self.inner
            .state
            .send_modify(|s| s.counter = s.counter.saturating_add(n));
    }

    /// Force the logged-in flag without touching the user.
    pub fn set_logged_in(&self, logged_in: bool) {
        self.inner.state.send_modify(|s| s.logged_in = logged_in);
    }

    /// Replace the current user, mark the session logged in, and start sending
    /// the user's token. The record is stored as given.
    pub fn set_user(&self, user: User) {
        let token = user.token.clone();
        tracing::info!(user_id = user.user_id, role = ?user.role, "session user set");

        self.inner.state.send_modify(|s| {
            s.user = Some(user);
            s.logged_in = true;
            s.token = Some(token);
        });
    }

    /// [`SessionStore::set_user`] after [`User::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] and leaves the session untouched if
    /// the user is malformed.
    pub fn try_set_user(&self, user: User) -> Result<(), SessionError> {
        user.validate()?;
        self.set_user(user);
        Ok(())
    }

    /// Log out: drop the user and token and clear the logged-in flag.
    pub fn clear_user(&self) {
        tracing::info!("session cleared");
        self.inner.state.send_modify(|s| {
            s.user = None;
            s.logged_in = false;
            s.token = None;
        });
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
