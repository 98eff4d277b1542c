//! Authentication flows: sign-in and the registration placeholder.
//!
//! SYSTEM CONTEXT
//! ==============
//! UI code calls [`AuthManager::login`] / [`AuthManager::register`] and
//! renders [`AuthStatus`]. Each call is a single request with no retry; the
//! user retries by calling again. Concurrent logins are not serialized, so the
//! last response to resolve owns the status.
//!
//! Sign-in reports an outcome but does not put the returned user into the
//! session unless `apply_login_user` is enabled.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::state::SessionStore;
use crate::types::{AuthStatus, Credentials, User};

pub const SIGNIN_PATH: &str = "users/signin";
pub const SIGNIN_SUCCESS_STATUS: u16 = 201;

pub const MSG_LOGGED_IN: &str = "Logged in";
pub const MSG_LOGIN_FAILED: &str = "Failed to login";
pub const EXTERNAL_ERROR_PREFIX: &str = "External Error ";

pub const REGISTER_CODE: &str = "200";
pub const MSG_VERIFY_OTP: &str = "Verify OTP Register";

/// Outcome of a sign-in request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthResult {
    /// The server answered 201. Carries the user when the body decodes as one.
    Success(Option<User>),
    /// The server answered with any other status.
    HttpError { status: u16, body: String },
    /// No response: connect, DNS, or timeout failure.
    TransportError(String),
}

impl AuthResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Status line shown to the user for this outcome.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        match self {
            Self::Success(_) => AuthStatus {
                code: SIGNIN_SUCCESS_STATUS.to_string(),
                message: MSG_LOGGED_IN.to_owned(),
            },
            Self::HttpError { status, .. } => AuthStatus {
                code: status.to_string(),
                message: MSG_LOGIN_FAILED.to_owned(),
            },
            Self::TransportError(detail) => AuthStatus {
                code: String::new(),
                message: format!("{EXTERNAL_ERROR_PREFIX}{detail}"),
            },
        }
    }
}

#[derive(Clone)]
pub struct AuthManager {
    store: SessionStore,
    status: Arc<watch::Sender<AuthStatus>>,
    apply_login_user: bool,
}

impl AuthManager {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        let (status, _) = watch::channel(AuthStatus::default());
        Self { store, status: Arc::new(status), apply_login_user: false }
    }

    #[must_use]
    pub fn from_config(store: SessionStore, config: &ClientConfig) -> Self {
        Self::new(store).with_apply_login_user(config.apply_login_user)
    }

    /// When enabled, a 201 sign-in whose body is a [`User`] calls
    /// [`SessionStore::set_user`].
    #[must_use]
    pub fn with_apply_login_user(mut self, enabled: bool) -> Self {
        self.apply_login_user = enabled;
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.status.borrow().message.clone()
    }

    #[must_use]
    pub fn code(&self) -> String {
        self.status.borrow().code.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// `POST users/signin` with the credentials and record the outcome.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult {
        let client = self.store.http_client();
        let credentials = Credentials { username, password };

        let result = match client.post_json(SIGNIN_PATH, &credentials).await {
            Ok(resp) if resp.status == SIGNIN_SUCCESS_STATUS => AuthResult::Success(resp.json::<User>()),
            Ok(resp) => AuthResult::HttpError { status: resp.status, body: resp.body },
            Err(e) => AuthResult::TransportError(e.to_string()),
        };

        match &result {
            AuthResult::Success(user) => {
                tracing::info!(user_in_body = user.is_some(), "sign-in succeeded");
                if self.apply_login_user {
                    if let Some(user) = user {
                        self.store.set_user(user.clone());
                    } else {
                        tracing::warn!("sign-in body is not a user; session left unchanged");
                    }
                }
            }
            AuthResult::HttpError { status, .. } => {
                tracing::info!(status, "sign-in rejected");
            }
            AuthResult::TransportError(detail) => {
                tracing::warn!(error = %detail, "sign-in request failed");
            }
        }

        self.status.send_replace(result.status());
        result
    }

    /// Registration placeholder: no request is made. Always reports code
    /// `"200"` and the OTP verification prompt.
    pub fn register(&self) -> AuthStatus {
        let status = AuthStatus { code: REGISTER_CODE.to_owned(), message: MSG_VERIFY_OTP.to_owned() };
        tracing::debug!("registration placeholder invoked");
        self.status.send_replace(status.clone());
        status
    }
}
