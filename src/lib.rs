//! Client-side session core for the LMIS front end.
//!
//! Leaf-first:
//! - [`http`]: the one configured HTTP client, with the session token
//!   attached at send time;
//! - [`state`]: the session store context object (counter, login flag,
//!   user, token, shared client) with subscribable changes;
//! - [`auth`]: sign-in against the auth server and the registration
//!   placeholder, reported as a user-facing status.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod types;

pub use auth::{AuthManager, AuthResult};
pub use config::ClientConfig;
pub use error::{HttpError, SessionError, ValidationError};
pub use http::{HttpClient, HttpResponse};
pub use reqwest::Method;
pub use state::{SessionState, SessionStore};
pub use types::{AuthStatus, Role, User};
