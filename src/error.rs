//! Error types for the session core.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal to the process. Transport and status failures from
//! the auth flows are folded into an [`AuthResult`](crate::auth::AuthResult)
//! plus a user-facing message; the enums below cover configuration, client
//! construction, and input validation.

// =============================================================================
// SESSION
// =============================================================================

/// Errors produced while configuring or mutating the session core.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A user record failed validation before it reached the store.
    #[error("invalid user: {0}")]
    Validation(#[from] ValidationError),

    /// A request could not be issued.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// =============================================================================
// HTTP
// =============================================================================

/// Failures where no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// Connect, DNS, or timeout failure before any status arrived.
    #[error("{0}")]
    Transport(String),

    /// The request path could not be resolved against the base URL.
    #[error("invalid request path: {0}")]
    InvalidPath(String),
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Reasons a [`User`](crate::types::User) is rejected by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("user_id must not be negative (got {0})")]
    NegativeId(i64),

    #[error("token is empty")]
    EmptyToken,

    #[error("missing required name field `{0}`")]
    MissingName(&'static str),

    #[error("email is not an address: {0:?}")]
    InvalidEmail(String),
}
