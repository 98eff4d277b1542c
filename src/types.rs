//! Wire DTOs shared between the session store and the auth flows.
//!
//! DESIGN
//! ======
//! Field names mirror the auth server's JSON so a sign-in response body can
//! be decoded straight into a [`User`].

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Role assigned to a user by the auth server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Client,
    /// Any role string this client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Identity record for the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub postal_address: String,
    pub physical_address: String,
    /// Session token sent back as `Authorization: Token <token>`.
    pub token: String,
    pub role: Role,
}

impl User {
    /// Check the fields the session relies on.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id < 0 {
            return Err(ValidationError::NegativeId(self.user_id));
        }
        if self.token.trim().is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::MissingName("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::MissingName("last_name"));
        }
        let valid_email = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Body of `POST users/signin`.
#[derive(Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// User-facing outcome of the latest authentication call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthStatus {
    /// Short machine code (HTTP status or a fixed flow code). Empty when unset.
    pub code: String,
    pub message: String,
}
