//! Client configuration parsed from environment variables.

use crate::error::SessionError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000/";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_ms: u64,
    pub connect_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Auth server root. Always ends with `/`.
    pub base_url: String,
    pub timeouts: Timeouts,
    /// Push the user from a 201 sign-in body into the session store.
    /// Off by default: sign-in only reports a message.
    pub apply_login_user: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: Timeouts {
                request_ms: DEFAULT_REQUEST_TIMEOUT_MS,
                connect_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            },
            apply_login_user: false,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LMIS_BASE_URL`: default `http://127.0.0.1:9000/`
    /// - `LMIS_REQUEST_TIMEOUT_MS`: default 10000
    /// - `LMIS_CONNECT_TIMEOUT_MS`: default 5000
    /// - `LMIS_APPLY_LOGIN_USER`: `1/true/yes/on` or `0/false/no/off`, default off
    ///
    /// # Errors
    ///
    /// Returns an error if `LMIS_APPLY_LOGIN_USER` is set to something that is not a boolean.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if `LMIS_APPLY_LOGIN_USER` is set to something that is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(
            &lookup("LMIS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        );
        let timeouts = Timeouts {
            request_ms: parse_u64(lookup("LMIS_REQUEST_TIMEOUT_MS"), DEFAULT_REQUEST_TIMEOUT_MS),
            connect_ms: parse_u64(lookup("LMIS_CONNECT_TIMEOUT_MS"), DEFAULT_CONNECT_TIMEOUT_MS),
        };
        let apply_login_user = match lookup("LMIS_APPLY_LOGIN_USER") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                SessionError::Config(format!("LMIS_APPLY_LOGIN_USER is not a boolean: {raw}"))
            })?,
        };

        Ok(Self { base_url, timeouts, apply_login_user })
    }
}

/// Trim whitespace and make sure the URL ends with exactly one `/`, so relative
/// request paths resolve underneath it instead of replacing its last segment.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
