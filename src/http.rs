//! Shared HTTP client for the auth server.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` with a fixed base URL and timeouts. Every request
//! goes through [`HttpClient::send`], which reads the session token from the
//! store's state channel right before sending and attaches
//! `Authorization: Token <token>` when one is set. The hook lives in the
//! client itself, so rotating the token never requires reinstalling it.
//! Request builders never leave this module, so no request skips the hook.
//!
//! ERROR HANDLING
//! ==============
//! Any HTTP response, whatever the status, is returned as an [`HttpResponse`].
//! Only failures where no status arrived become [`HttpError`]. A body that
//! cannot be read after the status arrived is logged and returned empty.
//! Nothing is retried.

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::config::{ClientConfig, Timeouts, normalize_base_url};
use crate::error::{HttpError, SessionError};
use crate::state::SessionState;

/// Read side of the session state. The client only looks at its token.
pub type TokenSource = watch::Receiver<SessionState>;

/// Status and raw body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as `T`, or `None` if it has a different shape.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_str(&self.body).ok()
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    timeouts: Timeouts,
    session: TokenSource,
}

impl HttpClient {
    /// Build a client from config. Until it is bound to a session store via
    /// [`HttpClient::with_token_source`], it sends no `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// underlying client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, SessionError> {
        let raw = normalize_base_url(&config.base_url);
        let base_url = Url::parse(&raw).map_err(|e| SessionError::InvalidBaseUrl(format!("{raw}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SessionError::InvalidBaseUrl(raw));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeouts.request_ms))
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .build()
            .map_err(|e| SessionError::HttpClientBuild(e.to_string()))?;

        let (_detached, session) = watch::channel(SessionState::default());
        Ok(Self { http, base_url, timeouts: config.timeouts, session })
    }

    /// Rebind the session whose token the client reads at send time.
    #[must_use]
    pub fn with_token_source(mut self, session: TokenSource) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Token that the next request would carry.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.session.borrow().token.clone()
    }

    /// Resolve `path` relative to the base URL. A leading `/` is ignored so
    /// base URLs with a path prefix keep it.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidPath`] if the joined URL cannot be parsed.
    pub fn url(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidPath(format!("{path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, HttpError> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// `GET <base>/<path>`.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received.
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// `POST <base>/<path>` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received.
    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, HttpError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Send `method <base>/<path>`, with an optional JSON body and the live
    /// session token.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidPath`] if `path` does not resolve, or
    /// [`HttpError::Transport`] if the request could not be built or no
    /// status arrived.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<HttpResponse, HttpError> {
        let builder = self.request(method, path)?;
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.execute(builder).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<HttpResponse, HttpError> {
        let mut request = builder.build().map_err(|e| HttpError::Transport(e.to_string()))?;
        self.authorize(&mut request);

        let method = request.method().clone();
        let url = request.url().clone();
        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(error = %e, %method, %url, "request failed");
            HttpError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, %method, %url, status, "response body unreadable");
                String::new()
            }
        };

        tracing::debug!(%method, %url, status, "response received");
        Ok(HttpResponse { status, body })
    }

    fn authorize(&self, request: &mut reqwest::Request) {
        let Some(token) = self.current_token().filter(|t| !t.is_empty()) else {
            return;
        };
        match HeaderValue::from_str(&format!("Token {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("session token is not a valid header value; sending without Authorization");
            }
        }
    }
}
