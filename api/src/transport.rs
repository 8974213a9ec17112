//! HTTP transport abstraction
//!
//! Services talk to the backend through [`Transport`], which resolves with
//! the parsed JSON body or rejects with an [`ApiError`]. [`HttpTransport`] is
//! the `reqwest` implementation; tests script their own.

use crate::error::ApiError;
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::RwLock;
use url::Url;

/// HTTP method of a backend request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// One backend request
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Encoded query string without the leading `?`
    pub query: Option<String>,
    /// JSON body
    pub body: Option<Value>,
}

impl Request {
    /// A `GET` without parameters
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// A `POST` with a JSON body
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: None,
            body: Some(body),
        }
    }

    /// Attach an encoded query string; empty strings are ignored
    #[must_use]
    pub fn with_query(mut self, query: String) -> Self {
        self.query = Some(query).filter(|query| !query.is_empty());
        self
    }
}

/// Performs backend requests
///
/// Implementations also own the bearer-token slot, so that a login on one
/// service authorizes calls made through every other service sharing the
/// transport.
pub trait Transport: Send + Sync {
    /// Perform the request and return the parsed response body
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrived
    /// - [`ApiError::Api`] for non-2xx responses
    /// - [`ApiError::Decode`] when a 2xx body is not JSON
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Value, ApiError>>;

    /// Store the bearer token, or clear it with `None`
    fn set_token(&self, token: Option<String>);

    /// Current bearer token
    fn token(&self) -> Option<String>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Create a transport for the given backend base URL
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a transport reusing an existing client
    #[must_use]
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Backend base URL
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &Request) -> String {
        let mut url = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path
        );
        if let Some(query) = &request.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("authorized", &self.token().is_some())
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Value, ApiError>> {
        Box::pin(async move {
            let url = self.url_for(&request);

            let mut builder = match request.method {
                Method::Get => self.client.get(&url),
                Method::Post => self
                    .client
                    .post(&url)
                    .json(&request.body.unwrap_or(Value::Null)),
            };
            if let Some(token) = self.token() {
                builder = builder.bearer_auth(token);
            }

            tracing::debug!(method = %request.method, path = %request.path, "Sending request");

            let response = builder.send().await.map_err(|e| {
                tracing::warn!(path = %request.path, error = %e, "Request failed");
                ApiError::Transport(e.to_string())
            })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            tracing::debug!(path = %request.path, status = status.as_u16(), "Received response");

            if status.is_success() {
                serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
            } else {
                Err(ApiError::from_status(status.as_u16(), &body))
            }
        })
    }

    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
