//! # HTTP Transport
//!
//! Stateless HTTP calls used by the opening pipeline. Every call names its
//! own authentication scheme, so switching trust domains between downstream
//! services never depends on state left behind by a previous call.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// Transport result type
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures raised by a transport call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Pulls the bearer token out of a login response body.
pub type TokenExtractor = fn(&str) -> Option<String>;

/// Login exchange that yields a bearer token for the following call
#[derive(Clone)]
pub struct BasicLogin {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    /// JSON body sent with the login request
    pub body: Value,
    pub extract_token: TokenExtractor,
}

impl BasicLogin {
    pub fn new(auth_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            username: username.into(),
            password: password.into(),
            body: serde_json::json!({ "type": "WEB" }),
            extract_token: raw_token,
        }
    }

    pub fn with_extractor(mut self, extract_token: TokenExtractor) -> Self {
        self.extract_token = extract_token;
        self
    }
}

impl std::fmt::Debug for BasicLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicLogin")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Login responses carry the token as the whole body, sometimes JSON-quoted.
pub fn raw_token(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let token = trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed);

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Authentication applied to a single call
#[derive(Clone)]
pub enum Auth {
    None,
    Bearer(String),
    BasicThenBearer(BasicLogin),
}

impl Auth {
    /// Scheme name for logs; never includes credentials
    pub fn scheme(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::Bearer(_) => "bearer",
            Auth::BasicThenBearer(_) => "basic+bearer",
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Auth::{}", self.scheme())
    }
}

/// HTTP operations the opening pipeline needs.
///
/// `Ok(None)` means the remote answered with no payload (204, empty or
/// `null` body). Non-success statuses are errors, except that `lookup`
/// also reports 404 as `Ok(None)`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Entity fetch where "not found" is an expected answer
    async fn lookup(&self, url: &str, auth: &Auth) -> TransportResult<Option<Value>>;

    async fn get(&self, url: &str, auth: &Auth) -> TransportResult<Option<Value>>;

    async fn post(&self, url: &str, auth: &Auth, body: &Value) -> TransportResult<Option<Value>>;
}
