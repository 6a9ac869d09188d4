//! HTTP requests and responses described as plain data.
//!
//! An adapter turns call input into a [`RequestPayload`]; the sender turns
//! the wire response into a [`ResponseResult`] for the adapter to decode.
//! Neither is mutated once constructed.

use http::{HeaderMap, Method, StatusCode};

/// The request an adapter wants sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub method: Method,
    /// Path relative to the endpoint's path prefix.
    pub path: String,
    /// Query string including its leading `?`, if any.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestPayload {
    /// A payload with no query, headers, or body.
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// A completed exchange.
#[derive(Debug, Clone)]
pub struct ResponseResult {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// The full body, decoded as UTF-8 (invalid sequences are replaced).
    pub body: String,
}

impl ResponseResult {
    /// Whether the status is within `200..300`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
