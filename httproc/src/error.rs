//! Client-side error types.
//!
//! This module provides [`ClientError`], the error type returned by every
//! generated procedure and by [`ClientBuilder::build`](crate::ClientBuilder::build).

use crate::endpoint::Protocol;

/// Boxed error used as the cause of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building a client or invoking one of its procedures.
///
/// None of these are retried or swallowed inside the crate; they are handed
/// to the caller of the procedure as-is.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint description is not a URI with an `http` or `https` scheme.
    #[error("malformed endpoint {endpoint:?}: {reason}")]
    MalformedEndpoint { endpoint: String, reason: String },

    /// An API table entry does not match `"METHOD path"`.
    #[error("malformed api entry {name:?}: {entry:?}")]
    MalformedApiEntry { name: String, entry: String },

    /// Transport-level failure (connection refused, reset, DNS failure, ...).
    #[error("http request to {protocol}://{host}:{port} failed: {source}")]
    HttpRequest {
        protocol: Protocol,
        host: String,
        port: u16,
        #[source]
        source: BoxError,
    },

    /// The call's abort signal fired before the response completed.
    #[error("http request aborted: {reason}")]
    HttpRequestAborted { reason: String },

    /// The server answered with a status outside `200..300`.
    #[error("http response error {code}: {body}")]
    HttpResponse { code: u16, body: String },

    /// The adapter could not encode the call input.
    #[error("encode error: {0}")]
    Encode(String),

    /// The adapter could not decode a successful response body.
    #[error("decode error: {0}")]
    Decode(String),

    /// The adapter produced a payload that is not a valid HTTP request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No procedure with this name exists in the built client.
    #[error("unknown call {0:?}")]
    UnknownCall(String),

    /// The secure connection agent could not be configured.
    #[error("tls error: {0}")]
    Tls(String),
}

impl ClientError {
    /// Create a malformed endpoint error.
    pub fn malformed_endpoint<E: Into<String>, R: ToString>(endpoint: E, reason: R) -> Self {
        ClientError::MalformedEndpoint {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a transport error for the given connection parameters.
    pub fn http_request<E>(protocol: Protocol, host: &str, port: u16, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        ClientError::HttpRequest {
            protocol,
            host: host.to_string(),
            port,
            source: source.into(),
        }
    }

    /// The HTTP status code, for [`ClientError::HttpResponse`] only.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::HttpResponse { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The raw response body, for [`ClientError::HttpResponse`] only.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ClientError::HttpResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the call was cut short by its abort signal.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ClientError::HttpRequestAborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_accessors() {
        let err = ClientError::HttpResponse {
            code: 404,
            body: "not found".into(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.response_body(), Some("not found"));
        assert!(!err.is_aborted());
        assert_eq!(err.to_string(), "http response error 404: not found");
    }

    #[test]
    fn test_aborted() {
        let err = ClientError::HttpRequestAborted {
            reason: "user cancelled".into(),
        };
        assert!(err.is_aborted());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.response_body(), None);
    }

    #[test]
    fn test_http_request_display_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::http_request(Protocol::Http, "127.0.0.1", 1024, io);
        assert_eq!(
            err.to_string(),
            "http request to http://127.0.0.1:1024 failed: refused"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
