//! Endpoint descriptions and their per-call resolution.
//!
//! An endpoint description is a URI string such as `http://host:port/prefix`.
//! Parsing it yields a [`StaticResolver`]; the client asks its resolver for
//! an [`Endpoint`] on every call so that a dynamic [`Resolve`] implementation
//! (service discovery, for instance) can be dropped in without changing how
//! procedures are invoked.

use std::fmt;

use futures::future::{self, BoxFuture};
use http::Uri;

use crate::ClientError;

/// Transport protocol of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Plain-text HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// The URI scheme for this protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Port used when the description does not carry one.
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") {
            Some(Protocol::Http)
        } else if scheme.eq_ignore_ascii_case("https") {
            Some(Protocol::Https)
        } else {
            None
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection parameters for one service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    protocol: Protocol,
    host: String,
    port: u16,
    path_prefix: String,
}

impl Endpoint {
    /// Create an endpoint from its parts.
    ///
    /// Trailing slashes are removed from `path_prefix`.
    pub fn new<H, P>(protocol: Protocol, host: H, port: u16, path_prefix: P) -> Self
    where
        H: Into<String>,
        P: AsRef<str>,
    {
        Self {
            protocol,
            host: host.into(),
            port,
            path_prefix: path_prefix.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Parse an endpoint description.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedEndpoint`] when the description is not a
    /// URI, has no host, uses a scheme other than `http`/`https`, or names
    /// port 0.
    pub fn parse(description: &str) -> Result<Self, ClientError> {
        let uri: Uri = description
            .parse()
            .map_err(|e| ClientError::malformed_endpoint(description, e))?;

        let protocol = match uri.scheme_str() {
            Some(scheme) => Protocol::from_scheme(scheme).ok_or_else(|| {
                ClientError::malformed_endpoint(
                    description,
                    format!("unsupported scheme {scheme:?}"),
                )
            })?,
            None => return Err(ClientError::malformed_endpoint(description, "missing scheme")),
        };

        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ClientError::malformed_endpoint(description, "missing host"))?;

        let port = match uri.port_u16() {
            Some(0) => {
                return Err(ClientError::malformed_endpoint(description, "port out of range"));
            }
            Some(port) => port,
            None => protocol.default_port(),
        };

        Ok(Self::new(protocol, host, port, uri.path()))
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The URI path of the description, without trailing slashes. May be empty.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Absolute URI for `path` (and optional query) under this endpoint.
    ///
    /// The request target is `path_prefix + path + query`.
    pub fn uri_for(&self, path: &str, query: Option<&str>) -> String {
        format!(
            "{}://{}:{}{}{}{}",
            self.protocol,
            self.host,
            self.port,
            self.path_prefix,
            path,
            query.unwrap_or("")
        )
    }
}

/// Produces the [`Endpoint`] for a call.
///
/// Called once per invocation, never cached by the client. Implementations
/// must be cheap and side-effect-free to repeat.
pub trait Resolve: Send + Sync + 'static {
    fn resolve(&self) -> BoxFuture<'_, Result<Endpoint, ClientError>>;
}

/// Resolver that always yields the endpoint it was parsed from.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    endpoint: Endpoint,
}

impl StaticResolver {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self) -> BoxFuture<'_, Result<Endpoint, ClientError>> {
        Box::pin(future::ready(Ok(self.endpoint.clone())))
    }
}

/// Parse an endpoint description into a per-call resolver.
pub fn parse_endpoint(description: &str) -> Result<StaticResolver, ClientError> {
    Endpoint::parse(description).map(StaticResolver::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let plain = Endpoint::parse("http://example.com/api").unwrap();
        assert_eq!(plain.protocol(), Protocol::Http);
        assert_eq!(plain.host(), "example.com");
        assert_eq!(plain.port(), 80);
        assert_eq!(plain.path_prefix(), "/api");

        let secure = Endpoint::parse("https://example.com").unwrap();
        assert_eq!(secure.protocol(), Protocol::Https);
        assert_eq!(secure.port(), 443);
        assert_eq!(secure.path_prefix(), "");
    }

    #[test]
    fn test_explicit_port() {
        let endpoint = Endpoint::parse("http://127.0.0.1:1024/a").unwrap();
        assert_eq!(endpoint.port(), 1024);
        assert_eq!(endpoint.path_prefix(), "/a");

        let endpoint = Endpoint::parse("https://example.com:8443").unwrap();
        assert_eq!(endpoint.port(), 8443);
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let endpoint = Endpoint::parse("HTTPS://example.com").unwrap();
        assert_eq!(endpoint.protocol(), Protocol::Https);
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let endpoint = Endpoint::parse("http://localhost:3000/").unwrap();
        assert_eq!(endpoint.path_prefix(), "");

        let endpoint = Endpoint::parse("http://localhost:3000/v1/").unwrap();
        assert_eq!(endpoint.path_prefix(), "/v1");
    }

    #[test]
    fn test_malformed_descriptions() {
        for desc in [
            "not a uri",
            "ftp://example.com/files",
            "localhost:8080",
            "/just/a/path",
            "http://example.com:0",
            "",
        ] {
            let err = Endpoint::parse(desc).unwrap_err();
            assert!(
                matches!(err, ClientError::MalformedEndpoint { .. }),
                "{desc:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_uri_for() {
        let endpoint = Endpoint::parse("http://127.0.0.1:1024/a").unwrap();
        assert_eq!(
            endpoint.uri_for("/plus", Some("?%7B%7D")),
            "http://127.0.0.1:1024/a/plus?%7B%7D"
        );
        assert_eq!(endpoint.uri_for("/plus", None), "http://127.0.0.1:1024/a/plus");
    }

    #[tokio::test]
    async fn test_static_resolver_is_repeatable() {
        let resolver = parse_endpoint("https://example.com:8443/svc").unwrap();
        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(&first, resolver.endpoint());
    }
}
