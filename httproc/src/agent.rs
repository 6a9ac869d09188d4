//! Connection agents: one pooled HTTP client per protocol.
//!
//! An [`Agents`] set holds a plain-HTTP agent and a TLS agent, each a
//! hyper_util legacy [`Client`] with its own keep-alive pool. Agents are
//! cheap to clone (clones share the pool) and safe to use from any number of
//! concurrent calls; the pool does its own locking.
//!
//! # Example
//!
//! ```ignore
//! use httproc::{AgentOptions, Agents};
//! use std::time::Duration;
//!
//! // Defaults: 90s idle timeout, 32 idle connections per host
//! let agents = Agents::new(AgentOptions::default());
//!
//! // Or tune the pool
//! let agents = AgentOptions::new()
//!     .pool_idle_timeout(Duration::from_secs(30))
//!     .pool_max_idle_per_host(4)
//!     .build();
//! ```

pub mod tls;

use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Builder, Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;

use crate::ClientError;
use crate::endpoint::Protocol;

/// Request body type sent through the agents.
pub type RequestBody = Full<Bytes>;

type PlainClient = Client<HttpConnector, RequestBody>;
type SecureClient = Client<HttpsConnector<HttpConnector>, RequestBody>;

/// A pooled client for one protocol.
#[derive(Clone)]
pub enum Agent {
    /// Plain-text HTTP pool.
    Plain(PlainClient),
    /// TLS pool.
    Secure(SecureClient),
}

impl Agent {
    /// The protocol this agent serves.
    pub fn protocol(&self) -> Protocol {
        match self {
            Agent::Plain(_) => Protocol::Http,
            Agent::Secure(_) => Protocol::Https,
        }
    }

    /// Perform one exchange, resolving once the response head arrives.
    ///
    /// Dropping the returned future before it completes cancels the exchange.
    pub async fn request(
        &self,
        request: http::Request<RequestBody>,
    ) -> Result<http::Response<Incoming>, hyper_util::client::legacy::Error> {
        match self {
            Agent::Plain(client) => client.request(request).await,
            Agent::Secure(client) => client.request(request).await,
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Agent").field(&self.protocol()).finish()
    }
}

/// The agent set shared by every procedure of a built client.
///
/// The secure agent is absent when no TLS configuration was given and none
/// could be built from the enabled features; `https` calls then fail with
/// [`ClientError::Tls`] while plain calls are unaffected.
#[derive(Debug, Clone)]
pub struct Agents {
    http: Agent,
    https: Result<Agent, String>,
}

impl Agents {
    /// Create both agents from the given options.
    pub fn new(options: AgentOptions) -> Self {
        options.build()
    }

    /// The agent for `protocol`.
    pub fn get(&self, protocol: Protocol) -> Result<&Agent, ClientError> {
        match protocol {
            Protocol::Http => Ok(&self.http),
            Protocol::Https => self
                .https
                .as_ref()
                .map_err(|reason| ClientError::Tls(reason.clone())),
        }
    }
}

/// Pool configuration for [`Agents`].
pub struct AgentOptions {
    /// Custom TLS configuration for the secure agent.
    tls_config: Option<ClientConfig>,
    /// Speak HTTP/2 without negotiation.
    http2_only: bool,
    /// Connection pool idle timeout.
    pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pool_max_idle_per_host: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentOptions {
    /// Options with default pool settings.
    pub fn new() -> Self {
        Self {
            tls_config: None,
            http2_only: false,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }

    /// Set a custom TLS configuration (custom roots, client certificates, ...).
    ///
    /// Default: built from the enabled `tls-*` features.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Use HTTP/2 directly, without HTTP/1.1 or ALPN negotiation.
    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.http2_only = enabled;
        self
    }

    /// Close pooled connections idle for longer than `timeout`.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Never close pooled connections for inactivity.
    pub fn pool_idle_timeout_none(mut self) -> Self {
        self.pool_idle_timeout = None;
        self
    }

    /// Maximum number of idle connections kept per host.
    ///
    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    fn client_builder(&self) -> Builder {
        let mut builder = Client::builder(TokioExecutor::new());

        // Required for pool_idle_timeout to take effect
        builder.pool_timer(TokioTimer::new());
        builder.pool_idle_timeout(self.pool_idle_timeout);
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);
        // One call is one request, even on a stale pooled connection
        builder.retry_canceled_requests(false);

        if self.http2_only {
            builder.http2_only(true);
        }
        builder
    }

    /// Build the plain and secure agents.
    pub fn build(self) -> Agents {
        let builder = self.client_builder();
        let tls_config = match self.tls_config {
            Some(config) => Ok(config),
            None => tls::default_tls_config().map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, "https agent unavailable");
                e.to_string()
            }),
        };

        let http = builder.build(HttpConnector::new());
        let https = tls_config
            .map(|config| Agent::Secure(builder.build(tls::build_https_connector(config))));

        Agents {
            http: Agent::Plain(http),
            https,
        }
    }
}

impl std::fmt::Debug for AgentOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentOptions")
            .field("tls_config", &self.tls_config.is_some())
            .field("http2_only", &self.http2_only)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}
