//! Callable remote procedures from a declarative HTTP API table.
//!
//! Give the builder an endpoint and a table of `name -> "METHOD /path/{param}"`
//! entries; get back a [`Client`] holding one async [`Procedure`] per entry.
//! Each call:
//!
//! 1. resolves the endpoint (every call, see [`Resolve`]),
//! 2. turns its input into a [`RequestPayload`] with the [`Adapter`],
//! 3. sends exactly one HTTP request through a pooled [`Agent`](agent::Agent),
//!    racing it against the caller's [`AbortSignal`] if one is given,
//! 4. turns the response back into a value with the [`Adapter`].
//!
//! There is no retry and no timeout built in. Wrap procedures with a
//! [`Wrap`] hook for retry, and pass [`AbortSignal::after`] for deadlines.
//!
//! ## Example
//!
//! ```ignore
//! use httproc::{AbortSignal, CallContext, ClientBuilder};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let client = ClientBuilder::new("http://localhost:3000")
//!     .api("plus", "GET /plus")
//!     .api("rename", "PUT /items/{id}")
//!     .build()?;
//!
//! let sum = client.call("plus", json!({ "a": 1, "b": 2 }), CallContext::new()).await?;
//! assert_eq!(sum, json!({ "sum": 3 }));
//!
//! let ctx = CallContext::new().with_abort(AbortSignal::after(Duration::from_secs(2)));
//! client.call("rename", json!({ "id": 5, "name": "five" }), ctx).await?;
//! ```
//!
//! ## Default JSON adapter
//!
//! | method                 | path                      | query                      | body          |
//! |------------------------|---------------------------|----------------------------|---------------|
//! | `POST`, `PUT`, `PATCH` | pattern filled from input | none                       | input as JSON |
//! | anything else          | pattern filled from input | `?` + percent-encoded JSON | none          |
//!
//! A 2xx body is parsed as JSON; any other status is a
//! [`ClientError::HttpResponse`] carrying the status code and raw body.
//!
//! ## TLS
//!
//! `https` endpoints use rustls. The crypto provider and root store are
//! chosen by cargo features: `tls` (default, ring + native roots),
//! `tls-ring`, `tls-aws-lc`, `tls-native-roots`, `tls-webpki-roots`.
//!
//! ## Tracing
//!
//! The `tracing` feature runs each call inside an `rpc.call` span and emits
//! `debug!` events from the transport.

pub mod abort;
pub mod adapter;
pub mod agent;
pub mod api;
pub mod builder;
pub mod client;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod payload;
pub mod procedure;
pub mod sender;
pub mod wrap;

pub use abort::{AbortController, AbortSignal};
pub use adapter::{Adapter, JsonAdapter};
pub use agent::{AgentOptions, Agents};
pub use api::CallInfo;
pub use builder::ClientBuilder;
pub use client::Client;
pub use context::CallContext;
pub use endpoint::{Endpoint, Protocol, Resolve, StaticResolver, parse_endpoint};
pub use error::ClientError;
pub use payload::{RequestPayload, ResponseResult};
pub use procedure::{Invocation, Procedure};
pub use sender::send;
pub use wrap::{Chain, Identity, Wrap, WrapFn, wrap_fn};

// Re-export commonly used external types
pub use http::{HeaderMap, Method, StatusCode};
pub use serde_json::Value;
