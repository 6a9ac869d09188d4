//! Client builder.
//!
//! Turns an endpoint description and an API table into a [`Client`]. Every
//! optional piece has its default applied here, once:
//!
//! | setting      | default                                   |
//! |--------------|-------------------------------------------|
//! | `adapter`    | [`JsonAdapter`]                           |
//! | `wrapper`    | [`Identity`]                              |
//! | `agents`     | [`AgentOptions::default`] built at `build` |
//! | `resolver`   | parsed from the endpoint description      |

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
#[cfg(feature = "tracing")]
use tracing::Instrument;

use crate::ClientError;
use crate::adapter::{Adapter, JsonAdapter};
use crate::agent::{AgentOptions, Agents};
use crate::api::CallInfo;
use crate::client::Client;
use crate::context::CallContext;
use crate::endpoint::{Resolve, parse_endpoint};
use crate::procedure::Procedure;
use crate::sender::send;
use crate::wrap::{Identity, Wrap};

enum EndpointSource {
    Description(String),
    Resolver(Arc<dyn Resolve>),
}

/// Builder for a [`Client`].
///
/// # Example
///
/// ```ignore
/// use httproc::ClientBuilder;
///
/// let client = ClientBuilder::new("http://localhost:3000/api")
///     .api("plus", "GET /plus")
///     .api("create", "POST /items/{id}")
///     .build()?;
///
/// let sum = client.call("plus", json!({ "a": 1, "b": 2 }), Default::default()).await?;
/// ```
pub struct ClientBuilder {
    endpoint: EndpointSource,
    apis: Vec<(String, String)>,
    adapter: Arc<dyn Adapter>,
    wrapper: Arc<dyn Wrap>,
    agents: Option<Agents>,
    agent_options: AgentOptions,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let endpoint = match &self.endpoint {
            EndpointSource::Description(d) => d.as_str(),
            EndpointSource::Resolver(_) => "<resolver>",
        };
        f.debug_struct("ClientBuilder")
            .field("endpoint", &endpoint)
            .field("apis", &self.apis)
            .field("agents", &self.agents.is_some())
            .field("agent_options", &self.agent_options)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Start a builder for the service at `endpoint`, e.g.
    /// `"http://localhost:3000/prefix"`.
    ///
    /// The description is parsed by [`build`](Self::build).
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self::with_source(EndpointSource::Description(endpoint.into()))
    }

    /// Start a builder whose endpoint comes from `resolver` on every call.
    pub fn from_resolver<R: Resolve>(resolver: R) -> Self {
        Self::with_source(EndpointSource::Resolver(Arc::new(resolver)))
    }

    fn with_source(endpoint: EndpointSource) -> Self {
        Self {
            endpoint,
            apis: Vec::new(),
            adapter: Arc::new(JsonAdapter),
            wrapper: Arc::new(Identity),
            agents: None,
            agent_options: AgentOptions::default(),
        }
    }

    /// Add an API entry: `name` is exposed as `"<METHOD> <path-pattern>"`.
    ///
    /// Adding the same name again replaces the earlier entry.
    pub fn api<N, E>(mut self, name: N, entry: E) -> Self
    where
        N: Into<String>,
        E: Into<String>,
    {
        self.apis.push((name.into(), entry.into()));
        self
    }

    /// Add several API entries.
    pub fn apis<I, N, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: Into<String>,
    {
        self.apis
            .extend(entries.into_iter().map(|(n, e)| (n.into(), e.into())));
        self
    }

    /// Replace the default [`JsonAdapter`].
    pub fn adapter<A: Adapter>(mut self, adapter: A) -> Self {
        self.adapter = Arc::new(adapter);
        self
    }

    /// Wrap every composed procedure with `wrapper`.
    pub fn wrapper<W: Wrap>(mut self, wrapper: W) -> Self {
        self.wrapper = Arc::new(wrapper);
        self
    }

    /// Use an existing agent set. Clients built from clones of the same
    /// [`Agents`] share their connection pools.
    pub fn agents(mut self, agents: Agents) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Options for the agent set created at build time. Ignored if
    /// [`agents`](Self::agents) is set.
    pub fn agent_options(mut self, options: AgentOptions) -> Self {
        self.agent_options = options;
        self
    }

    /// Resolve the endpoint with `resolver` instead of the description.
    pub fn resolver<R: Resolve>(mut self, resolver: R) -> Self {
        self.endpoint = EndpointSource::Resolver(Arc::new(resolver));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MalformedEndpoint`] if the endpoint description is invalid.
    /// - [`ClientError::MalformedApiEntry`] for the first entry that does not parse.
    pub fn build(self) -> Result<Client, ClientError> {
        let resolver: Arc<dyn Resolve> = match self.endpoint {
            EndpointSource::Description(description) => Arc::new(parse_endpoint(&description)?),
            EndpointSource::Resolver(resolver) => resolver,
        };

        let agents = match self.agents {
            Some(agents) => agents,
            None => Agents::new(self.agent_options),
        };

        let mut entries = HashMap::with_capacity(self.apis.len());
        for (name, entry) in self.apis {
            let info = CallInfo::parse(&name, &entry)?;
            let composed = compose(
                info.clone(),
                resolver.clone(),
                self.adapter.clone(),
                agents.clone(),
            );
            let procedure = self.wrapper.wrap(&info, composed);
            entries.insert(name, (info, procedure));
        }

        Ok(Client::from_entries(entries))
    }
}

/// resolve -> input adapter -> send -> output adapter.
fn compose(
    info: CallInfo,
    resolver: Arc<dyn Resolve>,
    adapter: Arc<dyn Adapter>,
    agents: Agents,
) -> Procedure {
    let info = Arc::new(info);

    Procedure::new(move |input: Value, ctx: CallContext| {
        let info = info.clone();
        let resolver = resolver.clone();
        let adapter = adapter.clone();
        let agents = agents.clone();

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "rpc.call",
            rpc.method = %info.name(),
            http.method = %info.method(),
            otel.kind = "client"
        );

        let call = async move {
            let endpoint = resolver.resolve().await?;
            let payload = adapter.build_request(&info, &input, &ctx)?;
            let response = send(&endpoint, payload, ctx.abort_signal(), &agents).await;
            adapter.parse_response(&info, response, &ctx)
        };

        #[cfg(feature = "tracing")]
        let call = call.instrument(span);

        call
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;
    use serde_json::json;

    use super::*;
    use crate::endpoint::{Endpoint, Protocol};

    struct FailingResolver;

    impl Resolve for FailingResolver {
        fn resolve(&self) -> BoxFuture<'_, Result<Endpoint, ClientError>> {
            Box::pin(async { Err(ClientError::malformed_endpoint("discovery", "no instances")) })
        }
    }

    #[test]
    fn test_build_one_procedure_per_entry() {
        let client = ClientBuilder::new("http://localhost:3000")
            .api("plus", "GET /plus")
            .apis([("create", "post /items/{id}"), ("remove", "DELETE /items/{id}")])
            .build()
            .unwrap();

        assert_eq!(client.len(), 3);
        assert_eq!(client.call_info("create").unwrap().method(), &http::Method::POST);
        assert!(client.get("remove").is_some());
        assert!(client.get("missing").is_none());
    }

    #[test]
    fn test_later_entry_replaces_earlier() {
        let client = ClientBuilder::new("http://localhost:3000")
            .api("a", "GET /one")
            .api("a", "PUT /two")
            .build()
            .unwrap();

        assert_eq!(client.len(), 1);
        assert_eq!(client.call_info("a").unwrap().path_pattern(), "/two");
    }

    #[test]
    fn test_malformed_endpoint_fails_build() {
        let err = ClientBuilder::new("localhost:3000")
            .api("plus", "GET /plus")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedEndpoint { .. }));
    }

    #[test]
    fn test_malformed_entry_fails_build() {
        let err = ClientBuilder::new("http://localhost:3000")
            .api("plus", "GET /plus")
            .api("broken", "/no-method")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedApiEntry { ref name, .. } if name == "broken"
        ));
    }

    #[test]
    fn test_wrapper_runs_once_per_entry_at_build() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        ClientBuilder::new("http://localhost:3000")
            .apis([("a", "GET /a"), ("b", "GET /b")])
            .wrapper(crate::wrap_fn(move |_info, p| {
                counter.fetch_add(1, Ordering::SeqCst);
                p
            }))
            .build()
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolver_error_reaches_caller() {
        let client = ClientBuilder::from_resolver(FailingResolver)
            .api("plus", "GET /plus")
            .build()
            .unwrap();

        let err = client
            .call("plus", json!({}), CallContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedEndpoint { .. }));
    }

    #[cfg(feature = "tracing")]
    #[tokio::test]
    async fn test_call_runs_inside_rpc_span() {
        use std::sync::Mutex;
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::Layer;

        struct SpanNames(Arc<Mutex<Vec<String>>>);

        impl<S: tracing::Subscriber> Layer<S> for SpanNames {
            fn on_new_span(
                &self,
                attrs: &tracing::span::Attributes<'_>,
                _id: &tracing::span::Id,
                _ctx: Context<'_, S>,
            ) {
                self.0.lock().unwrap().push(attrs.metadata().name().to_string());
            }
        }

        let names = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(SpanNames(names.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = ClientBuilder::from_resolver(FailingResolver)
            .api("plus", "GET /plus")
            .build()
            .unwrap();
        let _ = client.call("plus", json!({}), CallContext::new()).await;

        assert_eq!(*names.lock().unwrap(), vec!["rpc.call".to_string()]);
    }

    #[tokio::test]
    async fn test_resolver_override_replaces_description() {
        let endpoint = Endpoint::new(Protocol::Http, "127.0.0.1", 1, "");
        let client = ClientBuilder::new("not a uri")
            .resolver(crate::StaticResolver::new(endpoint))
            .api("plus", "GET /plus")
            .build()
            .unwrap();
        assert_eq!(client.len(), 1);
    }
}
