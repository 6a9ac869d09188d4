//! One HTTP exchange per call, raced against the call's abort signal.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::ClientError;
use crate::abort::AbortSignal;
use crate::agent::{Agent, Agents, RequestBody};
use crate::endpoint::Endpoint;
use crate::error::BoxError;
use crate::payload::{RequestPayload, ResponseResult};

/// Send `payload` to `endpoint` through the agent for its protocol.
///
/// Performs at most one exchange and never retries. The request target is
/// `path_prefix + path + query`.
///
/// When `abort` is given, the exchange is raced against it:
///
/// - if the signal fires before the full response has been read, the
///   exchange is dropped (closing its connection instead of returning it to
///   the pool) and the call fails with [`ClientError::HttpRequestAborted`];
/// - once the response has completed the signal has no effect.
///
/// If both are ready in the same poll, the response wins.
///
/// # Errors
///
/// - [`ClientError::Tls`] if there is no secure agent for an `https` endpoint.
/// - [`ClientError::InvalidRequest`] if the payload cannot form a request.
/// - [`ClientError::HttpRequest`] for transport failures, including errors
///   while reading the response body.
/// - [`ClientError::HttpRequestAborted`] as described above.
pub async fn send(
    endpoint: &Endpoint,
    payload: RequestPayload,
    abort: Option<&AbortSignal>,
    agents: &Agents,
) -> Result<ResponseResult, ClientError> {
    let agent = agents.get(endpoint.protocol())?;
    let uri = endpoint.uri_for(&payload.path, payload.query.as_deref());
    #[cfg(feature = "tracing")]
    tracing::debug!(method = %payload.method, %uri, "sending request");

    let request = build_request(uri, payload)?;
    let exchange = exchange(agent, endpoint, request);

    let Some(signal) = abort else {
        return exchange.await;
    };

    tokio::select! {
        biased;

        result = exchange => result,
        reason = signal.clone() => {
            #[cfg(feature = "tracing")]
            tracing::debug!(%reason, "request aborted before response completed");
            Err(ClientError::HttpRequestAborted { reason })
        }
    }
}

fn build_request(
    uri: String,
    payload: RequestPayload,
) -> Result<http::Request<RequestBody>, ClientError> {
    let mut builder = http::Request::builder().method(payload.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(payload.headers);
    }

    let body = payload.body.map(Bytes::from).unwrap_or_default();
    builder
        .body(Full::new(body))
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))
}

async fn exchange(
    agent: &Agent,
    endpoint: &Endpoint,
    request: http::Request<RequestBody>,
) -> Result<ResponseResult, ClientError> {
    let transport_error = |source: BoxError| {
        ClientError::http_request(endpoint.protocol(), endpoint.host(), endpoint.port(), source)
    };

    let response = agent
        .request(request)
        .await
        .map_err(|e| transport_error(e.into()))?;

    let (parts, body) = response.into_parts();
    #[cfg(feature = "tracing")]
    tracing::debug!(status = %parts.status, "response received");

    let body = body
        .collect()
        .await
        .map_err(|e| transport_error(e.into()))?
        .to_bytes();

    Ok(ResponseResult {
        status: parts.status,
        headers: parts.headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
