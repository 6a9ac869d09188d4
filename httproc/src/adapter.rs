//! Adapters between logical calls and HTTP messages.
//!
//! An [`Adapter`] has two halves: [`build_request`](Adapter::build_request)
//! turns call input into a [`RequestPayload`], and
//! [`parse_response`](Adapter::parse_response) turns the outcome of the
//! exchange into the call's result. The client only ever holds an
//! `Arc<dyn Adapter>`, so any serialization can be swapped in per client.
//!
//! [`JsonAdapter`] is the default.

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::ClientError;
use crate::api::CallInfo;
use crate::context::CallContext;
use crate::format::format;
use crate::payload::{RequestPayload, ResponseResult};

/// Request/response shaping for a client.
///
/// # Example
///
/// ```ignore
/// use httproc::{Adapter, CallContext, CallInfo, ClientError, RequestPayload, ResponseResult};
/// use serde_json::Value;
///
/// struct PlainText;
///
/// impl Adapter for PlainText {
///     fn build_request(&self, info: &CallInfo, input: &Value, _: &CallContext)
///         -> Result<RequestPayload, ClientError>
///     {
///         let mut payload = RequestPayload::new(info.method().clone(), info.path_pattern());
///         payload.body = Some(input.to_string());
///         Ok(payload)
///     }
///
///     fn parse_response(&self, _: &CallInfo, response: Result<ResponseResult, ClientError>, _: &CallContext)
///         -> Result<Value, ClientError>
///     {
///         Ok(Value::String(response?.body))
///     }
/// }
/// ```
pub trait Adapter: Send + Sync + 'static {
    /// Build the HTTP request for one invocation.
    fn build_request(
        &self,
        info: &CallInfo,
        input: &Value,
        ctx: &CallContext,
    ) -> Result<RequestPayload, ClientError>;

    /// Turn the outcome of the exchange into the call's result.
    ///
    /// `response` is the settled exchange: a transport failure or abort
    /// arrives here as `Err` and is normally passed through.
    fn parse_response(
        &self,
        info: &CallInfo,
        response: Result<ResponseResult, ClientError>,
        ctx: &CallContext,
    ) -> Result<Value, ClientError>;
}

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, as `encodeURIComponent`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The default adapter: JSON in, JSON out.
///
/// - `POST`, `PUT`, `PATCH`: the input is the JSON body, with
///   `Content-Type: application/json; charset=utf-8` and a matching
///   `Content-Length`. No query string.
/// - Every other method: no body and no headers; the URL-encoded JSON of the
///   whole input is the query string (`?%7B%22a%22%3A1%7D`), percent-encoded
///   like `encodeURIComponent` (a space is `%20`, never `+`).
/// - In every case `{name}` tokens in the path pattern are filled from the
///   input's fields.
/// - A 2xx body is parsed as JSON (an empty body is `null`); any other status
///   fails with [`ClientError::HttpResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAdapter;

impl JsonAdapter {
    fn carries_body(method: &Method) -> bool {
        matches!(*method, Method::POST | Method::PUT | Method::PATCH)
    }
}

impl Adapter for JsonAdapter {
    fn build_request(
        &self,
        info: &CallInfo,
        input: &Value,
        _ctx: &CallContext,
    ) -> Result<RequestPayload, ClientError> {
        let path = format(info.path_pattern(), input);
        let json = serde_json::to_string(input).map_err(|e| ClientError::Encode(e.to_string()))?;

        let mut payload = RequestPayload::new(info.method().clone(), path);
        if Self::carries_body(info.method()) {
            payload
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            payload
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(json.len()));
            payload.body = Some(json);
        } else {
            let encoded = utf8_percent_encode(&json, QUERY_COMPONENT);
            payload.query = Some(format!("?{encoded}"));
        }

        Ok(payload)
    }

    fn parse_response(
        &self,
        _info: &CallInfo,
        response: Result<ResponseResult, ClientError>,
        _ctx: &CallContext,
    ) -> Result<Value, ClientError> {
        let response = response?;

        if !response.is_success() {
            return Err(ClientError::HttpResponse {
                code: response.status.as_u16(),
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
