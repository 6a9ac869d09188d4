//! The built client: call name -> procedure.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ClientError;
use crate::api::CallInfo;
use crate::builder::ClientBuilder;
use crate::context::CallContext;
use crate::procedure::Procedure;

/// A set of callable procedures, one per API entry.
///
/// Cloning is cheap; every clone shares the same connection agents.
///
/// # Example
///
/// ```ignore
/// use httproc::{CallContext, Client};
///
/// let client = Client::builder("http://localhost:3000")
///     .api("plus", "GET /plus")
///     .build()?;
///
/// #[derive(serde::Serialize)]
/// struct Plus { a: i64, b: i64 }
/// #[derive(serde::Deserialize)]
/// struct Sum { sum: i64 }
///
/// let sum: Sum = client.call_as("plus", &Plus { a: 1, b: 2 }, CallContext::new()).await?;
/// ```
#[derive(Clone)]
pub struct Client {
    entries: HashMap<String, (CallInfo, Procedure)>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("calls", &self.entries.values().map(|(i, _)| i).collect::<Vec<_>>())
            .finish()
    }
}

impl Client {
    /// Shorthand for [`ClientBuilder::new`].
    pub fn builder<S: Into<String>>(endpoint: S) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    pub(crate) fn from_entries(entries: HashMap<String, (CallInfo, Procedure)>) -> Self {
        Self { entries }
    }

    /// Invoke the procedure registered as `name`.
    ///
    /// # Errors
    ///
    /// [`ClientError::UnknownCall`] if there is no such entry, otherwise
    /// whatever the procedure fails with.
    pub async fn call(
        &self,
        name: &str,
        input: Value,
        ctx: CallContext,
    ) -> Result<Value, ClientError> {
        let procedure = self
            .get(name)
            .ok_or_else(|| ClientError::UnknownCall(name.to_string()))?;
        procedure.call(input, ctx).await
    }

    /// Like [`call`](Self::call), converting input and output through serde.
    pub async fn call_as<I, O>(
        &self,
        name: &str,
        input: &I,
        ctx: CallContext,
    ) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(|e| ClientError::Encode(e.to_string()))?;
        let output = self.call(name, input, ctx).await?;
        serde_json::from_value(output).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// The procedure registered as `name`.
    pub fn get(&self, name: &str) -> Option<&Procedure> {
        self.entries.get(name).map(|(_, p)| p)
    }

    /// What the entry `name` was parsed into.
    pub fn call_info(&self, name: &str) -> Option<&CallInfo> {
        self.entries.get(name).map(|(i, _)| i)
    }

    /// All call names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bare call name -> procedure mapping.
    pub fn into_procedures(self) -> HashMap<String, Procedure> {
        self.entries
            .into_iter()
            .map(|(name, (_, procedure))| (name, procedure))
            .collect()
    }
}
