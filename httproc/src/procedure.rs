//! Type-erased, cheaply cloneable callables.
//!
//! A [`Procedure`] is what the builder produces for each API entry and what a
//! [`Wrap`](crate::Wrap) hook receives and returns. It also implements
//! [`tower_service::Service`], so tower middleware can drive it directly.

use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::ClientError;
use crate::context::CallContext;

/// The future returned by [`Procedure::call`].
pub type ProcedureFuture = BoxFuture<'static, Result<Value, ClientError>>;

type ProcedureFn = dyn Fn(Value, CallContext) -> ProcedureFuture + Send + Sync;

/// `(input, context) -> future of output`.
#[derive(Clone)]
pub struct Procedure {
    inner: Arc<ProcedureFn>,
}

impl Procedure {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ClientError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |input, ctx| f(input, ctx).boxed()),
        }
    }

    /// Invoke the procedure. Each call is independent of every other.
    pub fn call(&self, input: Value, ctx: CallContext) -> ProcedureFuture {
        (self.inner)(input, ctx)
    }
}

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Procedure").finish_non_exhaustive()
    }
}

/// A request for a [`Procedure`] used as a tower service.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub input: Value,
    pub context: CallContext,
}

impl Invocation {
    pub fn new(input: Value) -> Self {
        Self {
            input,
            context: CallContext::default(),
        }
    }

    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = context;
        self
    }
}

impl tower_service::Service<Invocation> for Procedure {
    type Response = Value;
    type Error = ClientError;
    type Future = ProcedureFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Invocation) -> Self::Future {
        (self.inner)(req.input, req.context)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::abort::AbortController;

    fn echo() -> Procedure {
        Procedure::new(|input, _ctx| async move { Ok(input) })
    }

    #[tokio::test]
    async fn test_call() {
        let value = echo().call(json!({ "a": 1 }), CallContext::new()).await.unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_clones_share_behavior() {
        let procedure = Procedure::new(|_input, _ctx| async {
            Err(ClientError::UnknownCall("nope".into()))
        });
        let copy = procedure.clone();
        assert!(procedure.call(Value::Null, CallContext::new()).await.is_err());
        assert!(copy.call(Value::Null, CallContext::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_context_reaches_procedure() {
        let procedure = Procedure::new(|_input, ctx: CallContext| async move {
            Ok(Value::Bool(ctx.abort_signal().is_some_and(|s| s.is_aborted())))
        });

        let controller = AbortController::new();
        let ctx = CallContext::new().with_abort(controller.signal());
        controller.abort("stop");

        assert_eq!(procedure.call(Value::Null, ctx).await.unwrap(), Value::Bool(true));
        assert_eq!(
            procedure.call(Value::Null, CallContext::new()).await.unwrap(),
            Value::Bool(false)
        );
    }

    #[tokio::test]
    async fn test_as_tower_service() {
        let value = echo()
            .oneshot(Invocation::new(json!([1, 2, 3])))
            .await
            .unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }
}
