//! Caller-supplied cancellation.
//!
//! An [`AbortSignal`] is a cloneable, one-shot future that resolves to an
//! abort reason. The request sender races it against the response; whichever
//! finishes first decides the outcome of the call. Nothing in this crate
//! creates a signal on its own, and there is no built-in timeout: use
//! [`AbortSignal::after`] for a deadline.
//!
//! # Example
//!
//! ```ignore
//! use httproc::{AbortController, CallContext};
//!
//! let controller = AbortController::new();
//! let ctx = CallContext::new().with_abort(controller.signal());
//!
//! let call = client.call("slow", input, ctx);
//! controller.abort("user navigated away");
//!
//! assert!(call.await.unwrap_err().is_aborted());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

/// A one-shot cancellation notification carrying a reason.
#[derive(Clone)]
pub struct AbortSignal {
    inner: Shared<BoxFuture<'static, String>>,
}

impl AbortSignal {
    /// Signal that fires when `fut` completes, with its output as the reason.
    pub fn from_future<F, R>(fut: F) -> Self
    where
        F: Future<Output = R> + Send + 'static,
        R: Into<String>,
    {
        Self {
            inner: fut.map(|reason: R| -> String { reason.into() }).boxed().shared(),
        }
    }

    /// Signal that fires once `duration` has elapsed from now.
    ///
    /// Must be awaited inside a Tokio runtime.
    pub fn after(duration: Duration) -> Self {
        let deadline = tokio::time::Instant::now() + duration;
        Self::from_future(async move {
            tokio::time::sleep_until(deadline).await;
            format!("deadline of {duration:?} elapsed")
        })
    }

    /// Signal that never fires.
    pub fn never() -> Self {
        Self::from_future(future::pending::<String>())
    }

    /// Whether the signal has already fired.
    pub fn is_aborted(&self) -> bool {
        self.reason().is_some()
    }

    /// The abort reason, if the signal has already fired.
    pub fn reason(&self) -> Option<String> {
        self.inner.clone().now_or_never()
    }
}

impl Future for AbortSignal {
    type Output = String;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl std::fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortSignal")
            .field("fired", &self.inner.peek().is_some())
            .finish()
    }
}

/// Producer side of an [`AbortSignal`].
///
/// Dropping the controller without calling [`abort`](Self::abort) leaves its
/// signals pending forever.
#[derive(Debug)]
pub struct AbortController {
    tx: oneshot::Sender<String>,
    signal: AbortSignal,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel::<String>();
        let signal = AbortSignal::from_future(async move {
            match rx.await {
                Ok(reason) => reason,
                Err(_) => future::pending::<String>().await,
            }
        });
        Self { tx, signal }
    }

    /// A signal tied to this controller. Every clone fires together.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Fire the signal with `reason`.
    pub fn abort<R: Into<String>>(self, reason: R) {
        // Cannot fail: `self.signal` still holds the receiver.
        let _ = self.tx.send(reason.into());
    }
}
