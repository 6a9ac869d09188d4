//! Per-call wrapper hooks.
//!
//! A wrapper sees each API entry once, at build time, and returns the
//! procedure that will actually be exposed for it. This is where logging,
//! metrics or retry belong; the core itself does none of them.
//!
//! # Example
//!
//! ```ignore
//! use httproc::{Chain, ClientBuilder, Procedure, wrap_fn};
//!
//! let log = wrap_fn(|info, inner: Procedure| {
//!     let name = info.name().to_string();
//!     Procedure::new(move |input, ctx| {
//!         tracing::info!(call = %name, "calling");
//!         inner.call(input, ctx)
//!     })
//! });
//!
//! let client = ClientBuilder::new("http://localhost:3000")
//!     .api("plus", "GET /plus")
//!     .wrapper(Chain(log, retry))
//!     .build()?;
//! ```

use crate::api::CallInfo;
use crate::procedure::Procedure;

/// Builds the exposed procedure for one API entry from the composed one.
///
/// The returned procedure must keep the `(input, context) -> future` shape;
/// it may call `procedure` any number of times, or not at all.
pub trait Wrap: Send + Sync + 'static {
    fn wrap(&self, info: &CallInfo, procedure: Procedure) -> Procedure;
}

/// Returns every procedure unchanged. The default wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Wrap for Identity {
    #[inline]
    fn wrap(&self, _info: &CallInfo, procedure: Procedure) -> Procedure {
        procedure
    }
}

/// A wrapper built from a closure. See [`wrap_fn`].
#[derive(Clone)]
pub struct WrapFn<F>(F);

/// Use `f` as a wrapper.
pub fn wrap_fn<F>(f: F) -> WrapFn<F>
where
    F: Fn(&CallInfo, Procedure) -> Procedure + Send + Sync + 'static,
{
    WrapFn(f)
}

impl<F> Wrap for WrapFn<F>
where
    F: Fn(&CallInfo, Procedure) -> Procedure + Send + Sync + 'static,
{
    fn wrap(&self, info: &CallInfo, procedure: Procedure) -> Procedure {
        (self.0)(info, procedure)
    }
}

impl<F> std::fmt::Debug for WrapFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapFn").finish_non_exhaustive()
    }
}

/// Two wrappers composed; `A` ends up outermost.
///
/// A call through `Chain(a, b)` enters `a`'s procedure first, which then
/// calls into `b`'s, which calls the composed procedure.
#[derive(Debug, Clone)]
pub struct Chain<A, B>(pub A, pub B);

impl<A, B> Wrap for Chain<A, B>
where
    A: Wrap,
    B: Wrap,
{
    fn wrap(&self, info: &CallInfo, procedure: Procedure) -> Procedure {
        let inner = self.1.wrap(info, procedure);
        self.0.wrap(info, inner)
    }
}
