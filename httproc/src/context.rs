//! Per-invocation call context.

use crate::abort::AbortSignal;

/// Context supplied by the caller with each invocation.
///
/// The client never creates one on its own; an omitted context is the
/// [`Default`] (no abort signal).
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    abort: Option<AbortSignal>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Race the call against `signal`.
    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        self.abort.as_ref()
    }
}

impl From<AbortSignal> for CallContext {
    fn from(signal: AbortSignal) -> Self {
        Self::new().with_abort(signal)
    }
}
