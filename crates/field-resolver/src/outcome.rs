use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::{
    FutureExt, TryFutureExt,
    future::{self, BoxFuture},
};
use tracing::Instrument;

use crate::{DispatchError, Invocation, Value, span::ResolverInvocationSpan};

/// Handle on the result of a dispatch.
///
/// The same type is returned whether the resolver function completed synchronously or
/// suspended. Dropping the handle before completion drops the suspended computation with it.
#[must_use = "outcomes do nothing unless awaited"]
pub struct ResolverOutcome<'a>(Inner<'a>);

enum Inner<'a> {
    Ready(future::Ready<Result<Value, DispatchError>>),
    Pending(BoxFuture<'a, Result<Value, DispatchError>>),
}

impl<'a> ResolverOutcome<'a> {
    pub fn ready(result: Result<Value, DispatchError>) -> Self {
        ResolverOutcome(Inner::Ready(future::ready(result)))
    }

    pub fn pending(future: impl Future<Output = Result<Value, DispatchError>> + Send + 'a) -> Self {
        ResolverOutcome(Inner::Pending(future.boxed()))
    }

    /// Whether the result was already available when the handle was created.
    pub fn is_ready(&self) -> bool {
        matches!(self.0, Inner::Ready(_))
    }

    /// Normalizes whatever the resolver function returned.
    pub(crate) fn from_invocation(invocation: Invocation<'a>, span: ResolverInvocationSpan) -> Self {
        match invocation {
            Invocation::Ready(result) => {
                let result = result.map_err(DispatchError::Function);
                if let Err(err) = &result {
                    span.record_failure(err);
                }
                Self::ready(result)
            }
            Invocation::Suspended(future) => {
                let instrumented_span = span.span.clone();
                Self::pending(
                    future
                        .map_err(DispatchError::Function)
                        .inspect_err(move |err| {
                            tracing::debug!("Suspended resolver failed: {err}");
                            span.record_failure(err)
                        })
                        .instrument(instrumented_span),
                )
            }
        }
    }
}

impl Future for ResolverOutcome<'_> {
    type Output = Result<Value, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.0 {
            Inner::Ready(ready) => ready.poll_unpin(cx),
            Inner::Pending(future) => future.poll_unpin(cx),
        }
    }
}

impl std::fmt::Debug for ResolverOutcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Inner::Ready(_) => f.write_str("ResolverOutcome::Ready"),
            Inner::Pending(_) => f.write_str("ResolverOutcome::Pending"),
        }
    }
}
