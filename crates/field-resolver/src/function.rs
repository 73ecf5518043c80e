use std::future::Future;

use futures_util::{FutureExt, future::BoxFuture};

use crate::{BoundArguments, Value};

/// Function backing a field.
///
/// `target` is either the fixed instance the dispatcher was built with or the source object
/// of the request. Arguments are bound in the order of the function's
/// [`FunctionDescriptor`](crate::FunctionDescriptor).
pub trait ResolverFunction<C>: Send + Sync + 'static {
    fn call<'a>(&'a self, target: &'a Value, arguments: BoundArguments<'a, C>) -> Invocation<'a>;
}

/// What a resolver function returns: either its result right away or a computation that
/// completes later.
pub enum Invocation<'a> {
    Ready(anyhow::Result<Value>),
    Suspended(BoxFuture<'a, anyhow::Result<Value>>),
}

impl<'a> Invocation<'a> {
    pub fn ready(value: impl Into<Value>) -> Self {
        Invocation::Ready(Ok(value.into()))
    }

    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Invocation::Ready(Err(error.into()))
    }

    pub fn suspended(future: impl Future<Output = anyhow::Result<Value>> + Send + 'a) -> Self {
        Invocation::Suspended(future.boxed())
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Invocation::Suspended(_))
    }
}

impl From<anyhow::Result<Value>> for Invocation<'_> {
    fn from(result: anyhow::Result<Value>) -> Self {
        Invocation::Ready(result)
    }
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Invocation::Suspended(_) => f.write_str("Suspended"),
        }
    }
}

/// Resolver function backed by a closure, see [`resolver_fn`].
pub struct FnResolver<F>(F);

impl<C, F> ResolverFunction<C> for FnResolver<F>
where
    F: for<'a> Fn(&'a Value, BoundArguments<'a, C>) -> Invocation<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, target: &'a Value, arguments: BoundArguments<'a, C>) -> Invocation<'a> {
        (self.0)(target, arguments)
    }
}

/// Wraps a closure into a [`ResolverFunction`].
pub fn resolver_fn<C, F>(f: F) -> FnResolver<F>
where
    F: for<'a> Fn(&'a Value, BoundArguments<'a, C>) -> Invocation<'a> + Send + Sync + 'static,
{
    FnResolver(f)
}
