use std::{fmt, sync::Arc};

use crate::{
    BoundArguments, DeclaredType, DispatchError, DispatchResult, FunctionDescriptor, Invocation, ResolutionRequest,
    ResolverConfig, ResolverFunction, ResolverOutcome, Value,
    binder,
    coercion::{ArgumentCoercer, CoercionFailure, ValueCoercer},
    function::resolver_fn,
    predicate::{Evaluation, ExecutionPredicate, FnPredicate},
    signature::SignatureError,
    span::ResolverInvocationSpanBuilder,
};

/// What a resolver function is invoked against.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetBinding {
    /// The same instance for every request.
    Fixed(Value),
    /// The source object of each request.
    Source,
}

/// Resolves one field by invoking its resolver function.
///
/// Everything about the function is settled when the dispatcher is built: its signature,
/// what it's invoked against, the interception hook and the argument coercion. Dispatching
/// only binds the request onto that.
pub struct Dispatcher<C> {
    descriptor: FunctionDescriptor,
    function: Box<dyn ResolverFunction<C>>,
    target: TargetBinding,
    predicate: Option<Box<dyn ExecutionPredicate<C>>>,
    coercer: Arc<dyn ArgumentCoercer>,
}

impl<C: Send + Sync + 'static> Dispatcher<C> {
    pub fn builder(descriptor: FunctionDescriptor, function: impl ResolverFunction<C>) -> DispatcherBuilder<C> {
        DispatcherBuilder {
            descriptor,
            function: Box::new(function),
            target: TargetBinding::Source,
            predicate: None,
            coercer: None,
            config: ResolverConfig::default(),
        }
    }

    /// Same as [`Dispatcher::builder`] with a closure as resolver function.
    pub fn from_fn<F>(descriptor: FunctionDescriptor, f: F) -> DispatcherBuilder<C>
    where
        F: for<'a> Fn(&'a Value, BoundArguments<'a, C>) -> Invocation<'a> + Send + Sync + 'static,
    {
        Self::builder(descriptor, resolver_fn(f))
    }

    pub fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    pub fn target(&self) -> &TargetBinding {
        &self.target
    }

    /// Binds the request and invokes the resolver function.
    ///
    /// Failures happening before the invocation, a missing target or an argument that can't be
    /// coerced, are returned right away. Failures of the resolver function itself are only
    /// exposed through the returned outcome, whether it completed synchronously or not.
    pub fn dispatch<'a>(&'a self, request: ResolutionRequest<'a, C>) -> DispatchResult<ResolverOutcome<'a>> {
        let span = ResolverInvocationSpanBuilder {
            function_name: self.descriptor.name(),
            field: request.field,
        }
        .build();
        let _entered = span.span.clone().entered();

        let target = match (&self.target, request.source) {
            (TargetBinding::Fixed(target), _) => target,
            (TargetBinding::Source, Some(source)) => source,
            (TargetBinding::Source, None) => {
                let err = DispatchError::MissingTarget {
                    function: self.descriptor.name().to_string(),
                };
                span.record_failure(&err);
                return Err(err);
            }
        };

        let arguments = binder::bind(self.descriptor.shared_parameters(), request, self.coercer.as_ref())
            .map_err(|err| {
                tracing::debug!("Could not bind arguments of '{}': {err}", self.descriptor.name());
                let err = DispatchError::from(err);
                span.record_failure(&err);
                err
            })?;

        if let Some(predicate) = &self.predicate {
            if let Evaluation::Handled(value) = predicate.evaluate(target, &self.descriptor, &request) {
                tracing::debug!(
                    "Execution predicate resolved '{}' without invoking '{}'",
                    request.field.coordinate,
                    self.descriptor.name()
                );
                span.record_invocation("short_circuited");
                return Ok(ResolverOutcome::ready(Ok(value)));
            }
        }

        let invocation = self.function.call(target, arguments);
        span.record_invocation(if invocation.is_suspended() { "suspended" } else { "ready" });

        Ok(ResolverOutcome::from_invocation(invocation, span))
    }

    /// Dispatches and waits for the result.
    pub async fn resolve(&self, request: ResolutionRequest<'_, C>) -> DispatchResult<Value> {
        self.dispatch(request)?.await
    }
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("descriptor", &self.descriptor)
            .field("target", &self.target)
            .field("has_predicate", &self.predicate.is_some())
            .finish_non_exhaustive()
    }
}

pub struct DispatcherBuilder<C> {
    descriptor: FunctionDescriptor,
    function: Box<dyn ResolverFunction<C>>,
    target: TargetBinding,
    predicate: Option<Box<dyn ExecutionPredicate<C>>>,
    coercer: Option<Arc<dyn ArgumentCoercer>>,
    config: ResolverConfig,
}

impl<C: Send + Sync + 'static> DispatcherBuilder<C> {
    /// Invokes the function against this instance instead of the request source.
    #[must_use]
    pub fn fixed_target(mut self, target: impl Into<Value>) -> Self {
        self.target = TargetBinding::Fixed(target.into());
        self
    }

    #[must_use]
    pub fn predicate(mut self, predicate: impl ExecutionPredicate<C>) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn predicate_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &FunctionDescriptor, &ResolutionRequest<'_, C>) -> Evaluation + Send + Sync + 'static,
    {
        self.predicate(FnPredicate(f))
    }

    /// Replaces the default [`ValueCoercer`]. The coercion section of the configuration is
    /// ignored in that case.
    #[must_use]
    pub fn coercer(mut self, coercer: impl ArgumentCoercer) -> Self {
        self.coercer = Some(Arc::new(coercer));
        self
    }

    #[must_use]
    pub fn config(mut self, config: &ResolverConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn build(self) -> Result<Dispatcher<C>, SignatureError> {
        let coercer: Arc<dyn ArgumentCoercer> = match self.coercer {
            Some(coercer) => coercer,
            None => Arc::new(ValueCoercer::new(self.config.coercion)),
        };

        for parameter in self.descriptor.parameters() {
            let mut result = check_input_field_defaults(coercer.as_ref(), &parameter.declared_type);
            if let Some(default) = &parameter.default_value {
                result = result.and_then(|()| {
                    coercer
                        .coerce(default.clone(), &parameter.declared_type)
                        .map(|_| ())
                });
            }
            result.map_err(|reason| SignatureError::InvalidDefaultValue {
                function: self.descriptor.name().to_string(),
                parameter: parameter.name.clone(),
                reason,
            })?;
        }

        Ok(Dispatcher {
            descriptor: self.descriptor,
            function: self.function,
            target: self.target,
            predicate: self.predicate,
            coercer,
        })
    }
}

/// Coerces the defaults of every input object field reachable from `ty`.
fn check_input_field_defaults(coercer: &dyn ArgumentCoercer, ty: &DeclaredType) -> Result<(), CoercionFailure> {
    match ty {
        DeclaredType::Array(inner) | DeclaredType::List(inner) | DeclaredType::Nullable(inner) => {
            check_input_field_defaults(coercer, inner)
        }
        DeclaredType::InputObject(object) => object.fields.iter().try_for_each(|field| {
            let mut result = check_input_field_defaults(coercer, &field.ty);
            if let Some(default) = &field.default_value {
                result = result.and_then(|()| coercer.coerce(default.clone(), &field.ty).map(|_| ()));
            }
            result.map_err(|reason| CoercionFailure::InvalidField {
                field: field.name.clone(),
                reason: Box::new(reason),
            })
        }),
        _ => Ok(()),
    }
}
