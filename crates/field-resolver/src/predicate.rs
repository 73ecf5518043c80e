use crate::{FunctionDescriptor, ResolutionRequest, Value};

/// Result of an [`ExecutionPredicate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The resolver function is invoked as usual.
    NotHandled,
    /// The resolver function is skipped and this value is used instead. `Handled(Value::Null)`
    /// is a legitimate result.
    Handled(Value),
}

/// Hook consulted after the parameters were bound and before the resolver function is
/// invoked. It may resolve the field itself.
pub trait ExecutionPredicate<C>: Send + Sync + 'static {
    fn evaluate(&self, target: &Value, function: &FunctionDescriptor, request: &ResolutionRequest<'_, C>)
    -> Evaluation;
}

pub(crate) struct FnPredicate<F>(pub F);

impl<C, F> ExecutionPredicate<C> for FnPredicate<F>
where
    F: Fn(&Value, &FunctionDescriptor, &ResolutionRequest<'_, C>) -> Evaluation + Send + Sync + 'static,
{
    fn evaluate(
        &self,
        target: &Value,
        function: &FunctionDescriptor,
        request: &ResolutionRequest<'_, C>,
    ) -> Evaluation {
        (self.0)(target, function, request)
    }
}
