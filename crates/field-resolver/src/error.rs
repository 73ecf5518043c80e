use resolver_error::{ErrorCode, GraphqlError};

use crate::{CoercionError, FieldCoordinate, FieldMetadata};

/// Why a field could not be resolved.
///
/// [`DispatchError::Coercion`] and [`DispatchError::MissingTarget`] are raised before the
/// resolver function is invoked. Anything the function itself fails with is kept as is in
/// [`DispatchError::Function`] and can be downcast back to its original type.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("Cannot invoke '{function}': no target instance is configured and the request has no source object")]
    MissingTarget { function: String },
    #[error(transparent)]
    Function(anyhow::Error),
    #[error("No resolver is registered for '{coordinate}'")]
    UnknownField { coordinate: FieldCoordinate },
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Coercion(_) => ErrorCode::ArgumentCoercionError,
            DispatchError::MissingTarget { .. } => ErrorCode::MissingTarget,
            DispatchError::Function(_) => ErrorCode::ResolverError,
            DispatchError::UnknownField { .. } => ErrorCode::UnknownField,
        }
    }

    pub fn as_coercion(&self) -> Option<&CoercionError> {
        match self {
            DispatchError::Coercion(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_missing_target(&self) -> bool {
        matches!(self, DispatchError::MissingTarget { .. })
    }

    /// Error raised by the resolver function, if that's what this is.
    pub fn as_function_error(&self) -> Option<&anyhow::Error> {
        match self {
            DispatchError::Function(err) => Some(err),
            _ => None,
        }
    }

    /// Converts into the error exposed in the GraphQL response for this field.
    pub fn into_graphql_error(self, field: &FieldMetadata) -> GraphqlError {
        tracing::debug!("Failed to resolve '{}': {}", field.coordinate, self);
        GraphqlError::from(self).with_path(field.path.clone())
    }
}

impl From<DispatchError> for GraphqlError {
    fn from(err: DispatchError) -> Self {
        let code = err.code();
        match &err {
            DispatchError::Coercion(coercion) => GraphqlError::new(err.to_string(), code)
                .with_extension("argument", coercion.parameter.clone())
                .with_extension("expectedType", coercion.declared_type.to_string()),
            // Not the client's fault, and it shouldn't learn about the resolver internals either.
            DispatchError::MissingTarget { .. } | DispatchError::UnknownField { .. } => {
                tracing::error!(error_code = code.as_ref(), "{}", err);
                GraphqlError::internal_server_error()
            }
            DispatchError::Function(err) => GraphqlError::new(err.to_string(), code),
        }
    }
}
