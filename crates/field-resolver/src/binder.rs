use std::{fmt, sync::Arc};

use crate::{
    FieldMetadata, ResolutionRequest, Value,
    coercion::{ArgumentCoercer, CoercionError, CoercionFailure},
    signature::{ParameterDescriptor, ParameterRole},
};

/// Value bound to a single parameter.
pub enum BoundValue<'a, C> {
    /// Coerced argument. `None` when the argument was absent and the parameter is nullable
    /// without default, which is distinct from an explicit null.
    Argument(Option<Value>),
    Context(&'a C),
    Environment(&'a FieldMetadata),
    Source(Option<&'a Value>),
}

impl<C> fmt::Debug for BoundValue<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Argument(value) => f.debug_tuple("Argument").field(value).finish(),
            BoundValue::Context(_) => f.write_str("Context"),
            BoundValue::Environment(field) => f.debug_tuple("Environment").field(field).finish(),
            BoundValue::Source(source) => f.debug_tuple("Source").field(source).finish(),
        }
    }
}

/// Bound values of all parameters, in declaration order.
pub struct BoundArguments<'a, C> {
    parameters: Arc<[ParameterDescriptor]>,
    values: Vec<BoundValue<'a, C>>,
}

impl<'a, C> BoundArguments<'a, C> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoundValue<'a, C>> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterDescriptor, &BoundValue<'a, C>)> {
        self.parameters.iter().zip(&self.values)
    }

    fn by_name(&self, name: &str) -> Option<&BoundValue<'a, C>> {
        self.parameters
            .iter()
            .position(|p| p.name == name)
            .and_then(|i| self.values.get(i))
    }

    /// Coerced value of the argument parameter with this name, `None` if absent.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        match self.by_name(name) {
            Some(BoundValue::Argument(value)) => value.as_ref(),
            _ => None,
        }
    }

    /// Takes ownership of an argument value, leaving it absent.
    pub fn take_argument(&mut self, name: &str) -> Option<Value> {
        let index = self.parameters.iter().position(|p| p.name == name)?;
        match self.values.get_mut(index) {
            Some(BoundValue::Argument(value)) => value.take(),
            _ => None,
        }
    }

    /// The request context, if any parameter has the context role.
    pub fn context(&self) -> Option<&'a C> {
        self.values.iter().find_map(|value| match value {
            BoundValue::Context(ctx) => Some(*ctx),
            _ => None,
        })
    }

    /// The field metadata, if any parameter has the environment role.
    pub fn environment(&self) -> Option<&'a FieldMetadata> {
        self.values.iter().find_map(|value| match value {
            BoundValue::Environment(field) => Some(*field),
            _ => None,
        })
    }

    /// The source object, if any parameter has the source role and a source was provided.
    pub fn source(&self) -> Option<&'a Value> {
        self.values.iter().find_map(|value| match value {
            BoundValue::Source(source) => *source,
            _ => None,
        })
    }

    pub fn into_values(self) -> Vec<BoundValue<'a, C>> {
        self.values
    }
}

impl<C> fmt::Debug for BoundArguments<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.parameters.iter().map(|p| &p.name).zip(&self.values))
            .finish()
    }
}

/// Binds every parameter from its source. Fails on the first argument that cannot be coerced,
/// in which case nothing is bound.
pub(crate) fn bind<'a, C>(
    parameters: Arc<[ParameterDescriptor]>,
    request: ResolutionRequest<'a, C>,
    coercer: &dyn ArgumentCoercer,
) -> Result<BoundArguments<'a, C>, CoercionError> {
    let values = parameters
        .iter()
        .map(|parameter| {
            let value = match parameter.role {
                ParameterRole::Context => BoundValue::Context(request.context),
                ParameterRole::Environment => BoundValue::Environment(request.field),
                ParameterRole::SourceObject => BoundValue::Source(request.source),
                ParameterRole::Plain => BoundValue::Argument(bind_argument(parameter, request, coercer)?),
            };
            Ok::<_, CoercionError>(value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BoundArguments { parameters, values })
}

fn bind_argument<C>(
    parameter: &ParameterDescriptor,
    request: ResolutionRequest<'_, C>,
    coercer: &dyn ArgumentCoercer,
) -> Result<Option<Value>, CoercionError> {
    let raw = match request.arguments.get(&parameter.name) {
        Some(raw) => raw.clone(),
        None => match &parameter.default_value {
            Some(default) => default.clone(),
            None if parameter.declared_type.is_nullable() => return Ok(None),
            None => return Err(coercion_error(parameter, CoercionFailure::MissingValue)),
        },
    };

    coercer
        .coerce(raw, &parameter.declared_type)
        .map(Some)
        .map_err(|reason| coercion_error(parameter, reason))
}

fn coercion_error(parameter: &ParameterDescriptor, reason: CoercionFailure) -> CoercionError {
    CoercionError {
        parameter: parameter.name.clone(),
        declared_type: parameter.declared_type.clone(),
        reason,
    }
}
