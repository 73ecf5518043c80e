use indexmap::IndexMap;

use crate::{
    DeclaredType, Value,
    config::{CoercionConfig, ListIntoArray},
    ty::InputObjectType,
};

/// Converts raw argument values into the type a resolver parameter declares.
///
/// This is the seam behind which the actual deserialization library lives. The bundled
/// implementation is [`ValueCoercer`].
pub trait ArgumentCoercer: Send + Sync + 'static {
    fn coerce(&self, raw: Value, declared_type: &DeclaredType) -> Result<Value, CoercionFailure>;
}

/// Why a raw value could not be coerced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionFailure {
    #[error("missing value")]
    MissingValue,
    #[error("unexpected null value")]
    UnexpectedNull,
    #[error("a list cannot be coerced into a fixed-size array")]
    ListIntoArray,
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },
    #[error("'{value}' is not a valid value")]
    UnknownEnumValue { value: String },
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: Box<CoercionFailure> },
    #[error("invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: Box<CoercionFailure> },
}

impl CoercionFailure {
    /// The innermost failure, looking through nested fields and items.
    pub fn root_cause(&self) -> &CoercionFailure {
        match self {
            CoercionFailure::InvalidField { reason, .. } | CoercionFailure::InvalidItem { reason, .. } => {
                reason.root_cause()
            }
            failure => failure,
        }
    }
}

/// A raw argument could not be converted into the type its parameter declares.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot coerce argument '{parameter}' into {declared_type}: {reason}")]
pub struct CoercionError {
    pub parameter: String,
    pub declared_type: DeclaredType,
    pub reason: CoercionFailure,
}

/// Default coercion rules.
///
/// Scalars are coerced by identity with a few widenings (ints into `Float` and `ID`). A
/// growable [`DeclaredType::List`] accepts both sequence shapes, while a fixed-size
/// [`DeclaredType::Array`] only accepts [`Value::Array`] unless configured with
/// [`ListIntoArray::Convert`].
#[derive(Debug, Clone, Default)]
pub struct ValueCoercer {
    config: CoercionConfig,
}

impl ValueCoercer {
    pub fn new(config: CoercionConfig) -> Self {
        Self { config }
    }

    fn coerce_items(
        &self,
        items: impl Iterator<Item = Value>,
        item_type: &DeclaredType,
    ) -> Result<Vec<Value>, CoercionFailure> {
        items
            .enumerate()
            .map(|(index, item)| {
                self.coerce(item, item_type)
                    .map_err(|reason| CoercionFailure::InvalidItem {
                        index,
                        reason: Box::new(reason),
                    })
            })
            .collect()
    }

    fn coerce_input_object(
        &self,
        ty: &InputObjectType,
        mut fields: IndexMap<String, Value>,
    ) -> Result<Value, CoercionFailure> {
        let mut coerced = IndexMap::with_capacity(ty.fields.len());

        for field in &ty.fields {
            let value = match fields.swap_remove(field.name.as_str()) {
                Some(raw) => self.coerce(raw, &field.ty),
                None => match &field.default_value {
                    Some(default) => self.coerce(default.clone(), &field.ty),
                    // Absent nullable fields stay absent.
                    None if field.ty.is_nullable() => continue,
                    None => Err(CoercionFailure::MissingValue),
                },
            }
            .map_err(|reason| CoercionFailure::InvalidField {
                field: field.name.clone(),
                reason: Box::new(reason),
            })?;

            coerced.insert(field.name.clone(), value);
        }

        Ok(Value::Object(coerced))
    }
}

impl ArgumentCoercer for ValueCoercer {
    fn coerce(&self, raw: Value, declared_type: &DeclaredType) -> Result<Value, CoercionFailure> {
        match (declared_type, raw) {
            (DeclaredType::Nullable(_), Value::Null) => Ok(Value::Null),
            (DeclaredType::Nullable(inner), raw) => self.coerce(raw, inner),
            (DeclaredType::Any, raw) => Ok(raw),
            (_, Value::Null) => Err(CoercionFailure::UnexpectedNull),

            (DeclaredType::Boolean, value @ Value::Boolean(_)) => Ok(value),
            (DeclaredType::Int, value @ Value::Int(_)) => Ok(value),
            (DeclaredType::Float, value @ Value::Float(_)) => Ok(value),
            (DeclaredType::Float, Value::Int(i)) if self.config.int_as_float => Ok(Value::Float(i as f64)),
            (DeclaredType::String, value @ Value::String(_)) => Ok(value),
            (DeclaredType::Id, value @ Value::String(_)) => Ok(value),
            (DeclaredType::Id, Value::Int(i)) => Ok(Value::String(i.to_string())),
            (DeclaredType::Enum(ty), Value::String(value)) => {
                if ty.contains(&value) {
                    Ok(Value::String(value))
                } else {
                    Err(CoercionFailure::UnknownEnumValue { value })
                }
            }
            (DeclaredType::InputObject(ty), Value::Object(fields)) => self.coerce_input_object(ty, fields),

            (DeclaredType::Array(item_type), Value::Array(items)) => {
                let items = self.coerce_items(items.into_vec().into_iter(), item_type)?;
                Ok(Value::Array(items.into_boxed_slice()))
            }
            (DeclaredType::Array(item_type), Value::List(items)) => match self.config.list_into_array {
                ListIntoArray::Reject => Err(CoercionFailure::ListIntoArray),
                ListIntoArray::Convert => {
                    let items = self.coerce_items(items.into_iter(), item_type)?;
                    Ok(Value::Array(items.into_boxed_slice()))
                }
            },
            (DeclaredType::List(item_type), Value::Array(items)) => {
                let items = self.coerce_items(items.into_vec().into_iter(), item_type)?;
                Ok(Value::List(items.into()))
            }
            (DeclaredType::List(item_type), Value::List(items)) => {
                let items = self.coerce_items(items.into_iter(), item_type)?;
                Ok(Value::List(items.into()))
            }

            (declared_type, raw) => Err(CoercionFailure::TypeMismatch {
                expected: declared_type.to_string(),
                found: raw.kind(),
            }),
        }
    }
}
