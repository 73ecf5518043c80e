use std::{fmt, sync::Arc};

use crate::Value;

/// Type a resolver parameter declares. Anything not wrapped in [`DeclaredType::Nullable`] is
/// mandatory.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Accepts any value as is.
    Any,
    Boolean,
    Int,
    Float,
    String,
    Id,
    Enum(Arc<EnumType>),
    InputObject(Arc<InputObjectType>),
    /// Fixed-size sequence.
    Array(Box<DeclaredType>),
    /// Growable sequence.
    List(Box<DeclaredType>),
    Nullable(Box<DeclaredType>),
}

impl DeclaredType {
    pub fn array(item: DeclaredType) -> Self {
        DeclaredType::Array(Box::new(item))
    }

    pub fn list(item: DeclaredType) -> Self {
        DeclaredType::List(Box::new(item))
    }

    /// Wraps the type into a nullable one, unless it already is.
    pub fn nullable(self) -> Self {
        match self {
            DeclaredType::Nullable(_) => self,
            ty => DeclaredType::Nullable(Box::new(ty)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, DeclaredType::Nullable(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Any => f.write_str("Any"),
            DeclaredType::Boolean => f.write_str("Boolean"),
            DeclaredType::Int => f.write_str("Int"),
            DeclaredType::Float => f.write_str("Float"),
            DeclaredType::String => f.write_str("String"),
            DeclaredType::Id => f.write_str("ID"),
            DeclaredType::Enum(ty) => f.write_str(&ty.name),
            DeclaredType::InputObject(ty) => f.write_str(&ty.name),
            DeclaredType::Array(item) => write!(f, "Array<{item}>"),
            DeclaredType::List(item) => write!(f, "List<{item}>"),
            DeclaredType::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

impl From<EnumType> for DeclaredType {
    fn from(ty: EnumType) -> Self {
        DeclaredType::Enum(Arc::new(ty))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub fields: Vec<InputField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: String,
    pub ty: DeclaredType,
    pub default_value: Option<Value>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: DeclaredType) -> Self {
        self.fields.push(InputField {
            name: name.into(),
            ty,
            default_value: None,
        });
        self
    }

    #[must_use]
    pub fn field_with_default(mut self, name: impl Into<String>, ty: DeclaredType, default: impl Into<Value>) -> Self {
        self.fields.push(InputField {
            name: name.into(),
            ty,
            default_value: Some(default.into()),
        });
        self
    }
}

impl From<InputObjectType> for DeclaredType {
    fn from(ty: InputObjectType) -> Self {
        DeclaredType::InputObject(Arc::new(ty))
    }
}
