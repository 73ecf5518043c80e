use std::fmt;

use resolver_error::ErrorPath;

use crate::{Arguments, Value};

/// Everything a resolver receives for one field resolution.
pub struct ResolutionRequest<'a, C> {
    pub arguments: &'a Arguments,
    /// Value produced by the parent field, if any.
    pub source: Option<&'a Value>,
    /// Request-wide data, shared by all resolutions of a request.
    pub context: &'a C,
    pub field: &'a FieldMetadata,
}

impl<'a, C> ResolutionRequest<'a, C> {
    pub fn new(arguments: &'a Arguments, context: &'a C, field: &'a FieldMetadata) -> Self {
        Self {
            arguments,
            source: None,
            context,
            field,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'a Value) -> Self {
        self.source = Some(source);
        self
    }
}

// Manual impls, deriving would require `C: Clone`.
impl<C> Clone for ResolutionRequest<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ResolutionRequest<'_, C> {}

impl<C> fmt::Debug for ResolutionRequest<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionRequest")
            .field("arguments", &self.arguments)
            .field("source", &self.source)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Metadata of the field being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    pub coordinate: FieldCoordinate,
    pub alias: Option<String>,
    /// Name of the type the field returns.
    pub return_type: String,
    pub path: ErrorPath,
}

impl FieldMetadata {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>, return_type: impl Into<String>) -> Self {
        let coordinate = FieldCoordinate::new(parent_type, field_name);
        let path = ErrorPath::from(coordinate.field_name.as_str());
        Self {
            coordinate,
            alias: None,
            return_type: return_type.into(),
            path,
        }
    }

    /// A path still made of the previous response key follows the alias, an explicit path is
    /// left alone.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if self.path == ErrorPath::from(self.response_key()) {
            self.path = ErrorPath::from(alias.as_str());
        }
        self.alias = Some(alias);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<ErrorPath>) -> Self {
        self.path = path.into();
        self
    }

    pub fn field_name(&self) -> &str {
        &self.coordinate.field_name
    }

    pub fn parent_type(&self) -> &str {
        &self.coordinate.parent_type
    }

    /// Key of the field in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.field_name())
    }
}

/// `Type.field`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldCoordinate {
    pub parent_type: String,
    pub field_name: String,
}

impl FieldCoordinate {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.parent_type, self.field_name)
    }
}
