use std::sync::Arc;

use crate::{DeclaredType, Value, coercion::CoercionFailure};

/// Where the value of a parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ParameterRole {
    /// Field argument with the same name.
    Plain,
    /// Request context.
    Context,
    /// Metadata of the field being resolved.
    Environment,
    /// Source object produced by the parent field.
    SourceObject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared_type: DeclaredType,
    pub role: ParameterRole,
    /// Only meaningful for [`ParameterRole::Plain`].
    pub default_value: Option<Value>,
}

/// Signature of a resolver function, analysed once when the dispatcher is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    name: String,
    parameters: Arc<[ParameterDescriptor]>,
}

impl FunctionDescriptor {
    pub fn builder(name: impl Into<String>) -> FunctionDescriptorBuilder {
        FunctionDescriptorBuilder {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn shared_parameters(&self) -> Arc<[ParameterDescriptor]> {
        self.parameters.clone()
    }

    pub fn parameter(&self, name: &str) -> Option<(usize, &ParameterDescriptor)> {
        self.parameters.iter().enumerate().find(|(_, p)| p.name == name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SignatureError {
    #[error("Function '{function}' declares the parameter '{parameter}' more than once")]
    DuplicateParameter { function: String, parameter: String },
    #[error("Default value of parameter '{parameter}' of function '{function}' is invalid: {reason}")]
    InvalidDefaultValue {
        function: String,
        parameter: String,
        reason: CoercionFailure,
    },
}

pub struct FunctionDescriptorBuilder {
    name: String,
    parameters: Vec<ParameterDescriptor>,
}

impl FunctionDescriptorBuilder {
    fn push(mut self, name: impl Into<String>, declared_type: DeclaredType, role: ParameterRole) -> Self {
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            declared_type,
            role,
            default_value: None,
        });
        self
    }

    /// A parameter bound from the field argument of the same name.
    #[must_use]
    pub fn argument(self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        self.push(name, declared_type, ParameterRole::Plain)
    }

    #[must_use]
    pub fn argument_with_default(
        mut self,
        name: impl Into<String>,
        declared_type: DeclaredType,
        default_value: impl Into<Value>,
    ) -> Self {
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            declared_type,
            role: ParameterRole::Plain,
            default_value: Some(default_value.into()),
        });
        self
    }

    #[must_use]
    pub fn context(self, name: impl Into<String>) -> Self {
        self.push(name, DeclaredType::Any, ParameterRole::Context)
    }

    #[must_use]
    pub fn environment(self, name: impl Into<String>) -> Self {
        self.push(name, DeclaredType::Any, ParameterRole::Environment)
    }

    #[must_use]
    pub fn source(self, name: impl Into<String>) -> Self {
        self.push(name, DeclaredType::Any.nullable(), ParameterRole::SourceObject)
    }

    pub fn build(self) -> Result<FunctionDescriptor, SignatureError> {
        for (i, parameter) in self.parameters.iter().enumerate() {
            if self.parameters[..i].iter().any(|p| p.name == parameter.name) {
                return Err(SignatureError::DuplicateParameter {
                    function: self.name,
                    parameter: parameter.name.clone(),
                });
            }
        }

        Ok(FunctionDescriptor {
            name: self.name,
            parameters: self.parameters.into(),
        })
    }
}
