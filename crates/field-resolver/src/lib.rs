//! Invocation of field resolver functions.
//!
//! A [`Dispatcher`] owns one resolver function together with its [`FunctionDescriptor`]. For
//! each [`ResolutionRequest`] it:
//!
//! 1. picks the target the function is invoked against, the fixed instance it was built with or
//!    the request source,
//! 2. binds every parameter from its role: field argument (coerced by an [`ArgumentCoercer`]),
//!    request context, field metadata or source object,
//! 3. lets an optional [`ExecutionPredicate`] resolve the field instead,
//! 4. invokes the function and normalizes its result, immediate or suspended, into a
//!    [`ResolverOutcome`].

mod binder;
mod coercion;
mod config;
mod dispatcher;
mod error;
mod function;
mod outcome;
mod predicate;
mod registry;
mod request;
mod signature;
pub mod span;
mod ty;
mod value;

pub use binder::{BoundArguments, BoundValue};
pub use coercion::{ArgumentCoercer, CoercionError, CoercionFailure, ValueCoercer};
pub use config::{CoercionConfig, ConfigError, ListIntoArray, ResolverConfig};
pub use dispatcher::{Dispatcher, DispatcherBuilder, TargetBinding};
pub use error::{DispatchError, DispatchResult};
pub use function::{FnResolver, Invocation, ResolverFunction, resolver_fn};
pub use outcome::ResolverOutcome;
pub use predicate::{Evaluation, ExecutionPredicate};
pub use registry::{DuplicateResolver, ResolverRegistry};
pub use request::{FieldCoordinate, FieldMetadata, ResolutionRequest};
pub use resolver_error::{ErrorCode, ErrorPath, GraphqlError};
pub use signature::{FunctionDescriptor, FunctionDescriptorBuilder, ParameterDescriptor, ParameterRole, SignatureError};
pub use ty::{DeclaredType, EnumType, InputField, InputObjectType};
pub use value::{Arguments, Value};
