use tracing::{Span, field::Empty, info_span};

use crate::{DispatchError, FieldMetadata};

/// Tracing target for logging
pub const FIELD_RESOLVER_TARGET: &str = "field_resolver";

/// Resolver invocation span name
pub const RESOLVER_SPAN_NAME: &str = "resolver";

/// A span for a single resolver invocation
pub struct ResolverInvocationSpanBuilder<'a> {
    pub function_name: &'a str,
    pub field: &'a FieldMetadata,
}

impl ResolverInvocationSpanBuilder<'_> {
    pub fn build(self) -> ResolverInvocationSpan {
        let span = info_span!(
            target: FIELD_RESOLVER_TARGET,
            RESOLVER_SPAN_NAME,
            "otel.name" = format!("{RESOLVER_SPAN_NAME}:{}", self.function_name),
            "otel.status_code" = Empty,
            "resolver.function" = self.function_name,
            "graphql.field.coordinate" = tracing::field::display(&self.field.coordinate),
            "graphql.field.path" = tracing::field::display(&self.field.path),
            "resolver.invocation" = Empty,
            // "Describes a class of error the operation ended with."
            "error.type" = Empty,
        );
        ResolverInvocationSpan { span }
    }
}

#[derive(Clone)]
pub struct ResolverInvocationSpan {
    pub span: Span,
}

impl std::ops::Deref for ResolverInvocationSpan {
    type Target = Span;
    fn deref(&self) -> &Self::Target {
        &self.span
    }
}

impl ResolverInvocationSpan {
    /// A span which records nothing.
    pub fn none() -> Self {
        Self { span: Span::none() }
    }

    /// Either `ready`, `suspended` or `short_circuited`.
    pub fn record_invocation(&self, kind: &'static str) {
        self.record("resolver.invocation", kind);
    }

    pub fn record_failure(&self, error: &DispatchError) {
        self.record("otel.status_code", "Error");
        self.record("error.type", error.code().as_ref());
    }
}
