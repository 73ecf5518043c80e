use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use field_resolver::{
    Arguments, BoundArguments, DeclaredType, Dispatcher, ErrorCode, Evaluation, ExecutionPredicate, FieldMetadata,
    FunctionDescriptor, Invocation, ListIntoArray, ResolutionRequest, ResolverConfig, ResolverFunction, Value,
};
use futures_util::FutureExt;
use pretty_assertions::assert_eq;

#[derive(Debug, PartialEq)]
struct RequestContext {
    viewer: String,
}

fn context() -> RequestContext {
    RequestContext {
        viewer: "ada".to_string(),
    }
}

fn arguments<const N: usize>(entries: [(&str, Value); N]) -> Arguments {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn echo_descriptor() -> FunctionDescriptor {
    FunctionDescriptor::builder("echo")
        .argument("x", DeclaredType::String)
        .build()
        .unwrap()
}

fn echo() -> Dispatcher<RequestContext> {
    Dispatcher::from_fn(echo_descriptor(), |_, args| {
        Invocation::ready(args.argument("x").cloned().unwrap_or_default())
    })
    .build()
    .unwrap()
}

fn suspended_echo() -> Dispatcher<RequestContext> {
    Dispatcher::from_fn(echo_descriptor(), |_, args| {
        let x = args.argument("x").cloned();
        Invocation::suspended(async move {
            tokio::task::yield_now().await;
            Ok::<_, anyhow::Error>(x.unwrap_or_default())
        })
    })
    .build()
    .unwrap()
}

/// Counts how many times it was invoked.
#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<C: Send + Sync + 'static> ResolverFunction<C> for Counter {
    fn call<'a>(&'a self, _target: &'a Value, _arguments: BoundArguments<'a, C>) -> Invocation<'a> {
        let count = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        Invocation::ready(count as i64)
    }
}

#[tokio::test]
async fn missing_target_regardless_of_arguments() {
    let dispatcher = echo();
    let ctx = context();
    let field = FieldMetadata::new("User", "echo", "String");

    for arguments in [arguments([]), arguments([("x", Value::from("hello"))])] {
        let err = dispatcher
            .dispatch(ResolutionRequest::new(&arguments, &ctx, &field))
            .unwrap_err();
        assert!(err.is_missing_target());
        assert_eq!(err.code(), ErrorCode::MissingTarget);
    }
}

#[tokio::test]
async fn plain_argument_is_bound_against_the_source() {
    let dispatcher = Dispatcher::from_fn(echo_descriptor(), |target, args| {
        let greeting = format!(
            "{} says {}",
            target.get("name").and_then(Value::as_str).unwrap_or_default(),
            args.argument("x").and_then(Value::as_str).unwrap_or_default()
        );
        Invocation::ready(greeting)
    })
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("User", "echo", "String");
    let arguments = arguments([("x", Value::from("hello"))]);
    let source = Value::object([("name", "Grace")]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field).with_source(&source))
        .await
        .unwrap();

    assert_eq!(value, Value::from("Grace says hello"));
}

#[tokio::test]
async fn identity_coercion_for_matching_types() {
    let dispatcher = echo();
    let ctx = context();
    let field = FieldMetadata::new("User", "echo", "String");
    let arguments = arguments([("x", Value::from("hello"))]);
    let source = Value::object([("id", 1)]);

    let outcome = dispatcher
        .dispatch(ResolutionRequest::new(&arguments, &ctx, &field).with_source(&source))
        .unwrap();

    assert!(outcome.is_ready());
    assert_eq!(outcome.await.unwrap(), Value::from("hello"));
}

#[tokio::test]
async fn fixed_target_ignores_the_source() {
    let descriptor = FunctionDescriptor::builder("version").build().unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |target, _| {
        Invocation::ready(target.get("version").cloned().unwrap_or_default())
    })
    .fixed_target(Value::object([("version", "1.2.0")]))
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("Query", "version", "String");
    let arguments = arguments([]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
        .await
        .unwrap();

    assert_eq!(value, Value::from("1.2.0"));
}

#[tokio::test]
async fn context_is_bound_verbatim() {
    let descriptor = FunctionDescriptor::builder("viewer")
        .argument("viewer", DeclaredType::String.nullable())
        .context("ctx")
        .build()
        .unwrap();
    let ctx = context();
    let expected = std::ptr::from_ref(&ctx) as usize;

    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, move |_, args| {
        let ctx = args.context().unwrap();
        assert_eq!(std::ptr::from_ref(ctx) as usize, expected);
        Invocation::ready(ctx.viewer.clone())
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let field = FieldMetadata::new("Query", "viewer", "String");
    // An argument with the same name as the context parameter changes nothing.
    let arguments = arguments([("ctx", Value::from("intruder")), ("viewer", Value::from("bob"))]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
        .await
        .unwrap();

    assert_eq!(value, Value::from("ada"));
}

#[tokio::test]
async fn environment_is_bound_verbatim() {
    let descriptor = FunctionDescriptor::builder("path")
        .environment("env")
        .build()
        .unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |_, args| {
        let field = args.environment().unwrap();
        Invocation::ready(format!("{} at {}", field.coordinate, field.path))
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("User", "friends", "[User]").with_path(("me", "friends"));
    let arguments = arguments([("env", Value::from("intruder"))]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
        .await
        .unwrap();

    assert_eq!(value, Value::from("User.friends at me.friends"));
}

#[tokio::test]
async fn source_object_parameter() {
    let descriptor = FunctionDescriptor::builder("parent")
        .source("parent")
        .build()
        .unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |target, args| {
        let source = args.source().unwrap();
        assert!(std::ptr::eq(source, target));
        Invocation::ready(source.clone())
    })
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("User", "parent", "User");
    let arguments = arguments([]);
    let source = Value::object([("id", 7)]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field).with_source(&source))
        .await
        .unwrap();

    assert_eq!(value, source);
}

#[tokio::test]
async fn predicate_short_circuits_including_null() {
    let counter = Counter::default();
    for substitute in [Value::from("cached"), Value::Null] {
        let expected = substitute.clone();
        let dispatcher = Dispatcher::<RequestContext>::builder(echo_descriptor(), counter.clone())
            .predicate_fn(move |_, function, _| {
                assert_eq!(function.name(), "echo");
                Evaluation::Handled(substitute.clone())
            })
            .build()
            .unwrap();

        let ctx = context();
        let field = FieldMetadata::new("User", "echo", "String");
        let arguments = arguments([("x", Value::from("hello"))]);
        let source = Value::Null;

        let value = dispatcher
            .resolve(ResolutionRequest::new(&arguments, &ctx, &field).with_source(&source))
            .await
            .unwrap();

        assert_eq!(value, expected);
    }
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn predicate_declining_invokes_the_function() {
    struct OnlyForViewer;

    impl ExecutionPredicate<RequestContext> for OnlyForViewer {
        fn evaluate(
            &self,
            _target: &Value,
            _function: &FunctionDescriptor,
            request: &ResolutionRequest<'_, RequestContext>,
        ) -> Evaluation {
            if request.context.viewer == "anonymous" {
                Evaluation::Handled(Value::Null)
            } else {
                Evaluation::NotHandled
            }
        }
    }

    let counter = Counter::default();
    let dispatcher = Dispatcher::builder(echo_descriptor(), counter.clone())
        .predicate(OnlyForViewer)
        .fixed_target(Value::Null)
        .build()
        .unwrap();

    let field = FieldMetadata::new("User", "echo", "String");
    let arguments = arguments([("x", Value::from("hello"))]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &context(), &field))
        .await
        .unwrap();
    assert_eq!(value, Value::Int(1));

    let anonymous = RequestContext {
        viewer: "anonymous".to_string(),
    };
    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &anonymous, &field))
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
    assert_eq!(counter.count(), 1);
}

fn names_dispatcher(config: &ResolverConfig) -> Dispatcher<RequestContext> {
    let descriptor = FunctionDescriptor::builder("names")
        .argument("names", DeclaredType::array(DeclaredType::String))
        .build()
        .unwrap();
    Dispatcher::from_fn(descriptor, |_, mut args| {
        Invocation::ready(args.take_argument("names").unwrap_or_default())
    })
    .fixed_target(Value::Null)
    .config(config)
    .build()
    .unwrap()
}

#[tokio::test]
async fn array_argument_into_array_parameter() {
    let dispatcher = names_dispatcher(&ResolverConfig::default());
    let ctx = context();
    let field = FieldMetadata::new("Query", "names", "[String]");
    let arguments = arguments([("names", Value::array(["foo", "bar"]))]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
        .await
        .unwrap();

    assert_eq!(value, Value::array(["foo", "bar"]));
}

#[tokio::test]
async fn list_argument_into_array_parameter_fails() {
    let dispatcher = names_dispatcher(&ResolverConfig::default());
    let ctx = context();
    let field = FieldMetadata::new("Query", "names", "[String]");
    let arguments = arguments([("names", Value::list(["foo", "bar"]))]);

    let err = dispatcher
        .dispatch(ResolutionRequest::new(&arguments, &ctx, &field))
        .unwrap_err();

    let coercion = err.as_coercion().unwrap();
    assert_eq!(coercion.parameter, "names");
    assert_eq!(err.code(), ErrorCode::ArgumentCoercionError);
    insta::assert_snapshot!(err, @"Cannot coerce argument 'names' into Array<String>: a list cannot be coerced into a fixed-size array");
}

#[tokio::test]
async fn list_argument_into_array_parameter_with_conversion() {
    let mut config = ResolverConfig::default();
    config.coercion.list_into_array = ListIntoArray::Convert;
    let dispatcher = names_dispatcher(&config);
    let ctx = context();
    let field = FieldMetadata::new("Query", "names", "[String]");
    let arguments = arguments([("names", Value::list(["foo", "bar"]))]);

    let value = dispatcher
        .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
        .await
        .unwrap();

    assert_eq!(value, Value::array(["foo", "bar"]));
}

#[tokio::test]
async fn suspended_function_yields_the_same_value() {
    let ctx = context();
    let field = FieldMetadata::new("User", "echo", "String");
    let arguments = arguments([("x", Value::from("hello"))]);
    let source = Value::object([("id", 1)]);
    let request = ResolutionRequest::new(&arguments, &ctx, &field).with_source(&source);

    let sync = echo();
    let suspended = suspended_echo();

    let outcome = suspended.dispatch(request).unwrap();
    assert!(!outcome.is_ready());

    assert_eq!(outcome.await.unwrap(), Value::from("hello"));
    assert_eq!(sync.resolve(request).await.unwrap(), Value::from("hello"));
}

#[tokio::test]
async fn function_failures_surface_through_the_outcome() {
    #[derive(Debug, thiserror::Error)]
    #[error("nobody is called {0}")]
    struct UnknownUser(String);

    let descriptor = FunctionDescriptor::builder("user")
        .argument("name", DeclaredType::String)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |_, args| {
        let name = args.argument("name").and_then(Value::as_str).unwrap_or_default().to_string();
        Invocation::suspended(async move {
            tokio::task::yield_now().await;
            Err::<Value, _>(anyhow::Error::from(UnknownUser(name)))
        })
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("Query", "user", "User");
    let arguments = arguments([("name", Value::from("bob"))]);

    // Dispatching succeeds, the failure belongs to the outcome.
    let outcome = dispatcher
        .dispatch(ResolutionRequest::new(&arguments, &ctx, &field))
        .unwrap();
    let err = outcome.await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ResolverError);
    let source = err.as_function_error().and_then(|err| err.downcast_ref::<UnknownUser>());
    assert_eq!(source.map(|err| err.0.as_str()), Some("bob"));

    let error = err.into_graphql_error(&field);
    assert_eq!(error.message, "nobody is called bob");
    assert_eq!(error.path.map(|path| path.to_string()), Some("user".to_string()));
}

#[tokio::test]
async fn synchronous_failures_also_surface_through_the_outcome() {
    let descriptor = FunctionDescriptor::builder("fail").build().unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |_, _| {
        Invocation::failed(anyhow::anyhow!("not today"))
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("Query", "fail", "String");
    let arguments = arguments([]);

    let outcome = dispatcher
        .dispatch(ResolutionRequest::new(&arguments, &ctx, &field))
        .unwrap();
    assert!(outcome.is_ready());
    insta::assert_snapshot!(outcome.await.unwrap_err(), @"not today");
}

#[tokio::test]
async fn defaults_and_absent_arguments() {
    let descriptor = FunctionDescriptor::builder("search")
        .argument("query", DeclaredType::String.nullable())
        .argument_with_default("limit", DeclaredType::Int, 10)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, |_, args| {
        let query = match args.argument("query") {
            None => "<absent>".to_string(),
            Some(Value::Null) => "<null>".to_string(),
            Some(value) => value.as_str().unwrap_or_default().to_string(),
        };
        let limit = args.argument("limit").and_then(Value::as_i64).unwrap_or_default();
        Invocation::ready(format!("{query}:{limit}"))
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("Query", "search", "[String]");

    let cases = [
        (arguments([]), "<absent>:10"),
        (arguments([("query", Value::Null)]), "<null>:10"),
        (arguments([("query", Value::from("rust")), ("limit", Value::Int(3))]), "rust:3"),
    ];

    for (arguments, expected) in cases {
        let value = dispatcher
            .resolve(ResolutionRequest::new(&arguments, &ctx, &field))
            .await
            .unwrap();
        assert_eq!(value, Value::from(expected));
    }
}

#[tokio::test]
async fn dropping_the_outcome_cancels_the_suspended_function() {
    struct Guard(Arc<AtomicBool>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let started = Arc::new(AtomicBool::new(false));
    let dropped = Arc::new(AtomicBool::new(false));
    let descriptor = FunctionDescriptor::builder("slow").build().unwrap();
    let dispatcher = Dispatcher::<RequestContext>::from_fn(descriptor, {
        let started = started.clone();
        let dropped = dropped.clone();
        move |_, _| {
            let started = started.clone();
            let guard = Guard(dropped.clone());
            Invocation::suspended(async move {
                let _guard = guard;
                started.store(true, Ordering::SeqCst);
                std::future::pending::<()>().await;
                Ok::<_, anyhow::Error>(Value::Null)
            })
        }
    })
    .fixed_target(Value::Null)
    .build()
    .unwrap();

    let ctx = context();
    let field = FieldMetadata::new("Query", "slow", "String");
    let arguments = arguments([]);

    let mut outcome = dispatcher
        .dispatch(ResolutionRequest::new(&arguments, &ctx, &field))
        .unwrap();
    assert!(!outcome.is_ready());

    assert!((&mut outcome).now_or_never().is_none());
    assert!(started.load(Ordering::SeqCst));
    assert!(!dropped.load(Ordering::SeqCst));

    drop(outcome);
    assert!(dropped.load(Ordering::SeqCst));
}
