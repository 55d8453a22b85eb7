//! Handler traits and adapters.
//!
//! The pipeline interior deals with exactly one result type,
//! [`HandlerOutcome`]. Two adapter shims funnel the supported handler
//! conventions into it:
//!
//! - [`FnHandler`] wraps an async function returning `ApiResult<Value>`
//!   (the future-style convention);
//! - [`CompletionHandler`] wraps a function that receives a [`Completion`]
//!   handle and finishes the request through it, possibly from a spawned
//!   task (the callback-style convention). The handle completes at most
//!   once; later calls are no-ops.

use crate::context::{RequestContext, RequestId};
use crate::error::{ApiError, ApiResult};
use crate::request::ApiRequest;
use http::Method;
use indexmap::IndexMap;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A boxed future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The single internal result type of handler invocation.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// The handler produced data (`Null` means no content).
    Success(Value),
    /// The handler failed.
    Failure(ApiError),
}

impl From<ApiResult<Value>> for HandlerOutcome {
    fn from(result: ApiResult<Value>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failure(error),
        }
    }
}

/// An owned snapshot of request state handed to a handler.
///
/// The snapshot is taken after all gates, casting stages and before-hooks
/// have run, so arguments and parameters are already validated and cast.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    request: Arc<ApiRequest>,
    request_id: RequestId,
    args: IndexMap<String, Value>,
    params: IndexMap<String, Value>,
    api_key: Option<String>,
    identity: Option<Value>,
    props: IndexMap<String, Value>,
}

impl HandlerContext {
    /// Builds a snapshot from the live pipeline context.
    #[must_use]
    pub fn new(request: Arc<ApiRequest>, ctx: &RequestContext) -> Self {
        Self {
            request,
            request_id: ctx.request_id(),
            args: ctx.args().clone(),
            params: ctx.params().clone(),
            api_key: ctx.api_key().map(ToString::to_string),
            identity: ctx.identity().cloned(),
            props: ctx.props().clone(),
        }
    }

    /// Returns the incoming request.
    #[must_use]
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.request.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns a cast path argument by key.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Returns all cast path arguments.
    #[must_use]
    pub fn args(&self) -> &IndexMap<String, Value> {
        &self.args
    }

    /// Returns a cast parameter by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns all cast parameters.
    #[must_use]
    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    /// Returns the accepted API key, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the caller identity, if the authorization gate produced one.
    #[must_use]
    pub fn identity(&self) -> Option<&Value> {
        self.identity.as_ref()
    }

    /// Returns a prop attached by a hook.
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}

/// The type-erased handler stored on an endpoint.
pub trait Handler: Send + Sync + 'static {
    /// Processes the request and resolves to an outcome exactly once.
    fn call(&self, ctx: HandlerContext) -> BoxFuture<'static, HandlerOutcome>;
}

/// Future-style handler adapter.
///
/// # Example
///
/// ```
/// use pactum_core::{FnHandler, HandlerContext, ApiResult};
/// use serde_json::{json, Value};
///
/// let handler = FnHandler::new(|ctx: HandlerContext| async move {
///     ApiResult::Ok(json!({"path": ctx.path()}))
/// });
/// ```
pub struct FnHandler<F, Fut>
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
{
    func: F,
    _phantom: std::marker::PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut>
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
{
    /// Wraps an async function as a handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, Fut> Handler for FnHandler<F, Fut>
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
{
    fn call(&self, ctx: HandlerContext) -> BoxFuture<'static, HandlerOutcome> {
        let fut = (self.func)(ctx);
        Box::pin(async move { HandlerOutcome::from(fut.await) })
    }
}

/// Single-use completion handle for callback-style handlers.
///
/// The first call to [`succeed`](Completion::succeed) or
/// [`fail`](Completion::fail) decides the outcome; every later call is a
/// no-op and returns `false`. If the pipeline has already given up on the
/// request (e.g. after a timeout), completing is likewise a silent no-op.
#[derive(Clone)]
pub struct Completion {
    tx: Arc<Mutex<Option<oneshot::Sender<HandlerOutcome>>>>,
}

impl Completion {
    fn finish(&self, outcome: HandlerOutcome) -> bool {
        let sender = match self.tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                tracing::debug!("completion already decided; ignoring late completion");
                false
            }
        }
    }

    /// Completes the request with data. Returns whether this call decided
    /// the outcome.
    pub fn succeed(&self, data: Value) -> bool {
        self.finish(HandlerOutcome::Success(data))
    }

    /// Completes the request with an error. Returns whether this call
    /// decided the outcome.
    pub fn fail(&self, error: ApiError) -> bool {
        self.finish(HandlerOutcome::Failure(error))
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// Callback-style handler adapter.
///
/// The wrapped function runs synchronously when the handler is invoked and
/// arranges for the [`Completion`] to be resolved, typically from a spawned
/// task.
///
/// # Example
///
/// ```ignore
/// let handler = CompletionHandler::new(|ctx, done| {
///     tokio::spawn(async move {
///         let user = load_user(ctx.arg("id")).await;
///         done.succeed(user);
///     });
/// });
/// ```
pub struct CompletionHandler<F>
where
    F: Fn(HandlerContext, Completion) + Send + Sync + 'static,
{
    func: F,
}

impl<F> CompletionHandler<F>
where
    F: Fn(HandlerContext, Completion) + Send + Sync + 'static,
{
    /// Wraps a callback-style function as a handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for CompletionHandler<F>
where
    F: Fn(HandlerContext, Completion) + Send + Sync + 'static,
{
    fn call(&self, ctx: HandlerContext) -> BoxFuture<'static, HandlerOutcome> {
        let (tx, rx) = oneshot::channel();
        let completion = Completion {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        (self.func)(ctx, completion);

        Box::pin(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => HandlerOutcome::Failure(ApiError::internal(
                    "handler dropped its completion handle without completing",
                )),
            }
        })
    }
}
