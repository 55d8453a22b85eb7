//! Before/after hooks and their path matcher.
//!
//! Hooks are registered under a path specification and run for every
//! request whose path the specification matches:
//!
//! - `"*"` matches every request;
//! - `/literal/path` matches that path exactly;
//! - `/literal/*name` matches structurally by segment prefix: `/param/*x`
//!   matches `/param/a` and `/param/a/b`, but not `/parameter/a`.
//!
//! Hooks are stored in an ordered map keyed by specification. All matching
//! specifications fire in the order they were first registered, never in
//! specificity order, and hooks run strictly sequentially, each completing
//! before the next starts.

use indexmap::IndexMap;
use pactum_core::{ApiRequest, ApiResponse, ApiResult, BoxFuture, RequestContext};
use std::sync::Arc;
use thiserror::Error;

/// Error produced when a hook path specification cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hook path specification '{spec}'")]
pub struct HookSpecError {
    /// The rejected specification.
    pub spec: String,
}

/// A parsed hook path specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookSpec {
    /// `"*"`: matches every request path.
    All,
    /// A literal path, matched segment for segment.
    Exact(Vec<String>),
    /// Literal leading segments followed by a trailing `*name` wildcard
    /// that consumes one or more segments.
    Prefix(Vec<String>),
}

impl HookSpec {
    /// Parses a specification string.
    pub fn parse(spec: &str) -> Result<Self, HookSpecError> {
        if spec == "*" {
            return Ok(Self::All);
        }
        if !spec.starts_with('/') {
            return Err(HookSpecError {
                spec: spec.to_string(),
            });
        }

        let mut segments: Vec<String> = spec
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        if segments.last().is_some_and(|last| last.starts_with('*')) {
            segments.pop();
            return Ok(Self::Prefix(segments));
        }

        // A wildcard anywhere but the last segment is not a valid spec.
        if segments.iter().any(|s| s.starts_with('*')) {
            return Err(HookSpecError {
                spec: spec.to_string(),
            });
        }

        Ok(Self::Exact(segments))
    }

    /// Whether this specification matches a request path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match self {
            Self::All => true,
            Self::Exact(literals) => {
                segments.len() == literals.len()
                    && literals.iter().zip(&segments).all(|(lit, seg)| lit == seg)
            }
            Self::Prefix(literals) => {
                segments.len() > literals.len()
                    && literals.iter().zip(&segments).all(|(lit, seg)| lit == seg)
            }
        }
    }
}

/// A callback that runs before the handler.
///
/// Before-hooks run after both gates and both casting stages; a failure
/// short-circuits straight to error emission.
pub trait BeforeHook: Send + Sync + 'static {
    /// Runs the hook.
    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, ApiResult<()>>;
}

/// A callback that runs after the outcome is decided.
///
/// After-hooks always run, on success and on every error path, and may add
/// response metadata such as headers. They do not veto the decided outcome
/// except by raising their own error.
pub trait AfterHook: Send + Sync + 'static {
    /// Runs the hook.
    fn call<'a>(
        &'a self,
        is_error: bool,
        ctx: &'a mut RequestContext,
        request: &'a ApiRequest,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, ApiResult<()>>;
}

/// Adapter turning a closure into a [`BeforeHook`].
///
/// # Example
///
/// ```ignore
/// let hook = FnBeforeHook::new(|ctx, _request| {
///     Box::pin(async move {
///         ctx.set_prop("before-ran", serde_json::json!(true));
///         Ok(())
///     })
/// });
/// ```
pub struct FnBeforeHook<F> {
    func: F,
}

impl<F> FnBeforeHook<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a ApiRequest) -> BoxFuture<'a, ApiResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Wraps a closure as a before-hook.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BeforeHook for FnBeforeHook<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a ApiRequest) -> BoxFuture<'a, ApiResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, ApiResult<()>> {
        (self.func)(ctx, request)
    }
}

/// Adapter turning a closure into an [`AfterHook`].
pub struct FnAfterHook<F> {
    func: F,
}

impl<F> FnAfterHook<F>
where
    F: for<'a> Fn(
            bool,
            &'a mut RequestContext,
            &'a ApiRequest,
            &'a mut ApiResponse,
        ) -> BoxFuture<'a, ApiResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Wraps a closure as an after-hook.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> AfterHook for FnAfterHook<F>
where
    F: for<'a> Fn(
            bool,
            &'a mut RequestContext,
            &'a ApiRequest,
            &'a mut ApiResponse,
        ) -> BoxFuture<'a, ApiResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        is_error: bool,
        ctx: &'a mut RequestContext,
        request: &'a ApiRequest,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, ApiResult<()>> {
        (self.func)(is_error, ctx, request, response)
    }
}

/// Ordered storage for before- and after-hooks.
///
/// Before and after maps are independent; each is keyed by specification
/// string, preserving first-registration order of specs, with hooks under
/// the same spec appended in their own registration order.
#[derive(Default)]
pub struct HookRegistry {
    before: IndexMap<String, (HookSpec, Vec<Arc<dyn BeforeHook>>)>,
    after: IndexMap<String, (HookSpec, Vec<Arc<dyn AfterHook>>)>,
}

impl HookRegistry {
    /// Creates an empty hook registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a before-hook under a path specification.
    pub fn register_before(
        &mut self,
        spec: &str,
        hook: impl BeforeHook,
    ) -> Result<(), HookSpecError> {
        let parsed = HookSpec::parse(spec)?;
        self.before
            .entry(spec.to_string())
            .or_insert_with(|| (parsed, Vec::new()))
            .1
            .push(Arc::new(hook));
        Ok(())
    }

    /// Registers an after-hook under a path specification.
    pub fn register_after(
        &mut self,
        spec: &str,
        hook: impl AfterHook,
    ) -> Result<(), HookSpecError> {
        let parsed = HookSpec::parse(spec)?;
        self.after
            .entry(spec.to_string())
            .or_insert_with(|| (parsed, Vec::new()))
            .1
            .push(Arc::new(hook));
        Ok(())
    }

    /// Returns the before-hooks matching a path, in registration order.
    #[must_use]
    pub fn before_matching(&self, path: &str) -> Vec<Arc<dyn BeforeHook>> {
        self.before
            .values()
            .filter(|(spec, _)| spec.matches(path))
            .flat_map(|(_, hooks)| hooks.iter().cloned())
            .collect()
    }

    /// Returns the after-hooks matching a path, in registration order.
    #[must_use]
    pub fn after_matching(&self, path: &str) -> Vec<Arc<dyn AfterHook>> {
        self.after
            .values()
            .filter(|(spec, _)| spec.matches(path))
            .flat_map(|(_, hooks)| hooks.iter().cloned())
            .collect()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("before_specs", &self.before.keys().collect::<Vec<_>>())
            .field("after_specs", &self.after.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_parse_all() {
        assert_eq!(HookSpec::parse("*").unwrap(), HookSpec::All);
        assert!(HookSpec::All.matches("/anything/at/all"));
        assert!(HookSpec::All.matches("/"));
    }

    #[test]
    fn test_parse_exact() {
        let spec = HookSpec::parse("/users/list").unwrap();
        assert!(spec.matches("/users/list"));
        assert!(spec.matches("/users/list/"));
        assert!(!spec.matches("/users"));
        assert!(!spec.matches("/users/list/extra"));
    }

    #[test]
    fn test_parse_prefix_wildcard() {
        let spec = HookSpec::parse("/param/*name").unwrap();
        assert!(spec.matches("/param/x"));
        assert!(spec.matches("/param/x/y"));
        assert!(!spec.matches("/param"));
        assert!(!spec.matches("/parameter/x"));
    }

    #[test]
    fn test_invalid_specs_rejected() {
        assert!(HookSpec::parse("no-leading-slash").is_err());
        assert!(HookSpec::parse("/a/*mid/b").is_err());
    }

    /// A test hook that records its invocation order.
    struct OrderTrackingHook {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl BeforeHook for OrderTrackingHook {
        fn call<'a>(
            &'a self,
            _ctx: &'a mut RequestContext,
            _request: &'a ApiRequest,
        ) -> BoxFuture<'a, ApiResult<()>> {
            Box::pin(async move {
                self.order.lock().expect("lock poisoned").push(self.name);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn test_matching_hooks_fire_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();

        // Registered most-specific first; order of firing must follow
        // registration, not specificity.
        registry
            .register_before(
                "/param/*rest",
                OrderTrackingHook {
                    name: "prefix",
                    order: order.clone(),
                },
            )
            .unwrap();
        registry
            .register_before(
                "*",
                OrderTrackingHook {
                    name: "all",
                    order: order.clone(),
                },
            )
            .unwrap();
        registry
            .register_before(
                "/param/*rest",
                OrderTrackingHook {
                    name: "prefix-2",
                    order: order.clone(),
                },
            )
            .unwrap();

        let hooks = registry.before_matching("/param/x");
        assert_eq!(hooks.len(), 3);

        let mut ctx = RequestContext::new();
        let request = ApiRequest::new(http::Method::GET, "/param/x");
        for hook in hooks {
            hook.call(&mut ctx, &request).await.unwrap();
        }

        // Hooks under the same spec stay grouped at the spec's first
        // registration position.
        assert_eq!(*order.lock().unwrap(), vec!["prefix", "prefix-2", "all"]);
    }

    #[test]
    fn test_non_matching_specs_do_not_fire() {
        let counter = Arc::new(AtomicUsize::new(0));

        struct CountingHook(Arc<AtomicUsize>);
        impl BeforeHook for CountingHook {
            fn call<'a>(
                &'a self,
                _ctx: &'a mut RequestContext,
                _request: &'a ApiRequest,
            ) -> BoxFuture<'a, ApiResult<()>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move { Ok(()) })
            }
        }

        let mut registry = HookRegistry::new();
        registry
            .register_before("/users/*rest", CountingHook(counter.clone()))
            .unwrap();

        assert!(registry.before_matching("/posts/1").is_empty());
        assert_eq!(registry.before_matching("/users/1").len(), 1);
    }
}
