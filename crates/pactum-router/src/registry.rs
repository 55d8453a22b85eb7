//! The route registry.
//!
//! One [`RouteRegistry`] is owned by each application instance and passed
//! by reference to the pipeline; there is no process-wide route state.
//! Registration happens before the application starts serving, after which
//! the registry is read-only.

use crate::args::RawArgs;
use crate::endpoint::Endpoint;
use crate::route::{split_path, Route};
use http::Method;

/// A resolved route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub route: &'a Route,
    /// The endpoint serving the resolved version.
    pub endpoint: &'a Endpoint,
    /// The resolved version slot.
    pub version: Option<u32>,
    /// Whether the endpoint is deprecated (explicitly or by a newer
    /// version existing).
    pub deprecated: bool,
    /// Raw argument values extracted from the path.
    pub raw_args: RawArgs,
}

/// Groups endpoints by method+path across versions.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint under a method and route pattern.
    ///
    /// The route is created on first use. Re-registering the same
    /// method+path+version replaces the prior endpoint for that slot only;
    /// sibling versions are unaffected. The endpoint's effective path
    /// arguments are resolved here from the pattern's `:token` segments and
    /// the endpoint's explicit overrides.
    pub fn add(&mut self, method: Method, path: &str, mut endpoint: Endpoint) {
        let idx = match self
            .routes
            .iter()
            .position(|r| r.method() == &method && r.path() == path)
        {
            Some(idx) => idx,
            None => {
                self.routes.push(Route::new(method.clone(), path));
                self.routes.len() - 1
            }
        };

        endpoint.bind(method, path);
        let route = &mut self.routes[idx];
        let args = route.effective_args(endpoint.declared_args());
        endpoint.set_args(args);

        tracing::debug!(
            method = %route.method(),
            route = route.path(),
            version = ?endpoint.version(),
            "endpoint registered"
        );
        route.insert(endpoint);
    }

    /// Resolves a request method and path to an endpoint.
    ///
    /// The bare path is tried against unversioned slots first; failing
    /// that, a leading numeric segment is interpreted as the version and
    /// the remainder matched against that version's slot.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let segments = split_path(path);

        for route in &self.routes {
            if route.method() != method {
                continue;
            }
            if let Some(raw_args) = route.match_segments(&segments) {
                if let Some(endpoint) = route.get(None) {
                    return Some(RouteMatch {
                        route,
                        endpoint,
                        version: None,
                        deprecated: route.is_deprecated(endpoint),
                        raw_args,
                    });
                }
            }
        }

        if let Some((first, rest)) = segments.split_first() {
            if let Ok(version) = first.parse::<u32>() {
                for route in &self.routes {
                    if route.method() != method {
                        continue;
                    }
                    if let Some(raw_args) = route.match_segments(rest) {
                        if let Some(endpoint) = route.get(Some(version)) {
                            return Some(RouteMatch {
                                route,
                                endpoint,
                                version: Some(version),
                                deprecated: route.is_deprecated(endpoint),
                                raw_args,
                            });
                        }
                    }
                }
            }
        }

        None
    }

    /// Returns all routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of distinct method+path routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
