//! Routes: all versions of one method+path.
//!
//! A [`Route`] owns every registered version of a single method+path, plus
//! the default path-argument fields derived from its `:token` segments.
//! Version resolution and the deprecation rule live here: an endpoint is
//! deprecated when its own flag is set or when its numeric version is
//! strictly below the route's maximum. The unversioned slot is its own
//! namespace and is never compared against numeric versions.

use crate::args::RawArgs;
use crate::endpoint::Endpoint;
use http::Method;
use pactum_core::{Field, ValueType};
use std::collections::BTreeMap;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RouteSegment {
    /// A literal segment, matched verbatim.
    Literal(String),
    /// A `:name` argument segment, matching any single segment.
    Arg(String),
}

pub(crate) fn parse_segments(path: &str) -> Vec<RouteSegment> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            segment.strip_prefix(':').map_or_else(
                || RouteSegment::Literal(segment.to_string()),
                |name| RouteSegment::Arg(name.to_string()),
            )
        })
        .collect()
}

pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// The set of all versions of one method+path.
#[derive(Debug)]
pub struct Route {
    method: Method,
    route: String,
    segments: Vec<RouteSegment>,
    versions: BTreeMap<u32, Endpoint>,
    unversioned: Option<Endpoint>,
}

impl Route {
    pub(crate) fn new(method: Method, route: &str) -> Self {
        Self {
            method,
            route: route.to_string(),
            segments: parse_segments(route),
            versions: BTreeMap::new(),
            unversioned: None,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the route pattern, e.g. `/users/:id`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.route
    }

    /// Returns the greatest registered numeric version, `None` when only an
    /// unversioned endpoint exists.
    #[must_use]
    pub fn max_version(&self) -> Option<u32> {
        self.versions.keys().next_back().copied()
    }

    /// Whether the given endpoint of this route is deprecated: its explicit
    /// flag is set, or a newer numeric version exists. A route with a single
    /// version is never implicitly deprecated.
    #[must_use]
    pub fn is_deprecated(&self, endpoint: &Endpoint) -> bool {
        if endpoint.is_deprecated() {
            return true;
        }
        matches!(
            (endpoint.version(), self.max_version()),
            (Some(version), Some(max)) if version < max
        )
    }

    /// Returns the endpoint registered for the given version slot.
    #[must_use]
    pub fn get(&self, version: Option<u32>) -> Option<&Endpoint> {
        match version {
            Some(v) => self.versions.get(&v),
            None => self.unversioned.as_ref(),
        }
    }

    /// Iterates endpoints: the unversioned slot first, then ascending
    /// numeric versions.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.unversioned.iter().chain(self.versions.values())
    }

    /// Last write wins for a given version slot; sibling versions are
    /// unaffected.
    pub(crate) fn insert(&mut self, endpoint: Endpoint) {
        match endpoint.version() {
            Some(v) => {
                self.versions.insert(v, endpoint);
            }
            None => self.unversioned = Some(endpoint),
        }
    }

    /// Structurally matches request path segments against the pattern,
    /// extracting raw argument values.
    #[must_use]
    pub(crate) fn match_segments(&self, request: &[&str]) -> Option<RawArgs> {
        if request.len() != self.segments.len() {
            return None;
        }

        let mut args = RawArgs::new();
        for (pattern, actual) in self.segments.iter().zip(request.iter()) {
            match pattern {
                RouteSegment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                RouteSegment::Arg(name) => args.push(name.clone(), (*actual).to_string()),
            }
        }
        Some(args)
    }

    /// Default `any`-typed fields for the pattern's `:token` segments,
    /// overlaid with the endpoint's explicit declarations by name.
    pub(crate) fn effective_args(&self, declared: &[Field]) -> Vec<Field> {
        let mut args: Vec<Field> = self
            .segments
            .iter()
            .filter_map(|segment| match segment {
                RouteSegment::Arg(name) => Some(
                    declared
                        .iter()
                        .find(|f| f.name == *name)
                        .cloned()
                        .unwrap_or_else(|| Field::new(name.clone(), ValueType::Any)),
                ),
                RouteSegment::Literal(_) => None,
            })
            .collect();

        // Explicit declarations that match no token are kept as-is.
        for field in declared {
            if !args.iter().any(|f| f.name == field.name) {
                args.push(field.clone());
            }
        }
        args
    }
}
