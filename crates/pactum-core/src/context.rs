//! Per-request context.
//!
//! A [`RequestContext`] is created at the top of the pipeline and mutated by
//! its stages in order: the API-key gate stores the accepted key, the
//! authorization gate stores the caller identity, the casting stages store
//! cast arguments and parameters, and hooks may attach free-form props.
//! Stages run strictly sequentially, so the context needs no locking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking and
/// log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable state carried through one trip of the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    args: IndexMap<String, Value>,
    params: IndexMap<String, Value>,
    api_key: Option<String>,
    identity: Option<Value>,
    props: IndexMap<String, Value>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            args: IndexMap::new(),
            params: IndexMap::new(),
            api_key: None,
            identity: None,
            props: IndexMap::new(),
            started_at: Instant::now(),
        }
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

    /// Stores a cast path argument.
    ///
    /// This should only be called by the argument-casting stage.
    pub fn set_arg(&mut self, key: impl Into<String>, value: Value) {
        self.args.insert(key.into(), value);
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

    /// Stores a cast parameter.
    ///
    /// This should only be called by the parameter-casting stage.
    pub fn set_param(&mut self, key: impl Into<String>, value: Value) {
        self.params.insert(key.into(), value);
    }

    /// Returns the accepted API key, if the key gate ran and passed.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Stores the accepted API key.
    ///
    /// This should only be called by the API-key gate.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// Returns the caller identity produced by the authorization gate.
    #[must_use]
    pub fn identity(&self) -> Option<&Value> {
        self.identity.as_ref()
    }

    /// Stores the caller identity.
    ///
    /// This should only be called by the authorization gate.
    pub fn set_identity(&mut self, identity: Value) {
        self.identity = Some(identity);
    }

    /// Returns a free-form prop attached by a hook.
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Attaches a free-form prop; later writes overwrite earlier ones.
    pub fn set_prop(&mut self, name: impl Into<String>, value: Value) {
        self.props.insert(name.into(), value);
    }

    /// Returns all props.
    #[must_use]
    pub fn props(&self) -> &IndexMap<String, Value> {
        &self.props
    }

    /// Returns the elapsed time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
