//! Pipeline configuration.
//!
//! [`PipelineConfig`] collects the app-level knobs the pipeline consults on
//! every request: envelope keys, meta-block emission, response validation
//! mode, the default handler timeout and error exposure. The API-key gate
//! and the authorization gate are configured separately through
//! [`ApiKeyConfig`] and [`AuthFn`], both pluggable.

use pactum_core::{ApiRequest, ApiResult, BoxFuture};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// How response contract violations are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseValidation {
    /// Log a warning and pass the raw value through.
    #[default]
    Lenient,
    /// Fail the request.
    Strict,
}

/// Where the API key is extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyLocation {
    /// A query parameter of the given name.
    Query(String),
    /// A body property of the given name.
    Body(String),
    /// A header of the given name.
    Header(String),
}

/// Validator invoked with the extracted API key.
pub type ApiKeyValidator = Arc<dyn Fn(String) -> BoxFuture<'static, ApiResult<()>> + Send + Sync>;

/// App-level API-key gate configuration.
#[derive(Clone)]
pub struct ApiKeyConfig {
    /// Where to extract the key from.
    pub location: ApiKeyLocation,
    /// The key validator.
    pub validator: ApiKeyValidator,
}

impl ApiKeyConfig {
    /// Creates an API-key configuration from an async validator function.
    pub fn new<F, Fut>(location: ApiKeyLocation, validator: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<()>> + Send + 'static,
    {
        Self {
            location,
            validator: Arc::new(move |key| Box::pin(validator(key))),
        }
    }
}

impl std::fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Pluggable authorization function.
///
/// Receives the raw request and resolves to the caller identity; it is
/// responsible for producing the missing/invalid access token semantics
/// through the errors it returns.
pub type AuthFn = Arc<dyn Fn(Arc<ApiRequest>) -> BoxFuture<'static, ApiResult<Value>> + Send + Sync>;

/// Wraps an async function as an [`AuthFn`].
pub fn auth_fn<F, Fut>(f: F) -> AuthFn
where
    F: Fn(Arc<ApiRequest>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
{
    Arc::new(move |request| Box::pin(f(request)))
}

/// App-level pipeline options.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Application name, echoed in the meta block.
    pub app_name: String,
    /// Application version, echoed in the meta block.
    pub app_version: String,
    /// Envelope key for success payloads.
    pub data_key: String,
    /// Envelope key for error bodies.
    pub error_key: String,
    /// Whether to attach the `_meta` block (individually suppressible with
    /// the `nometa` query flag).
    pub meta: bool,
    /// Response contract enforcement mode.
    pub response_validation: ResponseValidation,
    /// Default handler timeout when an endpoint declares none.
    pub default_timeout: Option<Duration>,
    /// Whether internal error sources are attached to error bodies.
    pub expose_internal_errors: bool,
    /// Bodies longer than this many serialized bytes are elided from the
    /// meta block's request echo.
    pub meta_body_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            app_name: "pactum".to_string(),
            app_version: "0.0.0".to_string(),
            data_key: "data".to_string(),
            error_key: "error".to_string(),
            meta: true,
            response_validation: ResponseValidation::default(),
            default_timeout: None,
            expose_internal_errors: false,
            meta_body_limit: 8192,
        }
    }
}
