//! The application object.
//!
//! An [`Api`] owns everything one service instance needs: the route
//! registry, the hook registry, the pipeline configuration and the
//! pluggable gates. There is no process-wide state; construct as many
//! independent instances as needed and hand each one's [`Api::dispatch`]
//! to the transport layer.
//!
//! Registration happens before serving starts; once requests flow, the
//! instance is treated as read-only.

use http::Method;
use pactum_core::{ApiError, ApiRequest, ApiResponse, ApiResult, FnHandler};
use pactum_docs::Documentation;
use pactum_pipeline::{
    AfterHook, ApiKeyConfig, AuthFn, BeforeHook, HookRegistry, HookSpecError, Pipeline,
    PipelineConfig, ResponseValidation, DOCS_PROP,
};
use pactum_router::{Endpoint, RouteRegistry};
use serde_json::Value;
use std::time::Duration;

/// One service instance of the contract layer.
///
/// # Example
///
/// ```ignore
/// let mut api = Api::builder().name("user-service").version("1.4.0").build();
///
/// api.get("/users/:id", Endpoint::builder()
///     .version(1)
///     .arg(Field::new("id", ValueType::Integer))
///     .handler(FnHandler::new(get_user))
///     .build()?);
///
/// api.enable_docs("/docs");
///
/// // In the transport layer:
/// let response = api.dispatch(request).await;
/// ```
pub struct Api {
    config: PipelineConfig,
    registry: RouteRegistry,
    hooks: HookRegistry,
    api_key: Option<ApiKeyConfig>,
    auth: Option<AuthFn>,
}

impl Api {
    /// Creates an API with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates an API builder.
    #[must_use]
    pub fn builder() -> ApiBuilder {
        ApiBuilder::new()
    }

    /// Registers an endpoint under an explicit method.
    pub fn register(&mut self, method: Method, path: &str, endpoint: Endpoint) {
        self.registry.add(method, path, endpoint);
    }

    /// Registers a GET endpoint.
    pub fn get(&mut self, path: &str, endpoint: Endpoint) {
        self.register(Method::GET, path, endpoint);
    }

    /// Registers a POST endpoint.
    pub fn post(&mut self, path: &str, endpoint: Endpoint) {
        self.register(Method::POST, path, endpoint);
    }

    /// Registers a PUT endpoint.
    pub fn put(&mut self, path: &str, endpoint: Endpoint) {
        self.register(Method::PUT, path, endpoint);
    }

    /// Registers a DELETE endpoint.
    pub fn delete(&mut self, path: &str, endpoint: Endpoint) {
        self.register(Method::DELETE, path, endpoint);
    }

    /// Registers a PATCH endpoint.
    pub fn patch(&mut self, path: &str, endpoint: Endpoint) {
        self.register(Method::PATCH, path, endpoint);
    }

    /// Registers a before-hook under a path specification.
    pub fn before(&mut self, spec: &str, hook: impl BeforeHook) -> Result<(), HookSpecError> {
        self.hooks.register_before(spec, hook)
    }

    /// Registers an after-hook under a path specification.
    pub fn after(&mut self, spec: &str, hook: impl AfterHook) -> Result<(), HookSpecError> {
        self.hooks.register_after(spec, hook)
    }

    /// Registers the synthetic documentation endpoint at the given path.
    ///
    /// The endpoint is hidden from its own output and served from the live
    /// registry, so endpoints registered after this call still appear.
    pub fn enable_docs(&mut self, path: &str) {
        let endpoint = Endpoint::builder()
            .description("Machine-readable API documentation")
            .hide_docs()
            .prop(DOCS_PROP, Value::Bool(true))
            .handler(FnHandler::new(|_ctx| async move {
                // Never reached; the pipeline serves this endpoint itself.
                ApiResult::Err(ApiError::internal("documentation placeholder handler"))
            }))
            .build()
            .expect("docs endpoint declaration is valid");
        self.register(Method::GET, path, endpoint);
    }

    /// Returns the route registry.
    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Projects the current registry into documentation.
    #[must_use]
    pub fn docs(&self) -> Documentation {
        pactum_docs::project(&self.registry)
    }

    /// Runs one decoded request through the pipeline.
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        Pipeline::new(
            &self.registry,
            &self.hooks,
            &self.config,
            self.api_key.as_ref(),
            self.auth.as_ref(),
        )
        .dispatch(request)
        .await
    }
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Api`].
pub struct ApiBuilder {
    config: PipelineConfig,
    api_key: Option<ApiKeyConfig>,
    auth: Option<AuthFn>,
}

impl ApiBuilder {
    /// Creates a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            api_key: None,
            auth: None,
        }
    }

    /// Sets the application name (echoed in the meta block).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    /// Sets the application version (echoed in the meta block).
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.app_version = version.into();
        self
    }

    /// Sets the envelope key for success payloads.
    #[must_use]
    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.config.data_key = key.into();
        self
    }

    /// Sets the envelope key for error bodies.
    #[must_use]
    pub fn error_key(mut self, key: impl Into<String>) -> Self {
        self.config.error_key = key.into();
        self
    }

    /// Enables or disables the `_meta` block.
    #[must_use]
    pub fn meta(mut self, enabled: bool) -> Self {
        self.config.meta = enabled;
        self
    }

    /// Sets the response contract enforcement mode.
    #[must_use]
    pub fn response_validation(mut self, mode: ResponseValidation) -> Self {
        self.config.response_validation = mode;
        self
    }

    /// Sets the default handler timeout for endpoints declaring none.
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = Some(timeout);
        self
    }

    /// Attaches internal error sources to error bodies.
    ///
    /// **Warning**: only enable this in development environments.
    #[must_use]
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.config.expose_internal_errors = expose;
        self
    }

    /// Enables the API-key gate.
    #[must_use]
    pub fn api_key(mut self, config: ApiKeyConfig) -> Self {
        self.api_key = Some(config);
        self
    }

    /// Plugs in the authorization function.
    #[must_use]
    pub fn auth(mut self, auth: AuthFn) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the API.
    #[must_use]
    pub fn build(self) -> Api {
        Api {
            config: self.config,
            registry: RouteRegistry::new(),
            hooks: HookRegistry::new(),
            api_key: self.api_key,
            auth: self.auth,
        }
    }
}

impl Default for ApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
