//! The request pipeline state machine.
//!
//! Every request runs the same strictly sequential stages, each able to
//! short-circuit to error emission through the single `ApiResult` channel:
//!
//! ```text
//! API-key gate → auth gate → argument casting → parameter casting
//!     → before-hooks → handler (with timeout) → response shaping
//!     → after-hooks → terminal emission
//! ```
//!
//! After-hooks always run, on success, on every stage failure and on
//! not-found, so response metadata and logging stay consistent. The
//! pipeline holds the application's registry, hooks and configuration by
//! reference; it owns nothing and keeps no per-request state of its own.

use crate::config::{ApiKeyConfig, ApiKeyLocation, AuthFn, PipelineConfig, ResponseValidation};
use crate::envelope::{emit_error, emit_success, Payload};
use crate::hooks::HookRegistry;
use http::Method;
use indexmap::IndexMap;
use pactum_core::{
    ApiError, ApiRequest, ApiResponse, ApiResult, BoxFuture, HandlerContext, HandlerOutcome,
    RequestContext,
};
use pactum_router::{AuthMode, Endpoint, ResponseContract, RouteMatch, RouteRegistry};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Endpoint prop marking the synthetic documentation endpoint.
///
/// The pipeline serves such an endpoint from the registry it already holds
/// instead of invoking the placeholder handler.
pub const DOCS_PROP: &str = "pactum.docs";

/// The per-application request pipeline.
///
/// Construction borrows the application's registry, hook registry and
/// configuration; `dispatch` can run any number of requests concurrently
/// since all per-request state lives in the [`RequestContext`].
pub struct Pipeline<'a> {
    registry: &'a RouteRegistry,
    hooks: &'a HookRegistry,
    config: &'a PipelineConfig,
    api_key: Option<&'a ApiKeyConfig>,
    auth: Option<&'a AuthFn>,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over the application's parts.
    #[must_use]
    pub fn new(
        registry: &'a RouteRegistry,
        hooks: &'a HookRegistry,
        config: &'a PipelineConfig,
        api_key: Option<&'a ApiKeyConfig>,
        auth: Option<&'a AuthFn>,
    ) -> Self {
        Self {
            registry,
            hooks,
            config,
            api_key,
            auth,
        }
    }

    /// Runs one request through the full stage sequence and emits the
    /// response envelope.
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let request = Arc::new(request);
        let mut ctx = RequestContext::new();

        let matched = self.registry.find(&request.method, &request.path);
        let deprecated = matched.as_ref().is_some_and(|m| m.deprecated);

        let result = match matched.as_ref() {
            None => Err(ApiError::PageNotFound),
            Some(m) => self.run(&request, &mut ctx, m).await,
        };

        let is_error = result.is_err();
        let mut response = match result {
            Ok(payload) => emit_success(self.config, &request, &ctx, payload, deprecated),
            Err(ref error) => {
                if error.status_code().is_server_error() {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        code = error.code(),
                        %error,
                        "request failed"
                    );
                } else {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        code = error.code(),
                        %error,
                        "request rejected"
                    );
                }
                emit_error(self.config, &request, &ctx, error, deprecated)
            }
        };

        if let Some(hook_error) = self
            .run_after_hooks(is_error, &mut ctx, &request, &mut response)
            .await
        {
            // A failing after-hook replaces the decided outcome with its
            // own error; headers added by earlier hooks survive.
            let headers = response.headers.clone();
            response = emit_error(self.config, &request, &ctx, &hook_error, deprecated);
            response.headers = headers;
        }

        response
    }

    async fn run(
        &self,
        request: &Arc<ApiRequest>,
        ctx: &mut RequestContext,
        m: &RouteMatch<'_>,
    ) -> ApiResult<Payload> {
        self.api_key_gate(request, ctx, m.endpoint).await?;
        self.auth_gate(request, ctx, m.endpoint).await?;
        cast_args(ctx, m)?;
        cast_params(request, ctx, m.endpoint)?;
        self.run_before_hooks(request, ctx).await?;
        let data = self.invoke(request, ctx, m.endpoint).await?;
        self.shape(data, m.endpoint)
    }

    /// Stage 1: API-key gate.
    async fn api_key_gate(
        &self,
        request: &ApiRequest,
        ctx: &mut RequestContext,
        endpoint: &Endpoint,
    ) -> ApiResult<()> {
        let Some(config) = self.api_key else {
            return Ok(());
        };
        if endpoint.api_key() == Some(false) {
            return Ok(());
        }

        let key = match &config.location {
            ApiKeyLocation::Query(name) => request
                .query
                .get(name)
                .and_then(Value::as_str)
                .map(ToString::to_string),
            ApiKeyLocation::Body(name) => request
                .body
                .get(name)
                .and_then(Value::as_str)
                .map(ToString::to_string),
            ApiKeyLocation::Header(name) => request.header(name).map(ToString::to_string),
        };

        let Some(key) = key else {
            return Err(ApiError::MissingApiKey);
        };

        if endpoint.excluded_api_keys().contains(&key) {
            ctx.set_api_key(key);
            return Ok(());
        }

        match (config.validator)(key.clone()).await {
            Ok(()) => {
                ctx.set_api_key(key);
                Ok(())
            }
            // A validator may supply its own typed error; anything opaque
            // collapses to the standard invalid-key error.
            Err(ApiError::Internal { .. }) => Err(ApiError::InvalidApiKey),
            Err(other) => Err(other),
        }
    }

    /// Stage 2: authorization gate.
    async fn auth_gate(
        &self,
        request: &Arc<ApiRequest>,
        ctx: &mut RequestContext,
        endpoint: &Endpoint,
    ) -> ApiResult<()> {
        match endpoint.auth() {
            AuthMode::Disabled => Ok(()),
            AuthMode::Required => {
                let Some(auth) = self.auth else {
                    return Err(ApiError::internal(
                        "authorization required but no auth function is configured",
                    ));
                };
                let identity = (auth)(Arc::clone(request)).await?;
                ctx.set_identity(identity);
                Ok(())
            }
            AuthMode::Optional => {
                if let Some(auth) = self.auth {
                    if let Ok(identity) = (auth)(Arc::clone(request)).await {
                        ctx.set_identity(identity);
                    }
                }
                Ok(())
            }
        }
    }

    /// Stage 5: before-hooks, sequential, registration order.
    async fn run_before_hooks(
        &self,
        request: &ApiRequest,
        ctx: &mut RequestContext,
    ) -> ApiResult<()> {
        for hook in self.hooks.before_matching(&request.path) {
            hook.call(ctx, request).await?;
        }
        Ok(())
    }

    /// Stage 6: handler invocation, with the per-endpoint (or app default)
    /// timeout armed around it.
    async fn invoke(
        &self,
        request: &Arc<ApiRequest>,
        ctx: &RequestContext,
        endpoint: &Endpoint,
    ) -> ApiResult<Option<Value>> {
        let fut: BoxFuture<'static, HandlerOutcome> = if is_docs_endpoint(endpoint) {
            let docs = pactum_docs::project(self.registry).to_value();
            Box::pin(async move { HandlerOutcome::Success(docs) })
        } else {
            let handler_ctx = HandlerContext::new(Arc::clone(request), ctx);
            endpoint.handler().call(handler_ctx)
        };

        let outcome = match endpoint.timeout().or(self.config.default_timeout) {
            Some(duration) => match tokio::time::timeout(duration, fut).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        timeout_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                        path = %request.path,
                        "handler timed out"
                    );
                    return Err(ApiError::RequestTimeout);
                }
            },
            None => fut.await,
        };

        match outcome {
            HandlerOutcome::Success(Value::Null) => Ok(None),
            HandlerOutcome::Success(data) => Ok(Some(data)),
            HandlerOutcome::Failure(error) => Err(error),
        }
    }

    /// Stage 7: response shaping against the declared contract.
    fn shape(&self, data: Option<Value>, endpoint: &Endpoint) -> ApiResult<Payload> {
        match endpoint.response() {
            None => Ok(data.map_or(Payload::Empty, Payload::Data)),
            Some(ResponseContract::NoContent) => Ok(Payload::Empty),
            Some(ResponseContract::Custom { content_type }) => Ok(match data {
                Some(data) => Payload::Custom {
                    content_type: content_type.clone(),
                    data,
                },
                None => Payload::Empty,
            }),
            Some(ResponseContract::Fields(fields)) => {
                let Some(data) = data else {
                    return Ok(Payload::Empty);
                };
                let Some(object) = data.as_object() else {
                    return match self.config.response_validation {
                        ResponseValidation::Strict => Err(ApiError::internal(
                            "Response payload is not an object.",
                        )),
                        ResponseValidation::Lenient => {
                            tracing::warn!(
                                "response payload is not an object; passing it through unshaped"
                            );
                            Ok(Payload::Data(data))
                        }
                    };
                };

                let mut shaped = Map::new();
                for field in fields {
                    let Some(value) = object.get(&field.key).filter(|v| !v.is_null()) else {
                        continue;
                    };
                    if field.value_type.is_valid(value) {
                        match field.value_type.cast(value) {
                            Ok(cast) => {
                                shaped.insert(field.name.clone(), cast);
                                continue;
                            }
                            Err(_) => {}
                        }
                    }
                    match self.config.response_validation {
                        ResponseValidation::Strict => {
                            return Err(ApiError::internal(format!(
                                "Response field '{}' has invalid type. It should be '{}'.",
                                field.name, field.value_type
                            )));
                        }
                        ResponseValidation::Lenient => {
                            tracing::warn!(
                                field = %field.name,
                                expected = %field.value_type,
                                "response field failed validation; passing raw value through"
                            );
                            shaped.insert(field.name.clone(), value.clone());
                        }
                    }
                }
                Ok(Payload::Data(Value::Object(shaped)))
            }
        }
    }

    /// Stage 8: after-hooks. All matching hooks run even when one fails;
    /// the first failure is returned for re-emission.
    async fn run_after_hooks(
        &self,
        is_error: bool,
        ctx: &mut RequestContext,
        request: &ApiRequest,
        response: &mut ApiResponse,
    ) -> Option<ApiError> {
        let mut first_error = None;
        for hook in self.hooks.after_matching(&request.path) {
            if let Err(error) = hook.call(is_error, ctx, request, response).await {
                tracing::error!(
                    request_id = %ctx.request_id(),
                    %error,
                    "after-hook failed"
                );
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        first_error
    }
}

fn is_docs_endpoint(endpoint: &Endpoint) -> bool {
    endpoint
        .props()
        .get(DOCS_PROP)
        .is_some_and(|v| v == &Value::Bool(true))
}

/// Stage 3: path argument casting.
fn cast_args(ctx: &mut RequestContext, m: &RouteMatch<'_>) -> ApiResult<()> {
    for field in m.endpoint.args() {
        let Some(raw) = m.raw_args.get(&field.name) else {
            continue;
        };
        let value = Value::String(raw.to_string());
        if !field.value_type.is_valid(&value) {
            return Err(ApiError::invalid_argument_type(
                field.name.clone(),
                field.value_type.to_string(),
            ));
        }
        let cast = field.value_type.cast(&value).map_err(|_| {
            ApiError::invalid_argument_type(field.name.clone(), field.value_type.to_string())
        })?;
        ctx.set_arg(field.key.clone(), cast);
    }
    Ok(())
}

/// Stage 4: parameter casting over the merged source (GET reads the query,
/// every other method reads the body).
fn cast_params(
    request: &ApiRequest,
    ctx: &mut RequestContext,
    endpoint: &Endpoint,
) -> ApiResult<()> {
    let merged: IndexMap<String, Value> = if request.method == Method::GET {
        request.query.clone()
    } else {
        request
            .body
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    };

    for param in endpoint.params() {
        match merged.get(param.name()).filter(|v| !v.is_null()) {
            None => {
                if param.is_required() {
                    return Err(ApiError::missing_parameter(param.name()));
                }
            }
            Some(value) => {
                if !param.value_type().is_valid(value) {
                    return Err(ApiError::invalid_parameter_type(
                        param.name(),
                        param.value_type().to_string(),
                    ));
                }
                let cast = param.value_type().cast(value).map_err(|_| {
                    ApiError::invalid_parameter_type(param.name(), param.value_type().to_string())
                })?;
                ctx.set_param(param.key(), cast);
            }
        }
    }

    // Unspecified keys pass through uncast.
    for (name, value) in &merged {
        if !endpoint.params().iter().any(|p| p.name() == name) {
            ctx.set_param(name.clone(), value.clone());
        }
    }

    Ok(())
}
