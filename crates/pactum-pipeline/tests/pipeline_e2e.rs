//! End-to-end pipeline integration tests.
//!
//! These tests drive full requests through the whole stage sequence and
//! assert the wire-visible contract: envelope shape, stable error codes
//! and stage short-circuiting.

use http::{Method, StatusCode};
use pactum_core::{
    ApiError, ApiRequest, ApiResponse, ApiResult, BoxFuture, Completion, CompletionHandler,
    ErrorField, Field, FnHandler, Param, ParamSpec, RequestContext, ValueType,
};
use pactum_pipeline::{
    auth_fn, AfterHook, ApiKeyConfig, ApiKeyLocation, BeforeHook, HookRegistry, Pipeline,
    PipelineConfig, ResponseValidation,
};
use pactum_router::{Endpoint, EndpointBuilder, RouteRegistry};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimal application shell owning the parts the pipeline borrows.
#[derive(Default)]
struct TestApp {
    registry: RouteRegistry,
    hooks: HookRegistry,
    config: PipelineConfig,
    api_key: Option<ApiKeyConfig>,
    auth: Option<pactum_pipeline::AuthFn>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            ..Self::default()
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
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

fn echo_params_endpoint() -> EndpointBuilder {
    Endpoint::builder().handler(FnHandler::new(|ctx| async move {
        ApiResult::Ok(serde_json::to_value(ctx.params()).unwrap_or(Value::Null))
    }))
}

fn error_code(response: &ApiResponse) -> String {
    response.body.as_ref().expect("error body")["error"]["code"]
        .as_str()
        .expect("error code")
        .to_string()
}

fn error_message(response: &ApiResponse) -> String {
    response.body.as_ref().expect("error body")["error"]["message"]
        .as_str()
        .expect("error message")
        .to_string()
}

// ==================== Parameter casting ====================

#[tokio::test]
async fn test_missing_required_parameter_short_circuits() {
    let invoked = Arc::new(AtomicBool::new(false));
    let invoked_clone = invoked.clone();

    let mut app = TestApp::new();
    app.registry.add(
        Method::POST,
        "/users",
        Endpoint::builder()
            .param(ParamSpec::from(Param::required(Field::new(
                "name",
                ValueType::String,
            ))))
            .handler(FnHandler::new(move |_ctx| {
                let invoked = invoked_clone.clone();
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    ApiResult::Ok(Value::Null)
                }
            }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::POST, "/users").with_body(json!({})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "ERR_MISSING_PARAMETER");
    assert_eq!(error_message(&response), "Parameter 'name' is missing.");
    assert!(!invoked.load(Ordering::SeqCst), "handler must not run");
}

#[tokio::test]
async fn test_invalid_parameter_type_message() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users",
        echo_params_endpoint()
            .param(ParamSpec::from(Param::required(Field::new(
                "age",
                ValueType::Integer,
            ))))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/users").with_query("age", "not-a-number"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "ERR_INVALID_TYPE");
    assert_eq!(
        error_message(&response),
        "Parameter 'age' has invalid type. It should be 'integer'."
    );
}

#[tokio::test]
async fn test_get_reads_query_and_casts() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users",
        echo_params_endpoint()
            .param(ParamSpec::from(Param::required(Field::new(
                "limit",
                ValueType::Integer,
            ))))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/users").with_query("limit", "25"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.body.unwrap();
    assert_eq!(body["data"]["limit"], json!(25));
}

#[tokio::test]
async fn test_post_reads_body_and_passes_unspecified_through() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::POST,
        "/users",
        echo_params_endpoint()
            .param(ParamSpec::from(Param::required(Field::new(
                "name",
                ValueType::String,
            ))))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(
            ApiRequest::new(Method::POST, "/users")
                .with_body(json!({"name": "Alice", "unchecked": "raw"})),
        )
        .await;

    let body = response.body.unwrap();
    assert_eq!(body["data"]["name"], "Alice");
    // Undeclared keys pass through uncast.
    assert_eq!(body["data"]["unchecked"], "raw");
}

#[tokio::test]
async fn test_optional_parameter_may_be_absent() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users",
        echo_params_endpoint()
            .param(ParamSpec::from(Param::optional(Field::new(
                "q",
                ValueType::String,
            ))))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/users")).await;
    assert_eq!(response.status, StatusCode::OK);
}

// ==================== Argument casting ====================

#[tokio::test]
async fn test_declared_integer_arg_is_cast() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/args/:id",
        Endpoint::builder()
            .arg(Field::new("id", ValueType::Integer))
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"id": ctx.arg("id").cloned().unwrap_or(Value::Null)}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/args/5")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"], json!({"id": 5}));

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/args/invalid"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "ERR_INVALID_TYPE");
    assert_eq!(
        error_message(&response),
        "Argument 'id' has invalid type. It should be 'integer'."
    );
}

#[tokio::test]
async fn test_undeclared_arg_stays_raw_string() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/raw/:token",
        Endpoint::builder()
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"token": ctx.arg("token").cloned().unwrap_or(Value::Null)}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/raw/123")).await;
    assert_eq!(response.body.unwrap()["data"]["token"], "123");
}

// ==================== API-key gate ====================

fn keyed_app() -> TestApp {
    let mut app = TestApp::new();
    app.api_key = Some(ApiKeyConfig::new(
        ApiKeyLocation::Header("x-api-key".to_string()),
        |key| async move {
            if key == "valid-key" {
                Ok(())
            } else {
                Err(ApiError::InvalidApiKey)
            }
        },
    ));
    app
}

#[tokio::test]
async fn test_missing_api_key_blocks_handler() {
    let invoked = Arc::new(AtomicBool::new(false));
    let invoked_clone = invoked.clone();

    let mut app = keyed_app();
    app.registry.add(
        Method::GET,
        "/secure",
        Endpoint::builder()
            .handler(FnHandler::new(move |_ctx| {
                let invoked = invoked_clone.clone();
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    ApiResult::Ok(Value::Null)
                }
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/secure")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "ERR_MISSING_API_KEY");
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_valid_api_key_is_visible_to_handler() {
    let mut app = keyed_app();
    app.registry.add(
        Method::GET,
        "/secure",
        Endpoint::builder()
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"key": ctx.api_key()}))
            }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/secure").with_header("x-api-key", "valid-key"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"]["key"], "valid-key");
}

#[tokio::test]
async fn test_invalid_api_key_rejected() {
    let mut app = keyed_app();
    app.registry.add(
        Method::GET,
        "/secure",
        Endpoint::builder()
            .handler(FnHandler::new(|_ctx| async move { ApiResult::Ok(Value::Null) }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/secure").with_header("x-api-key", "wrong"))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "ERR_INVALID_API_KEY");
}

#[tokio::test]
async fn test_excluded_api_key_bypasses_validator() {
    let mut app = keyed_app();
    app.registry.add(
        Method::GET,
        "/secure",
        Endpoint::builder()
            .exclude_api_key("internal-probe")
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"key": ctx.api_key()}))
            }))
            .build()
            .unwrap(),
    );

    // "internal-probe" would fail the validator; the exclusion accepts it.
    let response = app
        .dispatch(
            ApiRequest::new(Method::GET, "/secure").with_header("x-api-key", "internal-probe"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"]["key"], "internal-probe");
}

#[tokio::test]
async fn test_endpoint_can_disable_api_key() {
    let mut app = keyed_app();
    app.registry.add(
        Method::GET,
        "/open",
        Endpoint::builder()
            .api_key(false)
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!("open"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/open")).await;
    assert_eq!(response.status, StatusCode::OK);
}

// ==================== Authorization gate ====================

#[tokio::test]
async fn test_required_auth_failure_short_circuits() {
    let mut app = TestApp::new();
    app.auth = Some(auth_fn(|request| async move {
        match request.header("authorization") {
            Some("Bearer good-token") => Ok(json!({"user": "u1"})),
            Some(_) => Err(ApiError::InvalidAccessToken),
            None => Err(ApiError::MissingAccessToken),
        }
    }));
    app.registry.add(
        Method::GET,
        "/me",
        Endpoint::builder()
            .require_auth()
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"identity": ctx.identity().cloned()}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/me")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&response), "ERR_MISSING_ACCESS_TOKEN");

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/me").with_header("authorization", "Bearer nope"))
        .await;
    assert_eq!(error_code(&response), "ERR_INVALID_ACCESS_TOKEN");

    let response = app
        .dispatch(
            ApiRequest::new(Method::GET, "/me").with_header("authorization", "Bearer good-token"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"]["identity"]["user"], "u1");
}

#[tokio::test]
async fn test_optional_auth_failure_is_tolerated() {
    let mut app = TestApp::new();
    app.auth = Some(auth_fn(|_request| async move {
        Err::<Value, _>(ApiError::MissingAccessToken)
    }));
    app.registry.add(
        Method::GET,
        "/feed",
        Endpoint::builder()
            .auth(pactum_router::AuthMode::Optional)
            .handler(FnHandler::new(|ctx| async move {
                ApiResult::Ok(json!({"anonymous": ctx.identity().is_none()}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/feed")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"]["anonymous"], true);
}

// ==================== Hooks ====================

struct RecordingBefore {
    log: Arc<std::sync::Mutex<Vec<&'static str>>>,
    name: &'static str,
    fail: bool,
}

impl BeforeHook for RecordingBefore {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: &'a ApiRequest,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(ApiError::custom(400, "ERR_HOOK_REJECTED", "Hook said no."))
            } else {
                Ok(())
            }
        })
    }
}

struct HeaderAfter;

impl AfterHook for HeaderAfter {
    fn call<'a>(
        &'a self,
        is_error: bool,
        _ctx: &'a mut RequestContext,
        _request: &'a ApiRequest,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            response.insert_header("x-outcome", if is_error { "error" } else { "ok" });
            Ok(())
        })
    }
}

#[tokio::test]
async fn test_before_hooks_run_in_order_and_short_circuit() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let invoked = Arc::new(AtomicBool::new(false));
    let invoked_clone = invoked.clone();

    let mut app = TestApp::new();
    app.hooks
        .register_before(
            "*",
            RecordingBefore {
                log: log.clone(),
                name: "first",
                fail: false,
            },
        )
        .unwrap();
    app.hooks
        .register_before(
            "/guarded/*rest",
            RecordingBefore {
                log: log.clone(),
                name: "guard",
                fail: true,
            },
        )
        .unwrap();
    app.hooks
        .register_before(
            "*",
            RecordingBefore {
                log: log.clone(),
                name: "late",
                fail: false,
            },
        )
        .unwrap();

    app.registry.add(
        Method::GET,
        "/guarded/data",
        Endpoint::builder()
            .handler(FnHandler::new(move |_ctx| {
                let invoked = invoked_clone.clone();
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    ApiResult::Ok(Value::Null)
                }
            }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/guarded/data"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "ERR_HOOK_REJECTED");
    assert!(!invoked.load(Ordering::SeqCst));
    // Spec-map order: "*" hooks group under the first "*" registration.
    assert_eq!(*log.lock().unwrap(), vec!["first", "late", "guard"]);
}

#[tokio::test]
async fn test_after_hooks_run_on_success_and_error() {
    let mut app = TestApp::new();
    app.hooks.register_after("*", HeaderAfter).unwrap();
    app.registry.add(
        Method::GET,
        "/ping",
        Endpoint::builder()
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!("pong"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/ping")).await;
    assert_eq!(response.headers.get("x-outcome").unwrap(), "ok");

    let response = app.dispatch(ApiRequest::new(Method::GET, "/missing")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "ERR_PAGE_NOT_FOUND");
    assert_eq!(response.headers.get("x-outcome").unwrap(), "error");
}

// ==================== Timeout ====================

#[tokio::test]
async fn test_timeout_emits_408_and_suppresses_tardy_completion() {
    let tardy_decided = Arc::new(AtomicBool::new(false));
    let tardy_decided_clone = tardy_decided.clone();

    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/slow",
        Endpoint::builder()
            .timeout(Duration::from_millis(50))
            .handler(CompletionHandler::new(move |_ctx, done: Completion| {
                let decided = tardy_decided_clone.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    decided.store(done.succeed(json!("too late")), Ordering::SeqCst);
                });
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/slow")).await;
    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(error_code(&response), "ERR_REQUEST_TIMEOUT");

    // Let the tardy completion fire; it must have no observable effect.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!tardy_decided.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_fast_handler_beats_timeout() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/fast",
        Endpoint::builder()
            .timeout(Duration::from_millis(200))
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!("quick"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/fast")).await;
    assert_eq!(response.status, StatusCode::OK);
}

// ==================== Response shaping ====================

#[tokio::test]
async fn test_response_contract_casts_and_filters() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/shaped",
        Endpoint::builder()
            .response(vec![Field::new("id", ValueType::Integer)])
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!({"id": "7", "leak": "hidden"}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/shaped")).await;
    let body = response.body.unwrap();
    assert_eq!(body["data"]["id"], json!(7));
    assert!(body["data"].get("leak").is_none());
}

#[tokio::test]
async fn test_lenient_mode_passes_invalid_field_through() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/loose",
        Endpoint::builder()
            .response(vec![Field::new("count", ValueType::Integer)])
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!({"count": "many"}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/loose")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["data"]["count"], "many");
}

#[tokio::test]
async fn test_strict_mode_fails_invalid_field() {
    let mut app = TestApp::new();
    app.config.response_validation = ResponseValidation::Strict;
    app.registry.add(
        Method::GET,
        "/strict",
        Endpoint::builder()
            .response(vec![Field::new("count", ValueType::Integer)])
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!({"count": "many"}))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/strict")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&response), "ERR_INTERNAL_SERVER_ERROR");
}

#[tokio::test]
async fn test_custom_response_bypasses_shaping() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/report",
        Endpoint::builder()
            .custom_response("text/csv")
            .handler(FnHandler::new(|_ctx| async move {
                ApiResult::Ok(json!("a,b\n1,2"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/report")).await;
    assert_eq!(response.content_type, "text/csv");
    assert_eq!(response.body.unwrap(), json!("a,b\n1,2"));
}

#[tokio::test]
async fn test_null_data_is_no_content() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::DELETE,
        "/users/:id",
        Endpoint::builder()
            .handler(FnHandler::new(|_ctx| async move { ApiResult::Ok(Value::Null) }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::DELETE, "/users/5"))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_none());
}

// ==================== Versioning ====================

#[tokio::test]
async fn test_versions_route_independently_with_warning() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users",
        Endpoint::builder()
            .version(0)
            .handler(FnHandler::new(|_ctx| async move { ApiResult::Ok(json!("v0")) }))
            .build()
            .unwrap(),
    );
    app.registry.add(
        Method::GET,
        "/users",
        Endpoint::builder()
            .version(1)
            .handler(FnHandler::new(|_ctx| async move { ApiResult::Ok(json!("v1")) }))
            .build()
            .unwrap(),
    );

    let old = app.dispatch(ApiRequest::new(Method::GET, "/0/users")).await;
    let old_body = old.body.unwrap();
    assert_eq!(old_body["data"], "v0");
    assert_eq!(old_body["warning"], "This endpoint is deprecated.");

    let new = app.dispatch(ApiRequest::new(Method::GET, "/1/users")).await;
    let new_body = new.body.unwrap();
    assert_eq!(new_body["data"], "v1");
    assert!(new_body.get("warning").is_none());
}

// ==================== Unexpected handler errors ====================

#[tokio::test]
async fn test_handler_error_normalizes_to_500_with_message() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/broken",
        Endpoint::builder()
            .error(ErrorField::new("ERR_UPSTREAM", "Upstream failure"))
            .handler(FnHandler::new(|_ctx| async move {
                Err::<Value, _>(ApiError::internal("database unreachable"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/broken")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&response), "ERR_INTERNAL_SERVER_ERROR");
    assert_eq!(error_message(&response), "database unreachable");
}

#[tokio::test]
async fn test_handler_custom_error_passes_through() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users/:id",
        Endpoint::builder()
            .handler(FnHandler::new(|_ctx| async move {
                Err::<Value, _>(ApiError::custom(404, "ERR_USER_NOT_FOUND", "No such user."))
            }))
            .build()
            .unwrap(),
    );

    let response = app
        .dispatch(ApiRequest::new(Method::GET, "/users/9"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "ERR_USER_NOT_FOUND");
}

// ==================== Docs endpoint ====================

#[tokio::test]
async fn test_docs_prop_serves_projection() {
    let mut app = TestApp::new();
    app.registry.add(
        Method::GET,
        "/users",
        Endpoint::builder()
            .description("List users")
            .handler(FnHandler::new(|_ctx| async move { ApiResult::Ok(json!([])) }))
            .build()
            .unwrap(),
    );
    app.registry.add(
        Method::GET,
        "/docs",
        Endpoint::builder()
            .hide_docs()
            .prop(pactum_pipeline::DOCS_PROP, json!(true))
            .handler(FnHandler::new(|_ctx| async move {
                Err::<Value, _>(ApiError::internal("placeholder"))
            }))
            .build()
            .unwrap(),
    );

    let response = app.dispatch(ApiRequest::new(Method::GET, "/docs")).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.body.unwrap();
    assert_eq!(body["data"]["GET /users"]["description"], "List users");
    // The docs endpoint itself is hidden.
    assert!(body["data"].get("GET /docs").is_none());
}
