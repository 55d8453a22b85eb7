//! Terminal response emission.
//!
//! The last pipeline stage wraps the decided outcome into the JSON
//! envelope: success payloads under the configured data key (or a bare 204
//! when there is no payload), error bodies under the configured error key,
//! plus the optional `_meta` block and the deprecation warning. Custom
//! response contracts bypass the envelope entirely and emit their payload
//! verbatim.

use crate::config::PipelineConfig;
use http::StatusCode;
use indexmap::IndexMap;
use pactum_core::{ApiError, ApiRequest, ApiResponse, RequestContext};
use serde_json::{json, Map, Value};

/// The shaped outcome handed to emission.
#[derive(Debug)]
pub(crate) enum Payload {
    /// No content; emit 204.
    Empty,
    /// A JSON payload for the data envelope.
    Data(Value),
    /// A verbatim payload with a caller-chosen content type.
    Custom {
        /// Content type to emit.
        content_type: String,
        /// The payload, passed through untouched.
        data: Value,
    },
}

pub(crate) fn emit_success(
    config: &PipelineConfig,
    request: &ApiRequest,
    ctx: &RequestContext,
    payload: Payload,
    deprecated: bool,
) -> ApiResponse {
    match payload {
        Payload::Empty => ApiResponse::no_content(),
        Payload::Custom { content_type, data } => ApiResponse {
            status: StatusCode::OK,
            headers: http::HeaderMap::new(),
            content_type,
            body: Some(data),
        },
        Payload::Data(data) => {
            let mut body = Map::new();
            body.insert(config.data_key.clone(), data);
            if deprecated {
                body.insert(
                    "warning".to_string(),
                    Value::String("This endpoint is deprecated.".to_string()),
                );
            }
            if meta_enabled(config, request) {
                body.insert(
                    "_meta".to_string(),
                    meta_block(config, request, ctx, deprecated),
                );
            }
            ApiResponse::json(StatusCode::OK, Value::Object(body))
        }
    }
}

pub(crate) fn emit_error(
    config: &PipelineConfig,
    request: &ApiRequest,
    ctx: &RequestContext,
    error: &ApiError,
    deprecated: bool,
) -> ApiResponse {
    let mut body = Map::new();
    body.insert(
        config.error_key.clone(),
        error.to_body(config.expose_internal_errors),
    );
    if meta_enabled(config, request) {
        body.insert(
            "_meta".to_string(),
            meta_block(config, request, ctx, deprecated),
        );
    }
    ApiResponse::json(error.status_code(), Value::Object(body))
}

fn meta_enabled(config: &PipelineConfig, request: &ApiRequest) -> bool {
    config.meta && !request.has_query_flag("nometa")
}

fn meta_block(
    config: &PipelineConfig,
    request: &ApiRequest,
    ctx: &RequestContext,
    deprecated: bool,
) -> Value {
    let headers: IndexMap<String, String> = request
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    json!({
        "app": {
            "name": config.app_name,
            "version": config.app_version,
        },
        "request_id": ctx.request_id().to_string(),
        "duration_ms": u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "request": {
            "method": request.method.as_str(),
            "path": request.path,
            "query": serde_json::to_value(&request.query).unwrap_or(Value::Null),
            "body": echo_body(config, &request.body),
            "headers": serde_json::to_value(&headers).unwrap_or(Value::Null),
        },
        "deprecated": deprecated,
    })
}

fn echo_body(config: &PipelineConfig, body: &Value) -> Value {
    if body.is_null() {
        return Value::Null;
    }
    let serialized_len = body.to_string().len();
    if serialized_len > config.meta_body_limit {
        Value::String(format!("[{serialized_len} bytes omitted]"))
    } else {
        body.clone()
    }
}
