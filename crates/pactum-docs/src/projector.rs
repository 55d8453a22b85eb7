//! Contract-to-document projection.
//!
//! [`project`] walks every non-hidden endpoint of a [`RouteRegistry`] and
//! produces a machine-readable [`Documentation`] value: one entry per
//! endpoint keyed `"{METHOD} {external-path}"`, carrying the declared
//! arguments, parameters (with nested shapes serialized recursively),
//! response contract, documented error codes and the deprecation flag.

use indexmap::IndexMap;
use pactum_core::{ApiParam, Field, Param, ShapeEntry};
use pactum_router::{AuthMode, Endpoint, ResponseContract, Route, RouteRegistry};
use serde::Serialize;
use serde_json::Value;

/// The projected documentation for a whole registry.
///
/// Serializes as a flat object keyed by `"{METHOD} {path}"`.
#[derive(Debug, Clone, Serialize)]
pub struct Documentation {
    /// One entry per documented endpoint.
    #[serde(flatten)]
    pub endpoints: IndexMap<String, EndpointDoc>,
}

impl Documentation {
    /// Serializes the documentation to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The projected documentation of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDoc {
    /// Endpoint description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path arguments keyed by name.
    pub args: IndexMap<String, FieldDoc>,
    /// Parameters keyed by name.
    pub params: IndexMap<String, FieldDoc>,
    /// Names of required parameters (back-compat list).
    pub required_params: Vec<String>,
    /// Whether the endpoint requires authorization.
    pub required_auth: bool,
    /// Response fields keyed by name; `null` for no-content and verbatim
    /// responses.
    pub response: Option<IndexMap<String, FieldDoc>>,
    /// Content type of the response body.
    pub response_type: String,
    /// Documented error codes mapped to their descriptions.
    pub errors: IndexMap<String, Option<String>>,
    /// Whether the endpoint is deprecated, explicitly or by a newer
    /// version existing.
    pub deprecated: bool,
}

/// The projected documentation of one field, parameter or nested shape.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDoc {
    /// Wire-side name.
    pub name: String,
    /// Handler-side key.
    pub key: String,
    /// Canonical type string; absent on shape entries, which carry their
    /// structure in `shape`/`shape_array` instead.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag; absent on plain fields, which carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Child docs of a nested shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<IndexMap<String, FieldDoc>>,
    /// Child docs of a nested shape array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_array: Option<IndexMap<String, FieldDoc>>,
}

impl FieldDoc {
    fn scalar(name: &str, key: &str, type_name: String, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            type_name: Some(type_name),
            description: description.map(ToString::to_string),
            required: None,
            shape: None,
            shape_array: None,
        }
    }
}

/// Projects the whole registry into a documentation value.
#[must_use]
pub fn project(registry: &RouteRegistry) -> Documentation {
    let mut endpoints = IndexMap::new();

    for route in registry.routes() {
        for endpoint in route.endpoints() {
            if endpoint.hide_docs() {
                continue;
            }
            let key = format!("{} {}", route.method(), endpoint.external_path());
            endpoints.insert(key, endpoint_doc(route, endpoint));
        }
    }

    Documentation { endpoints }
}

fn endpoint_doc(route: &Route, endpoint: &Endpoint) -> EndpointDoc {
    let args = endpoint
        .args()
        .iter()
        .map(|field| (field.name.clone(), field_doc(field)))
        .collect();

    let params: IndexMap<String, FieldDoc> = endpoint
        .params()
        .iter()
        .map(|param| (param.name().to_string(), param_doc(param)))
        .collect();

    let required_params = endpoint
        .params()
        .iter()
        .filter(|p| p.is_required())
        .map(|p| p.name().to_string())
        .collect();

    let (response, response_type) = match endpoint.response() {
        Some(ResponseContract::Fields(fields)) => (
            Some(
                fields
                    .iter()
                    .map(|field| (field.name.clone(), field_doc(field)))
                    .collect(),
            ),
            "application/json".to_string(),
        ),
        Some(ResponseContract::Custom { content_type }) => (None, content_type.clone()),
        Some(ResponseContract::NoContent) | None => (None, "application/json".to_string()),
    };

    let errors = endpoint
        .errors()
        .iter()
        .map(|e| (e.code.clone(), e.description.clone()))
        .collect();

    EndpointDoc {
        description: endpoint.description().map(ToString::to_string),
        args,
        params,
        required_params,
        required_auth: endpoint.auth() == AuthMode::Required,
        response,
        response_type,
        errors,
        deprecated: route.is_deprecated(endpoint),
    }
}

fn field_doc(field: &Field) -> FieldDoc {
    FieldDoc::scalar(
        &field.name,
        &field.key,
        field.value_type.to_string(),
        field.description.as_deref(),
    )
}

fn param_doc(param: &ApiParam) -> FieldDoc {
    match param {
        ApiParam::Plain(p) => plain_param_doc(p),
        ApiParam::Shape(shape) => FieldDoc {
            name: shape.name.clone(),
            key: shape.name.clone(),
            type_name: None,
            description: shape.description.clone(),
            required: Some(shape.required),
            shape: Some(entry_docs(shape.entries())),
            shape_array: None,
        },
        ApiParam::ShapeArray(array) => FieldDoc {
            name: array.name.clone(),
            key: array.name.clone(),
            type_name: None,
            description: array.description.clone(),
            required: Some(array.required),
            shape: None,
            shape_array: Some(entry_docs(array.shape().entries())),
        },
    }
}

fn plain_param_doc(param: &Param) -> FieldDoc {
    let mut doc = field_doc(&param.field);
    doc.required = Some(param.required);
    doc
}

fn entry_docs(entries: &[ShapeEntry]) -> IndexMap<String, FieldDoc> {
    entries
        .iter()
        .map(|entry| (entry.name().to_string(), entry_doc(entry)))
        .collect()
}

fn entry_doc(entry: &ShapeEntry) -> FieldDoc {
    match entry {
        ShapeEntry::Field(field) => field_doc(field),
        ShapeEntry::Param(param) => plain_param_doc(param),
        ShapeEntry::Shape(shape) => FieldDoc {
            name: shape.name.clone(),
            key: shape.name.clone(),
            type_name: None,
            description: shape.description.clone(),
            required: Some(shape.required),
            shape: Some(entry_docs(shape.entries())),
            shape_array: None,
        },
        ShapeEntry::ShapeArray(array) => FieldDoc {
            name: array.name.clone(),
            key: array.name.clone(),
            type_name: None,
            description: array.description.clone(),
            required: Some(array.required),
            shape: None,
            shape_array: Some(entry_docs(array.shape().entries())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use pactum_core::{
        ApiResult, ErrorField, FnHandler, Param, ParamSpec, Shape, ValueType,
    };
    use serde_json::{json, Value};

    fn noop_endpoint() -> pactum_router::EndpointBuilder {
        Endpoint::builder().handler(FnHandler::new(|_ctx| async move {
            ApiResult::Ok(Value::Null)
        }))
    }

    #[test]
    fn test_projection_key_and_fields() {
        let mut registry = RouteRegistry::new();
        registry.add(
            Method::GET,
            "/users/:id",
            noop_endpoint()
                .version(1)
                .description("Fetch one user")
                .arg(Field::new("id", ValueType::Integer))
                .param(ParamSpec::from(Param::required(
                    Field::new("verbose", ValueType::Boolean).with_description("Include extras"),
                )))
                .response(vec![Field::new("id", ValueType::Integer)])
                .error(ErrorField::new("ERR_USER_NOT_FOUND", "No such user"))
                .build()
                .unwrap(),
        );

        let docs = project(&registry).to_value();
        let entry = &docs["GET /1/users/:id"];

        assert_eq!(entry["description"], "Fetch one user");
        assert_eq!(entry["args"]["id"]["type"], "integer");
        assert_eq!(entry["params"]["verbose"]["required"], true);
        assert_eq!(entry["params"]["verbose"]["description"], "Include extras");
        assert_eq!(entry["required_params"], json!(["verbose"]));
        assert_eq!(entry["required_auth"], false);
        assert_eq!(entry["response"]["id"]["type"], "integer");
        assert_eq!(entry["response_type"], "application/json");
        assert_eq!(entry["errors"]["ERR_USER_NOT_FOUND"], "No such user");
        assert_eq!(entry["deprecated"], false);
    }

    #[test]
    fn test_older_version_marked_deprecated() {
        let mut registry = RouteRegistry::new();
        registry.add(Method::GET, "/users", noop_endpoint().version(0).build().unwrap());
        registry.add(Method::GET, "/users", noop_endpoint().version(1).build().unwrap());

        let docs = project(&registry).to_value();
        assert_eq!(docs["GET /0/users"]["deprecated"], true);
        assert_eq!(docs["GET /1/users"]["deprecated"], false);
    }

    #[test]
    fn test_hidden_endpoints_are_skipped() {
        let mut registry = RouteRegistry::new();
        registry.add(Method::GET, "/internal", noop_endpoint().hide_docs().build().unwrap());
        registry.add(Method::GET, "/public", noop_endpoint().build().unwrap());

        let docs = project(&registry);
        assert_eq!(docs.endpoints.len(), 1);
        assert!(docs.endpoints.contains_key("GET /public"));
    }

    #[test]
    fn test_nested_shape_serializes_recursively() {
        let inner = Shape::new(
            "range",
            false,
            vec![pactum_core::ShapeEntry::from(Field::new(
                "from",
                ValueType::Date,
            ))],
        );
        let filter = Shape::new(
            "filter",
            true,
            vec![
                pactum_core::ShapeEntry::from(Field::new("status", ValueType::String)),
                pactum_core::ShapeEntry::from(inner),
            ],
        );

        let mut registry = RouteRegistry::new();
        registry.add(
            Method::POST,
            "/search",
            noop_endpoint().param(ParamSpec::from(filter)).build().unwrap(),
        );

        let docs = project(&registry).to_value();
        let param = &docs["POST /search"]["params"]["filter"];

        assert_eq!(param["required"], true);
        assert!(param.get("type").is_none());
        assert_eq!(param["shape"]["status"]["type"], "string");
        assert_eq!(param["shape"]["status"]["required"], true);
        assert_eq!(param["shape"]["range"]["shape"]["from"]["type"], "date");
    }

    #[test]
    fn test_no_content_and_custom_responses() {
        let mut registry = RouteRegistry::new();
        registry.add(Method::DELETE, "/users/:id", noop_endpoint().no_content().build().unwrap());
        registry.add(
            Method::GET,
            "/report",
            noop_endpoint().custom_response("text/csv").build().unwrap(),
        );

        let docs = project(&registry).to_value();
        assert_eq!(docs["DELETE /users/:id"]["response"], Value::Null);
        assert_eq!(docs["GET /report"]["response"], Value::Null);
        assert_eq!(docs["GET /report"]["response_type"], "text/csv");
    }
}
