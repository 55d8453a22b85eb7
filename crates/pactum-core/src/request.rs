//! Request and response carriers.
//!
//! The embedding HTTP server decodes the wire request (query string, body,
//! compression) and hands the pipeline an [`ApiRequest`]; the pipeline hands
//! back an [`ApiResponse`] for the server to serialize. Neither type touches
//! sockets.

use http::{HeaderMap, Method, StatusCode};
use indexmap::IndexMap;
use serde_json::Value;

/// A decoded incoming request.
///
/// # Example
///
/// ```
/// use pactum_core::ApiRequest;
/// use http::Method;
/// use serde_json::json;
///
/// let request = ApiRequest::new(Method::POST, "/1/users")
///     .with_body(json!({"name": "Alice"}))
///     .with_header("content-type", "application/json");
/// assert_eq!(request.path, "/1/users");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, without query string.
    pub path: String,
    /// Decoded query parameters.
    pub query: IndexMap<String, Value>,
    /// Decoded body; `Null` when absent.
    pub body: Value,
    /// Request headers.
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a request with an empty query, body and header set.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: IndexMap::new(),
            body: Value::Null,
            headers: HeaderMap::new(),
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sets the decoded body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Adds a header; silently ignored if the name or value is malformed.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether a query flag is present (any value counts).
    #[must_use]
    pub fn has_query_flag(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }
}

/// An outgoing response ready for the transport layer.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers; after-hooks may append here.
    pub headers: HeaderMap,
    /// Content type of the body; meaningless when the body is absent.
    pub content_type: String,
    /// The response body; `None` means no content.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Creates a JSON response.
    #[must_use]
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content_type: "application/json".to_string(),
            body: Some(body),
        }
    }

    /// Creates an empty 204 response.
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            content_type: "application/json".to_string(),
            body: None,
        }
    }

    /// Inserts a header; silently ignored if the name or value is malformed.
    pub fn insert_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::header::HeaderName>(),
            value.parse::<http::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new(Method::GET, "/users")
            .with_query("limit", "10")
            .with_header("x-api-key", "secret");

        assert_eq!(request.query.get("limit"), Some(&json!("10")));
        assert_eq!(request.header("x-api-key"), Some("secret"));
        assert!(request.body.is_null());
    }

    #[test]
    fn test_query_flag() {
        let request = ApiRequest::new(Method::GET, "/users").with_query("nometa", "");
        assert!(request.has_query_flag("nometa"));
        assert!(!request.has_query_flag("meta"));
    }

    #[test]
    fn test_no_content_response() {
        let response = ApiResponse::no_content();
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_response_headers() {
        let mut response = ApiResponse::json(StatusCode::OK, json!({"ok": true}));
        response.insert_header("x-request-cost", "3");
        assert_eq!(response.headers.get("x-request-cost").unwrap(), "3");

        // Malformed names are dropped rather than panicking.
        response.insert_header("bad header", "x");
        assert!(response.headers.get("bad header").is_none());
    }
}
