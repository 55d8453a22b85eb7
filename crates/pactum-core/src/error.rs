//! Error types for Pactum.
//!
//! This module provides [`ApiError`], the single error type every pipeline
//! stage reports through. Each variant carries a fixed, stable wire code and
//! HTTP status; there is no open-ended error hierarchy. Handlers that need a
//! bespoke status or payload use [`ApiError::Custom`].
//!
//! The wire codes are a compatibility contract and must not change:
//!
//! | Variant | Code | Status |
//! |---|---|---|
//! | `MissingParameter` | `ERR_MISSING_PARAMETER` | 400 |
//! | `InvalidParameterType` | `ERR_INVALID_TYPE` | 400 |
//! | `InvalidArgumentType` | `ERR_INVALID_TYPE` | 400 |
//! | `MissingApiKey` | `ERR_MISSING_API_KEY` | 403 |
//! | `InvalidApiKey` | `ERR_INVALID_API_KEY` | 403 |
//! | `MissingAccessToken` | `ERR_MISSING_ACCESS_TOKEN` | 401 |
//! | `InvalidAccessToken` | `ERR_INVALID_ACCESS_TOKEN` | 401 |
//! | `PageNotFound` | `ERR_PAGE_NOT_FOUND` | 404 |
//! | `RequestTimeout` | `ERR_REQUEST_TIMEOUT` | 408 |
//! | `Internal` | `ERR_INTERNAL_SERVER_ERROR` | 500 |

use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// The closed error type for the contract layer.
///
/// Every stage of the request pipeline communicates failure through this one
/// type, and the emission boundary matches on it exhaustively. Note that both
/// parameter and argument type failures share the `ERR_INVALID_TYPE` code;
/// they are distinguished only by the `Parameter`/`Argument` message prefix.
///
/// # Example
///
/// ```
/// use pactum_core::ApiError;
///
/// let err = ApiError::missing_parameter("email");
/// assert_eq!(err.code(), "ERR_MISSING_PARAMETER");
/// assert_eq!(err.status_code().as_u16(), 400);
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required parameter was absent from the merged query/body source.
    #[error("Parameter '{name}' is missing.")]
    MissingParameter {
        /// The declared parameter name.
        name: String,
    },

    /// A parameter value failed validation against its declared type.
    #[error("Parameter '{name}' has invalid type. It should be '{expected}'.")]
    InvalidParameterType {
        /// The declared parameter name.
        name: String,
        /// The canonical string form of the expected type.
        expected: String,
    },

    /// A path argument failed validation against its declared type.
    #[error("Argument '{name}' has invalid type. It should be '{expected}'.")]
    InvalidArgumentType {
        /// The declared argument name.
        name: String,
        /// The canonical string form of the expected type.
        expected: String,
    },

    /// No API key was supplied to an endpoint that requires one.
    #[error("API key is missing.")]
    MissingApiKey,

    /// The supplied API key was rejected by the validator.
    #[error("API key is invalid.")]
    InvalidApiKey,

    /// No access token was supplied to an endpoint requiring authorization.
    #[error("Access token is missing.")]
    MissingAccessToken,

    /// The supplied access token was rejected.
    #[error("Access token is invalid.")]
    InvalidAccessToken,

    /// No endpoint matched the request method and path.
    #[error("Page not found.")]
    PageNotFound,

    /// The handler did not complete within the configured timeout.
    #[error("Request timed out.")]
    RequestTimeout,

    /// An unclassified failure; the original message is preserved.
    #[error("{message}")]
    Internal {
        /// Human-readable message, surfaced verbatim to the caller.
        message: String,
        /// The underlying error chain, attached to the body only when
        /// stack exposure is enabled.
        source: Option<anyhow::Error>,
    },

    /// A handler-supplied error with a caller-chosen status, code and
    /// optional extra payload merged into the error body.
    #[error("{message}")]
    Custom {
        /// HTTP status to emit.
        status: u16,
        /// Wire code to emit.
        code: String,
        /// Human-readable message.
        message: String,
        /// Extra fields merged into the error body.
        payload: Option<Map<String, Value>>,
    },
}

impl ApiError {
    /// Creates a missing-parameter error.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates an invalid-parameter-type error.
    #[must_use]
    pub fn invalid_parameter_type(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidParameterType {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Creates an invalid-argument-type error.
    #[must_use]
    pub fn invalid_argument_type(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArgumentType {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Creates an internal error with a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a custom error with a caller-chosen status and code.
    #[must_use]
    pub fn custom(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            status,
            code: code.into(),
            message: message.into(),
            payload: None,
        }
    }

    /// Creates a custom error carrying extra payload fields.
    #[must_use]
    pub fn custom_with_payload(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self::Custom {
            status,
            code: code.into(),
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Returns the stable wire code for this error.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingParameter { .. } => "ERR_MISSING_PARAMETER",
            Self::InvalidParameterType { .. } | Self::InvalidArgumentType { .. } => {
                "ERR_INVALID_TYPE"
            }
            Self::MissingApiKey => "ERR_MISSING_API_KEY",
            Self::InvalidApiKey => "ERR_INVALID_API_KEY",
            Self::MissingAccessToken => "ERR_MISSING_ACCESS_TOKEN",
            Self::InvalidAccessToken => "ERR_INVALID_ACCESS_TOKEN",
            Self::PageNotFound => "ERR_PAGE_NOT_FOUND",
            Self::RequestTimeout => "ERR_REQUEST_TIMEOUT",
            Self::Internal { .. } => "ERR_INTERNAL_SERVER_ERROR",
            Self::Custom { code, .. } => code,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. }
            | Self::InvalidParameterType { .. }
            | Self::InvalidArgumentType { .. } => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::InvalidApiKey => StatusCode::FORBIDDEN,
            Self::MissingAccessToken | Self::InvalidAccessToken => StatusCode::UNAUTHORIZED,
            Self::PageNotFound => StatusCode::NOT_FOUND,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Builds the `{ message, code, ... }` error body.
    ///
    /// Extra payload fields of [`ApiError::Custom`] are merged in alongside
    /// `message` and `code`. The source chain of an [`ApiError::Internal`] is
    /// attached under `stack` only when `expose_internal` is set.
    #[must_use]
    pub fn to_body(&self, expose_internal: bool) -> Value {
        let mut body = Map::new();
        body.insert("message".to_string(), Value::String(self.to_string()));
        body.insert("code".to_string(), Value::String(self.code().to_string()));

        if let Self::Custom {
            payload: Some(extra),
            ..
        } = self
        {
            for (k, v) in extra {
                body.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }

        if expose_internal {
            if let Self::Internal {
                source: Some(source),
                ..
            } = self
            {
                body.insert("stack".to_string(), Value::String(format!("{source:?}")));
            }
        }

        Value::Object(body)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let message = err.to_string();
        Self::Internal {
            message,
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_codes() {
        let cases: Vec<(ApiError, &str, u16)> = vec![
            (ApiError::missing_parameter("x"), "ERR_MISSING_PARAMETER", 400),
            (
                ApiError::invalid_parameter_type("x", "integer"),
                "ERR_INVALID_TYPE",
                400,
            ),
            (
                ApiError::invalid_argument_type("x", "integer"),
                "ERR_INVALID_TYPE",
                400,
            ),
            (ApiError::MissingApiKey, "ERR_MISSING_API_KEY", 403),
            (ApiError::InvalidApiKey, "ERR_INVALID_API_KEY", 403),
            (ApiError::MissingAccessToken, "ERR_MISSING_ACCESS_TOKEN", 401),
            (ApiError::InvalidAccessToken, "ERR_INVALID_ACCESS_TOKEN", 401),
            (ApiError::PageNotFound, "ERR_PAGE_NOT_FOUND", 404),
            (ApiError::RequestTimeout, "ERR_REQUEST_TIMEOUT", 408),
            (ApiError::internal("boom"), "ERR_INTERNAL_SERVER_ERROR", 500),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_parameter_and_argument_messages() {
        let err = ApiError::invalid_parameter_type("age", "integer");
        assert_eq!(
            err.to_string(),
            "Parameter 'age' has invalid type. It should be 'integer'."
        );

        let err = ApiError::invalid_argument_type("id", "integer");
        assert_eq!(
            err.to_string(),
            "Argument 'id' has invalid type. It should be 'integer'."
        );

        let err = ApiError::missing_parameter("email");
        assert_eq!(err.to_string(), "Parameter 'email' is missing.");
    }

    #[test]
    fn test_custom_error_payload_merged() {
        let mut payload = Map::new();
        payload.insert("hint".to_string(), Value::String("retry later".to_string()));
        let err = ApiError::custom_with_payload(409, "ERR_CONFLICT", "Already exists.", payload);

        assert_eq!(err.status_code().as_u16(), 409);
        let body = err.to_body(false);
        assert_eq!(body["code"], "ERR_CONFLICT");
        assert_eq!(body["message"], "Already exists.");
        assert_eq!(body["hint"], "retry later");
    }

    #[test]
    fn test_custom_payload_cannot_override_code() {
        let mut payload = Map::new();
        payload.insert("code".to_string(), Value::String("SPOOFED".to_string()));
        let err = ApiError::custom_with_payload(400, "ERR_REAL", "msg", payload);

        let body = err.to_body(false);
        assert_eq!(body["code"], "ERR_REAL");
    }

    #[test]
    fn test_internal_stack_only_when_exposed() {
        let source = anyhow::anyhow!("database unreachable");
        let err = ApiError::internal_with_source("boom", source);

        let hidden = err.to_body(false);
        assert!(hidden.get("stack").is_none());

        let exposed = err.to_body(true);
        assert!(exposed.get("stack").is_some());
    }

    #[test]
    fn test_internal_preserves_message() {
        let err: ApiError = anyhow::anyhow!("handler exploded").into();
        assert_eq!(err.to_string(), "handler exploded");
        assert_eq!(err.code(), "ERR_INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_custom_invalid_status_falls_back() {
        let err = ApiError::custom(19, "ERR_WEIRD", "odd");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
