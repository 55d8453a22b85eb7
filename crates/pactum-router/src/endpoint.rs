//! Versioned endpoint definitions.
//!
//! An [`Endpoint`] is one versioned handler together with its full
//! contract: parameters, response contract, documented errors, auth and
//! API-key requirements, timeout and docs metadata. Endpoints are built
//! through [`EndpointBuilder`], a single explicit configuration surface;
//! there are no positional registration overloads.
//!
//! Endpoints are created at registration time and mutated only through
//! [`Endpoint::deprecate`] / [`Endpoint::set_docs`] before the application
//! starts serving; the pipeline treats them as read-only.

use pactum_core::{
    parse_params, ApiParam, ErrorField, Field, FieldSpecError, Handler, ParamSpec,
};
use http::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error produced while resolving an endpoint declaration.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// A parameter or argument declaration failed to resolve.
    #[error(transparent)]
    Field(#[from] FieldSpecError),
}

/// Authorization requirement of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authorization; the auth gate is skipped.
    #[default]
    Disabled,
    /// The auth function runs but its failure is tolerated; the request
    /// continues anonymously.
    Optional,
    /// The auth function runs and its failure fails the request.
    Required,
}

/// The declared response contract of an endpoint.
#[derive(Debug, Clone)]
pub enum ResponseContract {
    /// Field-by-field shaping: each declared field is validated and cast
    /// from the handler payload.
    Fields(Vec<Field>),
    /// Always respond 204 with no body.
    NoContent,
    /// Pass the handler payload through verbatim with the given content
    /// type; shaping is bypassed entirely.
    Custom {
        /// Content type emitted with the body.
        content_type: String,
    },
}

/// One versioned method+path handler with its full contract.
pub struct Endpoint {
    version: Option<u32>,
    auth: AuthMode,
    params: Vec<ApiParam>,
    response: Option<ResponseContract>,
    errors: Vec<ErrorField>,
    description: Option<String>,
    hide_docs: bool,
    deprecated: bool,
    api_key: Option<bool>,
    excluded_api_keys: Vec<String>,
    timeout: Option<Duration>,
    props: Map<String, Value>,
    args: Vec<Field>,
    handler: Arc<dyn Handler>,
    // Bound by the registry at registration time.
    method: Method,
    route: String,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("version", &self.version)
            .field("auth", &self.auth)
            .field("deprecated", &self.deprecated)
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    /// Creates a new endpoint builder.
    #[must_use]
    pub fn builder() -> EndpointBuilder {
        EndpointBuilder::new()
    }

    /// Returns the version, `None` for an unversioned endpoint.
    #[must_use]
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Returns the authorization requirement.
    #[must_use]
    pub fn auth(&self) -> AuthMode {
        self.auth
    }

    /// Returns the declared parameters (flattened, no dotted entries).
    #[must_use]
    pub fn params(&self) -> &[ApiParam] {
        &self.params
    }

    /// Returns the response contract, `None` when undeclared (payload
    /// passes through unshaped).
    #[must_use]
    pub fn response(&self) -> Option<&ResponseContract> {
        self.response.as_ref()
    }

    /// Returns the documented error codes.
    #[must_use]
    pub fn errors(&self) -> &[ErrorField] {
        &self.errors
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the endpoint is hidden from documentation.
    #[must_use]
    pub fn hide_docs(&self) -> bool {
        self.hide_docs
    }

    /// Whether the endpoint was explicitly deprecated.
    ///
    /// An endpoint is also implicitly deprecated when a newer version of
    /// its route exists; that is the route's call to make, see
    /// [`Route::is_deprecated`](crate::Route::is_deprecated).
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the per-endpoint API-key override (`None` = app default).
    #[must_use]
    pub fn api_key(&self) -> Option<bool> {
        self.api_key
    }

    /// Returns the keys accepted without running the validator.
    #[must_use]
    pub fn excluded_api_keys(&self) -> &[String] {
        &self.excluded_api_keys
    }

    /// Returns the per-endpoint handler timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the free-form props.
    #[must_use]
    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    /// Returns the effective path arguments (route tokens merged with
    /// explicit overrides; populated at registration).
    #[must_use]
    pub fn args(&self) -> &[Field] {
        &self.args
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Returns the HTTP method (bound at registration).
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the route pattern (bound at registration).
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the externally visible path: `/{version}{route}`, or the
    /// bare route for an unversioned endpoint.
    #[must_use]
    pub fn external_path(&self) -> String {
        match self.version {
            Some(v) => format!("/{v}{}", self.route),
            None => self.route.clone(),
        }
    }

    /// Flags the endpoint as deprecated.
    pub fn deprecate(&mut self) {
        self.deprecated = true;
    }

    /// Updates docs metadata.
    pub fn set_docs(&mut self, description: impl Into<String>, hide: bool) {
        self.description = Some(description.into());
        self.hide_docs = hide;
    }

    pub(crate) fn bind(&mut self, method: Method, route: &str) {
        self.method = method;
        self.route = route.to_string();
    }

    pub(crate) fn set_args(&mut self, args: Vec<Field>) {
        self.args = args;
    }

    pub(crate) fn declared_args(&self) -> &[Field] {
        &self.args
    }
}

/// Builder for [`Endpoint`]: the explicit registration configuration.
///
/// # Example
///
/// ```ignore
/// let endpoint = Endpoint::builder()
///     .version(1)
///     .description("Fetch one user")
///     .param(Param::required(Field::new("verbose", ValueType::Boolean)))
///     .response(vec![Field::new("id", ValueType::Integer)])
///     .error(ErrorField::new("ERR_USER_NOT_FOUND", "No such user"))
///     .handler(FnHandler::new(get_user))
///     .build()?;
/// ```
pub struct EndpointBuilder {
    version: Option<u32>,
    auth: AuthMode,
    params: Vec<ParamSpec>,
    response: Option<ResponseContract>,
    errors: Vec<ErrorField>,
    description: Option<String>,
    hide_docs: bool,
    api_key: Option<bool>,
    excluded_api_keys: Vec<String>,
    timeout: Option<Duration>,
    props: Map<String, Value>,
    args: Vec<Field>,
    handler: Option<Arc<dyn Handler>>,
}

impl EndpointBuilder {
    /// Creates a builder with no version, no auth and no contract.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: None,
            auth: AuthMode::Disabled,
            params: Vec::new(),
            response: None,
            errors: Vec::new(),
            description: None,
            hide_docs: false,
            api_key: None,
            excluded_api_keys: Vec::new(),
            timeout: None,
            props: Map::new(),
            args: Vec::new(),
            handler: None,
        }
    }

    /// Sets the numeric version.
    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the authorization requirement.
    #[must_use]
    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Marks authorization as required.
    #[must_use]
    pub fn require_auth(mut self) -> Self {
        self.auth = AuthMode::Required;
        self
    }

    /// Adds one parameter declaration.
    #[must_use]
    pub fn param(mut self, param: impl Into<ParamSpec>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Adds a list of parameter declarations.
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    /// Declares a field-by-field response contract.
    #[must_use]
    pub fn response(mut self, fields: Vec<Field>) -> Self {
        self.response = Some(ResponseContract::Fields(fields));
        self
    }

    /// Declares a no-content response.
    #[must_use]
    pub fn no_content(mut self) -> Self {
        self.response = Some(ResponseContract::NoContent);
        self
    }

    /// Declares a verbatim response with a caller-chosen content type.
    #[must_use]
    pub fn custom_response(mut self, content_type: impl Into<String>) -> Self {
        self.response = Some(ResponseContract::Custom {
            content_type: content_type.into(),
        });
        self
    }

    /// Documents one error code.
    #[must_use]
    pub fn error(mut self, error: impl Into<ErrorField>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Documents a list of error codes.
    #[must_use]
    pub fn errors(mut self, errors: impl IntoIterator<Item = ErrorField>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Hides the endpoint from documentation.
    #[must_use]
    pub fn hide_docs(mut self) -> Self {
        self.hide_docs = true;
        self
    }

    /// Overrides the app-level API-key requirement for this endpoint.
    #[must_use]
    pub fn api_key(mut self, enabled: bool) -> Self {
        self.api_key = Some(enabled);
        self
    }

    /// Accepts the given key without running the validator.
    #[must_use]
    pub fn exclude_api_key(mut self, key: impl Into<String>) -> Self {
        self.excluded_api_keys.push(key.into());
        self
    }

    /// Sets the handler timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a free-form prop.
    #[must_use]
    pub fn prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    /// Overrides the type of one path argument.
    #[must_use]
    pub fn arg(mut self, field: Field) -> Self {
        self.args.push(field);
        self
    }

    /// Sets the handler.
    #[must_use]
    pub fn handler<H: Handler>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Builds the endpoint, resolving the parameter declarations.
    ///
    /// # Panics
    ///
    /// Panics if no handler was set.
    pub fn build(self) -> Result<Endpoint, EndpointError> {
        let params = parse_params(self.params)?;
        Ok(Endpoint {
            version: self.version,
            auth: self.auth,
            params,
            response: self.response,
            errors: self.errors,
            description: self.description,
            hide_docs: self.hide_docs,
            deprecated: false,
            api_key: self.api_key,
            excluded_api_keys: self.excluded_api_keys,
            timeout: self.timeout,
            props: self.props,
            args: self.args,
            handler: self.handler.expect("handler is required"),
            method: Method::GET,
            route: String::new(),
        })
    }
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pactum_core::{ApiResult, FnHandler, Param, ValueType};
    use serde_json::{json, Value};

    fn noop() -> impl Handler {
        FnHandler::new(|_ctx| async move { ApiResult::Ok(Value::Null) })
    }

    #[test]
    fn test_builder_defaults() {
        let endpoint = Endpoint::builder().handler(noop()).build().unwrap();
        assert_eq!(endpoint.version(), None);
        assert_eq!(endpoint.auth(), AuthMode::Disabled);
        assert!(!endpoint.is_deprecated());
        assert!(!endpoint.hide_docs());
        assert!(endpoint.response().is_none());
    }

    #[test]
    fn test_builder_full_contract() {
        let endpoint = Endpoint::builder()
            .version(2)
            .require_auth()
            .description("List users")
            .param(Param::required(Field::new("limit", ValueType::Integer)))
            .param("q")
            .response(vec![Field::new("total", ValueType::Integer)])
            .error(ErrorField::new("ERR_USER_NOT_FOUND", "No such user"))
            .timeout(Duration::from_millis(500))
            .exclude_api_key("internal-probe")
            .prop("team", json!("identity"))
            .handler(noop())
            .build()
            .unwrap();

        assert_eq!(endpoint.version(), Some(2));
        assert_eq!(endpoint.auth(), AuthMode::Required);
        assert_eq!(endpoint.params().len(), 2);
        assert_eq!(endpoint.errors().len(), 1);
        assert_eq!(endpoint.timeout(), Some(Duration::from_millis(500)));
        assert_eq!(endpoint.excluded_api_keys(), ["internal-probe"]);
        assert_eq!(endpoint.props().get("team"), Some(&json!("identity")));
    }

    #[test]
    fn test_dotted_params_resolve_at_build() {
        let endpoint = Endpoint::builder()
            .param("filter")
            .param("filter.status")
            .handler(noop())
            .build()
            .unwrap();

        assert_eq!(endpoint.params().len(), 1);
        assert_eq!(endpoint.params()[0].name(), "filter");
        assert!(endpoint.params()[0].is_required());
    }

    #[test]
    fn test_external_path() {
        let mut versioned = Endpoint::builder().version(1).handler(noop()).build().unwrap();
        versioned.bind(Method::GET, "/users/:id");
        assert_eq!(versioned.external_path(), "/1/users/:id");

        let mut bare = Endpoint::builder().handler(noop()).build().unwrap();
        bare.bind(Method::GET, "/status");
        assert_eq!(bare.external_path(), "/status");
    }

    #[test]
    fn test_deprecate_and_set_docs() {
        let mut endpoint = Endpoint::builder().handler(noop()).build().unwrap();
        endpoint.deprecate();
        endpoint.set_docs("Old list endpoint", true);

        assert!(endpoint.is_deprecated());
        assert!(endpoint.hide_docs());
        assert_eq!(endpoint.description(), Some("Old list endpoint"));
    }
}
