//! Fields and parameters.
//!
//! A [`Field`] is the named, typed, described unit that endpoint contracts
//! are assembled from: path arguments, response entries and shape children
//! are all fields. A [`Param`] is a field with a required flag, used for
//! query/body parameters. Both are immutable once constructed.

use crate::types::{TypeParseError, ValueType};
use serde::Serialize;
use thiserror::Error;

/// Error produced while resolving a field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSpecError {
    /// The declared name contains a dot, i.e. it addresses a field of a
    /// shape rather than naming a field itself. The parameter parser catches
    /// this variant to collect legacy dotted declarations.
    #[error("'{root}.{field}' addresses a field of shape '{root}'")]
    DottedName {
        /// The shape-root part before the first dot.
        root: String,
        /// The remainder after the first dot.
        field: String,
    },

    /// The declared type shorthand did not resolve.
    #[error(transparent)]
    Type(#[from] TypeParseError),
}

/// A named, typed, described contract unit.
///
/// `name` is the wire-side spelling; `key` is the handler-side spelling and
/// defaults to `name`. The two diverge only for backward-compatible renames.
///
/// # Example
///
/// ```
/// use pactum_core::{Field, ValueType};
///
/// let field = Field::new("userId", ValueType::Integer)
///     .with_description("Numeric user identifier");
/// assert_eq!(field.key, "userId");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Handler-side name; defaults to `name`.
    pub key: String,
    /// Wire-side name.
    pub name: String,
    /// The resolved type descriptor.
    #[serde(skip)]
    pub value_type: ValueType,
    /// Human-readable description for documentation.
    pub description: Option<String>,
}

impl Field {
    /// Creates a field with a resolved type descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            value_type,
            description: None,
        }
    }

    /// Creates a field from a string type shorthand.
    ///
    /// Resolution failure is a construction error; a field never carries an
    /// unresolved type.
    pub fn parse(name: impl Into<String>, type_spec: &str) -> Result<Self, FieldSpecError> {
        Ok(Self::new(name, ValueType::parse(type_spec)?))
    }

    /// Creates a field from a bare legacy name, typed `any`.
    ///
    /// A name containing a dot is not a field name; it addresses a field of
    /// a shape and is rejected with [`FieldSpecError::DottedName`].
    pub fn from_name(name: &str) -> Result<Self, FieldSpecError> {
        if let Some((root, field)) = name.split_once('.') {
            return Err(FieldSpecError::DottedName {
                root: root.to_string(),
                field: field.to_string(),
            });
        }
        Ok(Self::new(name, ValueType::Any))
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a handler-side key diverging from the wire name.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

/// A field with a required flag, used for query/body parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// The underlying field.
    #[serde(flatten)]
    pub field: Field,
    /// Whether the parameter must be present.
    pub required: bool,
}

impl Param {
    /// Creates an optional parameter.
    #[must_use]
    pub fn new(field: Field) -> Self {
        Self {
            field,
            required: false,
        }
    }

    /// Creates a required parameter.
    #[must_use]
    pub fn required(field: Field) -> Self {
        Self {
            field,
            required: true,
        }
    }

    /// Creates an explicitly optional parameter.
    #[must_use]
    pub fn optional(field: Field) -> Self {
        Self::new(field)
    }

    /// Returns the wire-side name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Returns the handler-side key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.field.key
    }

    /// Returns the type descriptor.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        &self.field.value_type
    }
}

/// A documented error code. Purely descriptive; used only by the docs
/// projector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorField {
    /// The wire code, e.g. `ERR_USER_NOT_FOUND`.
    pub code: String,
    /// What the code means.
    pub description: Option<String>,
}

impl ErrorField {
    /// Creates an error field with a description.
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: Some(description.into()),
        }
    }
}

impl From<&str> for ErrorField {
    fn from(code: &str) -> Self {
        Self {
            code: code.to_string(),
            description: None,
        }
    }
}
