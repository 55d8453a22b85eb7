//! Parameter list parsing.
//!
//! Endpoint parameter declarations arrive as an ordered list of mixed
//! entries: full [`Param`] values, plain [`Field`] configs, [`Shape`] and
//! [`ShapeArray`] composites, bare legacy strings (`"name"`) and legacy
//! dotted strings (`"shape.field"`). [`parse_params`] normalizes that list
//! into [`ApiParam`] values with no dotted entries left.
//!
//! The dotted form is back-compatibility for declarations such as
//! `["filter", "filter.status", "filter.limit"]`: the bare root is implied
//! by its children and dropped, and one required shape parameter named
//! `filter` with `any`-typed children `status` and `limit` is synthesized.

use crate::field::{Field, FieldSpecError, Param};
use crate::shape::{Shape, ShapeArray, ShapeEntry};
use crate::types::ValueType;
use indexmap::IndexMap;

/// A declared endpoint parameter after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiParam {
    /// A scalar (or array-of-scalar) parameter.
    Plain(Param),
    /// A nested object parameter.
    Shape(Shape),
    /// An array-of-object parameter.
    ShapeArray(ShapeArray),
}

impl ApiParam {
    /// Returns the wire-side name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(p) => p.name(),
            Self::Shape(s) => &s.name,
            Self::ShapeArray(a) => &a.name,
        }
    }

    /// Returns the handler-side key. Shapes and shape arrays are keyed by
    /// their name.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Plain(p) => p.key(),
            Self::Shape(s) => &s.name,
            Self::ShapeArray(a) => &a.name,
        }
    }

    /// Whether the parameter must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match self {
            Self::Plain(p) => p.required,
            Self::Shape(s) => s.required,
            Self::ShapeArray(a) => a.required,
        }
    }

    /// Returns the type descriptor.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::Plain(p) => p.value_type(),
            Self::Shape(s) => s.value_type(),
            Self::ShapeArray(a) => a.value_type(),
        }
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Plain(p) => p.field.description.as_deref(),
            Self::Shape(s) => s.description.as_deref(),
            Self::ShapeArray(a) => a.description.as_deref(),
        }
    }
}

/// One entry of a raw parameter declaration list.
#[derive(Debug, Clone)]
pub enum ParamSpec {
    /// A bare or dotted legacy string.
    Name(String),
    /// A field config without an explicit required flag.
    Field(Field),
    /// A full parameter.
    Param(Param),
    /// A nested object parameter.
    Shape(Shape),
    /// An array-of-object parameter.
    ShapeArray(ShapeArray),
}

impl From<&str> for ParamSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParamSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Field> for ParamSpec {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Param> for ParamSpec {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}

impl From<Shape> for ParamSpec {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<ShapeArray> for ParamSpec {
    fn from(array: ShapeArray) -> Self {
        Self::ShapeArray(array)
    }
}

/// Normalizes a raw declaration list into [`ApiParam`] values.
///
/// First pass collects every root name that appears on the left side of a
/// dotted entry. Second pass: bare strings matching a collected root are
/// dropped (implied by their children), dotted strings are captured as
/// `any`-typed fields of their root's synthetic shape, and everything else
/// parses normally (a bare legacy string becomes a required parameter typed
/// `any`). One required shape parameter is synthesized per root, appended
/// after the ordinary entries in root first-seen order.
pub fn parse_params(
    specs: impl IntoIterator<Item = ParamSpec>,
) -> Result<Vec<ApiParam>, FieldSpecError> {
    let specs: Vec<ParamSpec> = specs.into_iter().collect();

    // Pass 1: which names are shape roots of dotted entries.
    let mut roots: IndexMap<String, Vec<String>> = IndexMap::new();
    for spec in &specs {
        if let ParamSpec::Name(name) = spec {
            if let Some((root, _)) = name.split_once('.') {
                roots.entry(root.to_string()).or_default();
            }
        }
    }

    // Pass 2: ordinary entries in first-seen order, dotted fields captured.
    let mut out: Vec<ApiParam> = Vec::new();
    for spec in specs {
        match spec {
            ParamSpec::Name(name) => {
                if !name.contains('.') && roots.contains_key(&name) {
                    continue;
                }
                match Field::from_name(&name) {
                    Ok(field) => out.push(ApiParam::Plain(Param::required(field))),
                    Err(FieldSpecError::DottedName { root, field }) => {
                        let captured = roots.entry(root).or_default();
                        if !captured.contains(&field) {
                            captured.push(field);
                        }
                    }
                    Err(err) => return Err(err),
                }
            }
            ParamSpec::Field(field) => out.push(ApiParam::Plain(Param::optional(field))),
            ParamSpec::Param(param) => out.push(ApiParam::Plain(param)),
            ParamSpec::Shape(shape) => out.push(ApiParam::Shape(shape)),
            ParamSpec::ShapeArray(array) => out.push(ApiParam::ShapeArray(array)),
        }
    }

    // Synthesize one required shape per root.
    for (root, fields) in roots {
        let entries: Vec<ShapeEntry> = fields
            .into_iter()
            .map(|name| ShapeEntry::from(Field::new(name, ValueType::Any)))
            .collect();
        out.push(ApiParam::Shape(Shape::new(root, true, entries)));
    }

    Ok(out)
}
