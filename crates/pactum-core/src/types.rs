//! Value type descriptors.
//!
//! [`ValueType`] is the small type system endpoint contracts are written in:
//! the named scalar types, enumerations, arrays of a type, and recursive
//! shapes. A descriptor knows how to validate a JSON value, cast it to the
//! canonical representation, and print itself in the canonical string form
//! used in error messages and for structural comparison.
//!
//! String shorthands are resolved at construction time:
//!
//! ```
//! use pactum_core::ValueType;
//!
//! let ty = ValueType::parse("integer[]").unwrap();
//! assert_eq!(ty.to_string(), "integer[]");
//! assert!(ValueType::parse("intger").is_err());
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Error produced when a string shorthand does not resolve to a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type '{spec}'")]
pub struct TypeParseError {
    /// The shorthand that failed to resolve.
    pub spec: String,
}

/// Error produced when a value cannot be cast to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value does not conform to type '{expected}'")]
pub struct CastError {
    /// The canonical string form of the expected type.
    pub expected: String,
}

/// A property of a [`ValueType::Shape`] composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeProperty {
    /// The property's own type.
    pub value_type: ValueType,
    /// Whether the property may be absent. Optional properties are printed
    /// with a `?` suffix on their key in the canonical string form.
    pub optional: bool,
}

/// A resolved type descriptor.
///
/// Descriptors are immutable values; composites own their element types.
/// Two descriptors are structurally equal exactly when their canonical
/// string forms are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Accepts any value; casting is the identity.
    Any,
    /// A UTF-8 string.
    String,
    /// A whole number; numeric strings cast to numbers.
    Integer,
    /// A floating point number; numeric strings cast to numbers.
    Float,
    /// `true`/`false`, also accepted in string form.
    Boolean,
    /// An RFC 3339 timestamp or `YYYY-MM-DD` calendar date, kept as string.
    Date,
    /// One of a fixed set of string variants.
    Enum(Vec<std::string::String>),
    /// An array whose elements all conform to the inner type.
    ArrayOf(Box<ValueType>),
    /// A nested object keyed by property name.
    Shape(IndexMap<std::string::String, ShapeProperty>),
}

impl ValueType {
    /// Resolves a string shorthand into a descriptor.
    ///
    /// Recognized forms: the scalar names (`any`, `string`, `integer`,
    /// `float`, `boolean`, `date`), `enum('a','b')`, and any of those with a
    /// trailing `[]` for array-of. Anything else is a [`TypeParseError`].
    pub fn parse(spec: &str) -> Result<Self, TypeParseError> {
        let spec = spec.trim();

        if let Some(inner) = spec.strip_suffix("[]") {
            return Ok(Self::ArrayOf(Box::new(Self::parse(inner)?)));
        }

        if let Some(inner) = spec
            .strip_prefix("enum(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let variants: Vec<std::string::String> = inner
                .split(',')
                .map(|v| v.trim().trim_matches('\'').trim_matches('"').to_string())
                .filter(|v| !v.is_empty())
                .collect();
            if variants.is_empty() {
                return Err(TypeParseError {
                    spec: spec.to_string(),
                });
            }
            return Ok(Self::Enum(variants));
        }

        match spec {
            "any" => Ok(Self::Any),
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            _ => Err(TypeParseError {
                spec: spec.to_string(),
            }),
        }
    }

    /// Builds a shape descriptor from `(name, type, optional)` triples,
    /// preserving property order.
    #[must_use]
    pub fn shape_of(properties: Vec<(std::string::String, ValueType, bool)>) -> Self {
        Self::Shape(
            properties
                .into_iter()
                .map(|(name, value_type, optional)| {
                    (
                        name,
                        ShapeProperty {
                            value_type,
                            optional,
                        },
                    )
                })
                .collect(),
        )
    }

    /// Returns whether a JSON value conforms to this descriptor.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.parse::<i64>().is_ok(),
                _ => false,
            },
            Self::Float => match value {
                Value::Number(_) => true,
                Value::String(s) => s.parse::<f64>().is_ok(),
                _ => false,
            },
            Self::Boolean => match value {
                Value::Bool(_) => true,
                Value::String(s) => s == "true" || s == "false",
                _ => false,
            },
            Self::Date => value.as_str().is_some_and(is_valid_date),
            Self::Enum(variants) => value
                .as_str()
                .is_some_and(|s| variants.iter().any(|v| v == s)),
            Self::ArrayOf(inner) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| inner.is_valid(item))),
            Self::Shape(properties) => match value.as_object() {
                Some(object) => properties.iter().all(|(name, prop)| {
                    match object.get(name) {
                        Some(Value::Null) | None => prop.optional,
                        Some(v) => prop.value_type.is_valid(v),
                    }
                }),
                None => false,
            },
        }
    }

    /// Casts a JSON value to the canonical representation of this descriptor.
    ///
    /// Numeric and boolean strings become numbers and booleans, dates stay
    /// strings after validation, arrays and shapes cast recursively. Unknown
    /// shape properties pass through untouched.
    pub fn cast(&self, value: &Value) -> Result<Value, CastError> {
        let fail = || CastError {
            expected: self.to_string(),
        };

        match self {
            Self::Any => Ok(value.clone()),
            Self::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(fail()),
            },
            Self::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                Value::String(s) => s
                    .parse::<i64>()
                    .map(|n| Value::Number(Number::from(n)))
                    .map_err(|_| fail()),
                _ => Err(fail()),
            },
            Self::Float => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) => s
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(fail),
                _ => Err(fail()),
            },
            Self::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::String(s) if s == "true" => Ok(Value::Bool(true)),
                Value::String(s) if s == "false" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            Self::Date => match value.as_str() {
                Some(s) if is_valid_date(s) => Ok(value.clone()),
                _ => Err(fail()),
            },
            Self::Enum(variants) => match value.as_str() {
                Some(s) if variants.iter().any(|v| v == s) => Ok(value.clone()),
                _ => Err(fail()),
            },
            Self::ArrayOf(inner) => match value.as_array() {
                Some(items) => {
                    let cast: Result<Vec<Value>, CastError> =
                        items.iter().map(|item| inner.cast(item)).collect();
                    cast.map(Value::Array).map_err(|_| fail())
                }
                None => Err(fail()),
            },
            Self::Shape(properties) => match value.as_object() {
                Some(object) => {
                    let mut out: Map<std::string::String, Value> = object.clone();
                    for (name, prop) in properties {
                        match object.get(name) {
                            Some(Value::Null) | None => {
                                if !prop.optional {
                                    return Err(fail());
                                }
                            }
                            Some(v) => {
                                let cast = prop.value_type.cast(v).map_err(|_| fail())?;
                                out.insert(name.clone(), cast);
                            }
                        }
                    }
                    Ok(Value::Object(out))
                }
                None => Err(fail()),
            },
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::Enum(variants) => {
                write!(f, "enum(")?;
                for (i, v) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "'{v}'")?;
                }
                write!(f, ")")
            }
            Self::ArrayOf(inner) => write!(f, "{inner}[]"),
            Self::Shape(properties) => {
                write!(f, "shape({{")?;
                for (i, (name, prop)) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let marker = if prop.optional { "?" } else { "" };
                    write!(f, "{name}{marker}: {}", prop.value_type)?;
                }
                write!(f, "}})")
            }
        }
    }
}

fn is_valid_date(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
