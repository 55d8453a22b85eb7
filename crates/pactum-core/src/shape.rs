//! Nested shapes.
//!
//! A [`Shape`] groups fields and parameters into a nested object contract; a
//! [`ShapeArray`] is an array of one shape. Both derive a structural
//! [`ValueType`] from their children at construction, keyed by child name
//! with a `?` marker for optional children, so two structurally identical
//! shapes compare equal through their canonical string form.
//!
//! Requiredness flows one level down: constructing a *required* shape
//! coerces every immediate plain-field child into a required parameter.
//! A child that is already a [`Param`] keeps its explicit flag, and child
//! shapes/shape-arrays are governed by their own flag only.

use crate::field::{Field, Param};
use crate::types::ValueType;

/// An immediate child of a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEntry {
    /// A plain field, no explicit required flag.
    Field(Field),
    /// A parameter with an explicit required flag.
    Param(Param),
    /// A nested shape.
    Shape(Shape),
    /// A nested shape array.
    ShapeArray(ShapeArray),
}

impl ShapeEntry {
    /// Returns the child's wire-side name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Param(p) => p.name(),
            Self::Shape(s) => &s.name,
            Self::ShapeArray(a) => &a.name,
        }
    }

    /// Returns the child's type descriptor.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        match self {
            Self::Field(f) => &f.value_type,
            Self::Param(p) => p.value_type(),
            Self::Shape(s) => s.value_type(),
            Self::ShapeArray(a) => a.value_type(),
        }
    }

    /// Whether the child is optional in the derived structural type.
    ///
    /// Plain fields carry no flag and count as required; everything else is
    /// optional exactly when its explicit flag says so.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Field(_) => false,
            Self::Param(p) => !p.required,
            Self::Shape(s) => !s.required,
            Self::ShapeArray(a) => !a.required,
        }
    }
}

impl From<Field> for ShapeEntry {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Param> for ShapeEntry {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}

impl From<Shape> for ShapeEntry {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<ShapeArray> for ShapeEntry {
    fn from(array: ShapeArray) -> Self {
        Self::ShapeArray(array)
    }
}

/// A nested object contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// The shape's wire-side name when used as a parameter.
    pub name: String,
    /// Human-readable description for documentation.
    pub description: Option<String>,
    /// Whether the shape itself must be present when used as a parameter.
    pub required: bool,
    entries: Vec<ShapeEntry>,
    value_type: ValueType,
}

impl Shape {
    /// Creates a shape from its immediate children.
    ///
    /// A required shape coerces its plain-field children to required
    /// parameters (the one-level-down policy); the derived structural type
    /// is computed from the resulting children.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        required: bool,
        entries: impl IntoIterator<Item = ShapeEntry>,
    ) -> Self {
        let entries: Vec<ShapeEntry> = if required {
            entries
                .into_iter()
                .map(|entry| match entry {
                    ShapeEntry::Field(field) => ShapeEntry::Param(Param::required(field)),
                    other => other,
                })
                .collect()
        } else {
            entries.into_iter().collect()
        };

        let value_type = derive_type(&entries);

        Self {
            name: name.into(),
            description: None,
            required,
            entries,
            value_type,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the immediate children.
    #[must_use]
    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    /// Returns the derived structural type.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }
}

/// An array-of-shape contract.
///
/// Wraps exactly one [`Shape`]; the derived type is the shape's type marked
/// array-of. Arrays of scalars are expressed through
/// [`ValueType::ArrayOf`] on a plain field instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeArray {
    /// The wire-side name when used as a parameter.
    pub name: String,
    /// Human-readable description for documentation.
    pub description: Option<String>,
    /// Whether the array itself must be present when used as a parameter.
    pub required: bool,
    shape: Shape,
    value_type: ValueType,
}

impl ShapeArray {
    /// Creates a shape array wrapping the given shape.
    #[must_use]
    pub fn new(name: impl Into<String>, required: bool, shape: Shape) -> Self {
        let value_type = ValueType::ArrayOf(Box::new(shape.value_type().clone()));
        Self {
            name: name.into(),
            description: None,
            required,
            shape,
            value_type,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the element shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the derived array-of-shape type.
    #[must_use]
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }
}

fn derive_type(entries: &[ShapeEntry]) -> ValueType {
    ValueType::shape_of(
        entries
            .iter()
            .map(|entry| {
                (
                    entry.name().to_string(),
                    entry.value_type().clone(),
                    entry.is_optional(),
                )
            })
            .collect(),
    )
}
