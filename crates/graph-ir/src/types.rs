// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Type descriptors for graph values: dimensions, shapes, type info.
//!
//! Absence is always explicit. A [`Dimension`] with no value is an unknown
//! axis, which is different from the axis not existing; a
//! [`TensorTypeProto`] without a shape is unranked, which is different from
//! a rank-0 (scalar) shape.

use std::fmt;
use tensor_core::DataType;

/// The size of one tensor axis: a fixed extent or a symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionValue {
    /// Fixed extent.
    Value(i64),
    /// Symbolic name resolved at run time (e.g. `"batch"`).
    Param(String),
}

/// One axis of a tensor shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimension {
    /// `None` means the axis exists but its size is unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DimensionValue>,
    /// Optional semantic denotation (e.g. `"DATA_BATCH"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denotation: Option<String>,
}

impl Dimension {
    /// A fixed-size axis.
    pub fn fixed(value: i64) -> Self {
        Self {
            value: Some(DimensionValue::Value(value)),
            denotation: None,
        }
    }

    /// A symbolic axis.
    pub fn symbolic(param: impl Into<String>) -> Self {
        Self {
            value: Some(DimensionValue::Param(param.into())),
            denotation: None,
        }
    }

    /// An axis of unknown size.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Sets the denotation.
    pub fn with_denotation(mut self, denotation: impl Into<String>) -> Self {
        self.denotation = Some(denotation.into());
        self
    }

    /// Returns the fixed extent, if any.
    pub fn dim_value(&self) -> Option<i64> {
        match &self.value {
            Some(DimensionValue::Value(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the symbolic name, if any.
    pub fn dim_param(&self) -> Option<&str> {
        match &self.value {
            Some(DimensionValue::Param(p)) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(DimensionValue::Value(v)) => write!(f, "{v}"),
            Some(DimensionValue::Param(p)) => f.write_str(p),
            None => f.write_str("?"),
        }
    }
}

/// Ordered axes of a tensor type. An empty shape is rank 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TensorShape {
    #[serde(default)]
    pub dims: Vec<Dimension>,
}

impl TensorShape {
    /// Creates a shape from the given axes.
    pub fn new(dims: Vec<Dimension>) -> Self {
        Self { dims }
    }

    /// Creates a fully static shape.
    pub fn from_values(values: &[i64]) -> Self {
        Self {
            dims: values.iter().map(|&v| Dimension::fixed(v)).collect(),
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns `true` if every axis has a fixed extent.
    pub fn is_static(&self) -> bool {
        self.dims.iter().all(|d| d.dim_value().is_some())
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

/// Element type and (optional) shape of a tensor value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TensorTypeProto {
    pub elem_type: DataType,
    /// `None` means unranked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<TensorShape>,
}

/// The kind of value a [`TypeProto`] describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeValue {
    Tensor(TensorTypeProto),
    Sequence(Box<TypeProto>),
    Map {
        key_type: DataType,
        value_type: Box<TypeProto>,
    },
    Optional(Box<TypeProto>),
}

impl TypeValue {
    /// Short label for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeValue::Tensor(_) => "tensor",
            TypeValue::Sequence(_) => "sequence",
            TypeValue::Map { .. } => "map",
            TypeValue::Optional(_) => "optional",
        }
    }
}

/// Type descriptor of a graph value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TypeProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TypeValue>,
}

impl TypeProto {
    /// A tensor type.
    pub fn tensor(elem_type: DataType, shape: Option<TensorShape>) -> Self {
        Self {
            denotation: None,
            value: Some(TypeValue::Tensor(TensorTypeProto { elem_type, shape })),
        }
    }

    /// Returns the tensor variant, if populated.
    pub fn as_tensor(&self) -> Option<&TensorTypeProto> {
        match &self.value {
            Some(TypeValue::Tensor(t)) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for TypeProto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(TypeValue::Tensor(t)) => match &t.shape {
                Some(shape) => write!(f, "tensor({}){shape}", t.elem_type),
                None => write!(f, "tensor({})", t.elem_type),
            },
            Some(other) => write!(f, "{}(..)", other.kind()),
            None => f.write_str("<untyped>"),
        }
    }
}

/// A named, typed graph value (graph input, output, or intermediate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ValueInfoProto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<TypeProto>,
}

impl ValueInfoProto {
    /// A typed value.
    pub fn new(name: impl Into<String>, ty: TypeProto) -> Self {
        Self {
            name: name.into(),
            doc_string: None,
            r#type: Some(ty),
        }
    }

    /// A value with no type information.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_string: None,
            r#type: None,
        }
    }
}
