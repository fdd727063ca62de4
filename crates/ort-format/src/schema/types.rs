// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Type descriptor tables: shapes, dimensions, type info, value info.

use super::{DimensionValueType, TypeInfoValue};
use crate::{FormatError, Offset, OrtBuilder, Str, Table, TableVec, TableVector};

// ── Shape ──────────────────────────────────────────────────────────

table_kind!(
    /// Ordered dimensions of a tensor type.
    Shape = 1, slots = 1
);

impl Shape {
    pub const DIM: usize = 0;

    pub fn create(b: &mut OrtBuilder, args: &ShapeArgs) -> Offset<Shape> {
        let mut t = b.start_table::<Shape>();
        if let Some(dim) = args.dim {
            t.add_offset(Self::DIM, dim);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeArgs {
    pub dim: Option<Offset<TableVec<Dimension>>>,
}

impl<'a> Table<'a, Shape> {
    pub fn dim(&self) -> Result<Option<TableVector<'a, Dimension>>, FormatError> {
        self.table_vector_field(Shape::DIM)
    }
}

// ── Dimension ──────────────────────────────────────────────────────

table_kind!(
    /// One axis: an optional value union plus an optional denotation.
    Dimension = 2, slots = 2
);

impl Dimension {
    pub const VALUE: usize = 0;
    pub const DENOTATION: usize = 1;

    pub fn create(b: &mut OrtBuilder, args: &DimensionArgs) -> Offset<Dimension> {
        let mut t = b.start_table::<Dimension>();
        if let Some(value) = args.value {
            t.add_offset(Self::VALUE, value);
        }
        if let Some(denotation) = args.denotation {
            t.add_offset(Self::DENOTATION, denotation);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionArgs {
    pub value: Option<Offset<DimensionValue>>,
    pub denotation: Option<Offset<Str>>,
}

impl<'a> Table<'a, Dimension> {
    pub fn value(&self) -> Result<Option<Table<'a, DimensionValue>>, FormatError> {
        self.table_field(Dimension::VALUE)
    }

    pub fn denotation(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Dimension::DENOTATION)
    }
}

// ── DimensionValue ─────────────────────────────────────────────────

table_kind!(
    /// Tagged value of one axis. `dim_type` says which field is meaningful.
    DimensionValue = 3, slots = 3
);

impl DimensionValue {
    pub const DIM_TYPE: usize = 0;
    pub const DIM_VALUE: usize = 1;
    pub const DIM_PARAM: usize = 2;

    pub fn create(b: &mut OrtBuilder, args: &DimensionValueArgs) -> Offset<DimensionValue> {
        let mut t = b.start_table::<DimensionValue>();
        t.add_u8(Self::DIM_TYPE, args.dim_type.0);
        if args.dim_type == DimensionValueType::VALUE {
            t.add_i64(Self::DIM_VALUE, args.dim_value);
        }
        if let Some(param) = args.dim_param {
            t.add_offset(Self::DIM_PARAM, param);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionValueArgs {
    pub dim_type: DimensionValueType,
    pub dim_value: i64,
    pub dim_param: Option<Offset<Str>>,
}

impl<'a> Table<'a, DimensionValue> {
    pub fn dim_type(&self) -> Result<DimensionValueType, FormatError> {
        self.scalar_u8(DimensionValue::DIM_TYPE, "DimensionValue.dim_type")
            .map(DimensionValueType)
    }

    pub fn dim_value(&self) -> Result<i64, FormatError> {
        self.scalar_i64(DimensionValue::DIM_VALUE)
    }

    pub fn dim_param(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(DimensionValue::DIM_PARAM)
    }
}

// ── TensorTypeAndShape ─────────────────────────────────────────────

table_kind!(
    /// Element type and optional shape of a tensor value.
    TensorTypeAndShape = 4, slots = 2
);

impl TensorTypeAndShape {
    pub const ELEM_TYPE: usize = 0;
    pub const SHAPE: usize = 1;

    pub fn create(b: &mut OrtBuilder, args: &TensorTypeAndShapeArgs) -> Offset<TensorTypeAndShape> {
        let mut t = b.start_table::<TensorTypeAndShape>();
        t.add_i32(Self::ELEM_TYPE, args.elem_type.0);
        if let Some(shape) = args.shape {
            t.add_offset(Self::SHAPE, shape);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TensorTypeAndShapeArgs {
    pub elem_type: super::TensorDataType,
    pub shape: Option<Offset<Shape>>,
}

impl<'a> Table<'a, TensorTypeAndShape> {
    pub fn elem_type(&self) -> Result<super::TensorDataType, FormatError> {
        self.scalar_i32(TensorTypeAndShape::ELEM_TYPE, "TensorTypeAndShape.elem_type")
            .map(super::TensorDataType)
    }

    pub fn shape(&self) -> Result<Option<Table<'a, Shape>>, FormatError> {
        self.table_field(TensorTypeAndShape::SHAPE)
    }
}

// ── TypeInfo ───────────────────────────────────────────────────────

table_kind!(
    /// Type descriptor: a denotation plus a tagged union of type variants.
    TypeInfo = 5, slots = 3
);

impl TypeInfo {
    pub const DENOTATION: usize = 0;
    pub const VALUE_TYPE: usize = 1;
    pub const VALUE: usize = 2;

    pub fn create(b: &mut OrtBuilder, args: &TypeInfoArgs) -> Offset<TypeInfo> {
        let mut t = b.start_table::<TypeInfo>();
        if let Some(denotation) = args.denotation {
            t.add_offset(Self::DENOTATION, denotation);
        }
        t.add_u8(Self::VALUE_TYPE, args.value_type.0);
        if let Some(value) = args.value {
            t.add_u32(Self::VALUE, value);
        }
        t.finish()
    }
}

/// `value` is the raw offset of the union member named by `value_type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeInfoArgs {
    pub denotation: Option<Offset<Str>>,
    pub value_type: TypeInfoValue,
    pub value: Option<u32>,
}

impl TypeInfoArgs {
    /// Arguments for the tensor variant.
    pub fn tensor(denotation: Option<Offset<Str>>, value: Offset<TensorTypeAndShape>) -> Self {
        Self {
            denotation,
            value_type: TypeInfoValue::TENSOR_TYPE,
            value: Some(value.value()),
        }
    }
}

impl<'a> Table<'a, TypeInfo> {
    pub fn denotation(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(TypeInfo::DENOTATION)
    }

    pub fn value_type(&self) -> Result<TypeInfoValue, FormatError> {
        self.scalar_u8(TypeInfo::VALUE_TYPE, "TypeInfo.value_type")
            .map(TypeInfoValue)
    }

    /// The union member as a tensor type; `None` if the tag names another
    /// variant or the member is absent.
    pub fn value_as_tensor_type(&self) -> Result<Option<Table<'a, TensorTypeAndShape>>, FormatError> {
        if self.value_type()? != TypeInfoValue::TENSOR_TYPE {
            return Ok(None);
        }
        self.table_field(TypeInfo::VALUE)
    }
}

// ── ValueInfo ──────────────────────────────────────────────────────

table_kind!(
    /// A named, typed graph value.
    ValueInfo = 6, slots = 3
);

impl ValueInfo {
    pub const NAME: usize = 0;
    pub const DOC_STRING: usize = 1;
    pub const TYPE: usize = 2;

    pub fn create(b: &mut OrtBuilder, args: &ValueInfoArgs) -> Offset<ValueInfo> {
        let mut t = b.start_table::<ValueInfo>();
        if let Some(name) = args.name {
            t.add_offset(Self::NAME, name);
        }
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        if let Some(ty) = args.r#type {
            t.add_offset(Self::TYPE, ty);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValueInfoArgs {
    pub name: Option<Offset<Str>>,
    pub doc_string: Option<Offset<Str>>,
    pub r#type: Option<Offset<TypeInfo>>,
}

impl<'a> Table<'a, ValueInfo> {
    pub fn name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(ValueInfo::NAME)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(ValueInfo::DOC_STRING)
    }

    pub fn type_(&self) -> Result<Option<Table<'a, TypeInfo>>, FormatError> {
        self.table_field(ValueInfo::TYPE)
    }
}
