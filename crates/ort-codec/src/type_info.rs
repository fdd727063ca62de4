// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dimension, shape, and type-info codecs.
//!
//! An axis of unknown size is written as a `Dimension` with no value union
//! at all, which keeps it distinct from a fixed axis of size 0. A shape
//! is always written as a (possibly empty) vector; an absent shape means
//! an unranked tensor.

use crate::CodecError;
use graph_ir::{Dimension, DimensionValue, TensorShape, TensorTypeProto, TypeProto, TypeValue};
use ort_format::schema::{self as fbs, DimensionValueType, TensorDataType, TypeInfoValue};
use ort_format::{Offset, OrtBuilder, Table};
use tensor_core::DataType;

// ── Dimension ──────────────────────────────────────────────────────

pub fn save_dimension(builder: &mut OrtBuilder, dim: &Dimension) -> Offset<fbs::Dimension> {
    let value = match &dim.value {
        Some(DimensionValue::Param(param)) => {
            let param = builder.create_string(param);
            Some(fbs::DimensionValue::create(
                builder,
                &fbs::DimensionValueArgs {
                    dim_type: DimensionValueType::PARAM,
                    dim_value: 0,
                    dim_param: Some(param),
                },
            ))
        }
        Some(DimensionValue::Value(value)) => Some(fbs::DimensionValue::create(
            builder,
            &fbs::DimensionValueArgs {
                dim_type: DimensionValueType::VALUE,
                dim_value: *value,
                dim_param: None,
            },
        )),
        None => None,
    };
    let denotation = dim.denotation.as_deref().map(|d| builder.create_string(d));
    fbs::Dimension::create(builder, &fbs::DimensionArgs { value, denotation })
}

pub fn load_dimension(fbs_dim: &Table<'_, fbs::Dimension>) -> Result<Dimension, CodecError> {
    let denotation = fbs_dim.denotation()?.map(str::to_owned);
    let value = match fbs_dim.value()? {
        None => None,
        Some(fbs_value) => match fbs_value.dim_type()? {
            DimensionValueType::VALUE => Some(DimensionValue::Value(fbs_value.dim_value()?)),
            DimensionValueType::PARAM => {
                let param = fbs_value.dim_param()?.ok_or_else(|| {
                    CodecError::MalformedInput("dimension tagged PARAM has a null dim_param".into())
                })?;
                Some(DimensionValue::Param(param.to_owned()))
            }
            DimensionValueType::UNKNOWN => None,
            other => {
                return Err(CodecError::MalformedInput(format!(
                    "unknown dimension value type {other}"
                )))
            }
        },
    };
    Ok(Dimension { value, denotation })
}

// ── Shape ──────────────────────────────────────────────────────────

pub fn save_shape(builder: &mut OrtBuilder, shape: &TensorShape) -> Offset<fbs::Shape> {
    let dims: Vec<_> = shape.dims.iter().map(|d| save_dimension(builder, d)).collect();
    let dim = builder.create_vector_of_tables(&dims);
    fbs::Shape::create(builder, &fbs::ShapeArgs { dim: Some(dim) })
}

pub fn load_shape(fbs_shape: &Table<'_, fbs::Shape>) -> Result<TensorShape, CodecError> {
    let Some(fbs_dims) = fbs_shape.dim()? else {
        return Ok(TensorShape::default());
    };
    let mut dims = Vec::with_capacity(fbs_dims.len());
    for (i, entry) in fbs_dims.iter().enumerate() {
        let fbs_dim = entry?
            .ok_or_else(|| CodecError::MalformedInput(format!("shape dimension {i} is null")))?;
        dims.push(load_dimension(&fbs_dim)?);
    }
    Ok(TensorShape::new(dims))
}

// ── TypeInfo ───────────────────────────────────────────────────────

/// Saves a type descriptor. Only tensor types can be represented.
pub fn save_type_info(
    builder: &mut OrtBuilder,
    type_proto: &TypeProto,
) -> Result<Offset<fbs::TypeInfo>, CodecError> {
    let tensor = match &type_proto.value {
        Some(TypeValue::Tensor(tensor)) => tensor,
        Some(other) => {
            return Err(CodecError::InvalidArgument(format!(
                "unsupported type variant '{}': only tensor types can be saved",
                other.kind()
            )))
        }
        None => {
            return Err(CodecError::InvalidArgument(
                "type has no variant set".into(),
            ))
        }
    };

    let denotation = type_proto
        .denotation
        .as_deref()
        .map(|d| builder.create_string(d));
    let shape = tensor.shape.as_ref().map(|s| save_shape(builder, s));
    let tensor_type = fbs::TensorTypeAndShape::create(
        builder,
        &fbs::TensorTypeAndShapeArgs {
            elem_type: TensorDataType(tensor.elem_type.code()),
            shape,
        },
    );
    Ok(fbs::TypeInfo::create(
        builder,
        &fbs::TypeInfoArgs::tensor(denotation, tensor_type),
    ))
}

pub fn load_type_info(fbs_type: &Table<'_, fbs::TypeInfo>) -> Result<TypeProto, CodecError> {
    let denotation = fbs_type.denotation()?.map(str::to_owned);
    let value_type = fbs_type.value_type()?;
    if value_type != TypeInfoValue::TENSOR_TYPE {
        return Err(CodecError::InvalidArgument(format!(
            "type info value type {value_type} is not supported"
        )));
    }

    let fbs_tensor = fbs_type.value_as_tensor_type()?.ok_or_else(|| {
        CodecError::MalformedInput("type info tagged TENSOR_TYPE has a null tensor type".into())
    })?;
    let code = fbs_tensor.elem_type()?;
    let elem_type = DataType::from_code(code.0).ok_or_else(|| {
        CodecError::MalformedInput(format!("unknown tensor element type {}", code.0))
    })?;
    let shape = fbs_tensor
        .shape()?
        .map(|s| load_shape(&s))
        .transpose()?;

    Ok(TypeProto {
        denotation,
        value: Some(TypeValue::Tensor(TensorTypeProto { elem_type, shape })),
    })
}
