// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed tensor payloads and their canonical raw byte form.
//!
//! A constant tensor can arrive with its elements in one of several typed
//! fields (the ONNX convention: narrow integer and half-precision types
//! travel in `int32_data`, unsigned 32/64-bit types in `uint64_data`, and so
//! on) or already as raw bytes. [`pack`] flattens any of these into the
//! little-endian, row-major byte buffer that the ORT format stores.

use crate::{DataType, TensorError};

/// Element payload of a constant tensor.
///
/// Exactly one variant is populated. [`TensorData::String`] is only valid
/// for [`DataType::String`] tensors; every other data type is carried either
/// as [`TensorData::Raw`] or as the typed field ONNX assigns to it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorData {
    /// Already-packed little-endian bytes.
    Raw(Vec<u8>),
    /// FLOAT, or COMPLEX64 as interleaved (real, imaginary) pairs.
    Float(Vec<f32>),
    /// DOUBLE, or COMPLEX128 as interleaved pairs.
    Double(Vec<f64>),
    /// INT32 and every narrower integer, BOOL, FLOAT16 and BFLOAT16 (bit patterns).
    Int32(Vec<i32>),
    /// INT64.
    Int64(Vec<i64>),
    /// UINT32 and UINT64.
    Uint64(Vec<u64>),
    /// STRING elements.
    String(Vec<String>),
}

impl TensorData {
    /// Short label for the populated variant.
    pub fn kind(&self) -> &'static str {
        match self {
            TensorData::Raw(_) => "raw",
            TensorData::Float(_) => "float",
            TensorData::Double(_) => "double",
            TensorData::Int32(_) => "int32",
            TensorData::Int64(_) => "int64",
            TensorData::Uint64(_) => "uint64",
            TensorData::String(_) => "string",
        }
    }

    /// Returns the raw bytes if this payload is already packed.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            TensorData::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the string elements if this is a string payload.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            TensorData::String(strings) => Some(strings),
            _ => None,
        }
    }
}

impl Default for TensorData {
    fn default() -> Self {
        TensorData::Raw(Vec::new())
    }
}

/// Returns the number of elements described by `dims`.
///
/// An empty `dims` describes a scalar and yields 1.
pub fn num_elements(dims: &[i64], dtype: DataType) -> Result<usize, TensorError> {
    let mut count: usize = 1;
    for (index, &dim) in dims.iter().enumerate() {
        if dim < 0 {
            return Err(TensorError::InvalidDims {
                dims: dims.to_vec(),
                index,
            });
        }
        let dim = usize::try_from(dim).map_err(|_| overflow(dims, dtype))?;
        count = count.checked_mul(dim).ok_or_else(|| overflow(dims, dtype))?;
    }
    Ok(count)
}

/// Returns the raw byte length implied by `dims` and `data_type`.
pub fn expected_byte_size(data_type: DataType, dims: &[i64]) -> Result<usize, TensorError> {
    let width = element_width(data_type)?;
    num_elements(dims, data_type)?
        .checked_mul(width)
        .ok_or_else(|| overflow(dims, data_type))
}

/// Packs a typed payload into its canonical little-endian byte buffer.
///
/// The returned buffer is always exactly [`expected_byte_size`] bytes long.
///
/// # Errors
/// - [`TensorError::UnsupportedDType`] for STRING and UNDEFINED tensors.
/// - [`TensorError::PayloadMismatch`] when the payload variant cannot carry
///   the declared data type.
/// - [`TensorError::BufferSizeMismatch`] when the payload holds the wrong
///   number of elements.
/// - [`TensorError::InvalidDims`] / [`TensorError::Overflow`] for bad dims.
pub fn pack(data_type: DataType, dims: &[i64], data: &TensorData) -> Result<Vec<u8>, TensorError> {
    let width = element_width(data_type)?;
    let expected = expected_byte_size(data_type, dims)?;

    let bytes: Vec<u8> = match data {
        TensorData::Raw(raw) => raw.clone(),
        TensorData::Float(values) => match data_type {
            DataType::Float | DataType::Complex64 => {
                values.iter().flat_map(|v| v.to_le_bytes()).collect()
            }
            _ => return Err(mismatch(data, data_type)),
        },
        TensorData::Double(values) => match data_type {
            DataType::Double | DataType::Complex128 => {
                values.iter().flat_map(|v| v.to_le_bytes()).collect()
            }
            _ => return Err(mismatch(data, data_type)),
        },
        TensorData::Int32(values) => match data_type {
            DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::Uint16
            | DataType::Uint8
            | DataType::Bool
            | DataType::Float16
            | DataType::Bfloat16 => values
                .iter()
                .flat_map(|v| v.to_le_bytes().into_iter().take(width))
                .collect(),
            _ => return Err(mismatch(data, data_type)),
        },
        TensorData::Int64(values) => match data_type {
            DataType::Int64 => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            _ => return Err(mismatch(data, data_type)),
        },
        TensorData::Uint64(values) => match data_type {
            DataType::Uint32 | DataType::Uint64 => values
                .iter()
                .flat_map(|v| v.to_le_bytes().into_iter().take(width))
                .collect(),
            _ => return Err(mismatch(data, data_type)),
        },
        TensorData::String(_) => return Err(mismatch(data, data_type)),
    };

    if bytes.len() != expected {
        return Err(TensorError::BufferSizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

fn element_width(data_type: DataType) -> Result<usize, TensorError> {
    data_type.size_bytes().ok_or(TensorError::UnsupportedDType {
        op: "pack",
        dtype: data_type,
    })
}

fn mismatch(data: &TensorData, dtype: DataType) -> TensorError {
    TensorError::PayloadMismatch {
        payload: data.kind(),
        dtype,
    }
}

fn overflow(dims: &[i64], dtype: DataType) -> TensorError {
    TensorError::Overflow {
        dims: dims.to_vec(),
        dtype,
    }
}
