// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor payload packing.

use crate::DataType;

/// Errors that can occur while turning a typed payload into raw bytes.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The payload size does not match the size implied by dims and data type.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The data type has no raw byte representation.
    #[error("unsupported dtype {dtype} for operation {op}")]
    UnsupportedDType { op: &'static str, dtype: DataType },

    /// The payload variant cannot carry elements of the declared data type.
    #[error("{payload} payload cannot hold {dtype} elements")]
    PayloadMismatch {
        payload: &'static str,
        dtype: DataType,
    },

    /// A dimension is negative.
    #[error("invalid dims {dims:?}: dimension {index} is negative")]
    InvalidDims { dims: Vec<i64>, index: usize },

    /// The element or byte count does not fit in `usize`.
    #[error("size overflow computing byte length for dims {dims:?} of {dtype}")]
    Overflow { dims: Vec<i64>, dtype: DataType },
}
