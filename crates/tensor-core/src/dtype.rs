// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor element data types.

/// Enumerates the element types a tensor can declare.
///
/// The discriminants are the ONNX `TensorProto.DataType` codes, which are
/// also the values written to the ORT format, so `code()` / `from_code()`
/// are lossless for every known type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum DataType {
    /// No element type recorded.
    Undefined = 0,
    /// 32-bit IEEE 754 floating point.
    Float = 1,
    Uint8 = 2,
    Int8 = 3,
    Uint16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    /// Variable-length UTF-8 strings; never packed into raw bytes.
    String = 8,
    Bool = 9,
    /// 16-bit IEEE 754 floating point.
    Float16 = 10,
    /// 64-bit IEEE 754 floating point.
    Double = 11,
    Uint32 = 12,
    Uint64 = 13,
    /// Pair of 32-bit floats.
    Complex64 = 14,
    /// Pair of 64-bit floats.
    Complex128 = 15,
    /// 16-bit brain floating point.
    Bfloat16 = 16,
}

impl DataType {
    /// Returns the size of a single element in bytes.
    ///
    /// `None` for [`DataType::Undefined`] and [`DataType::String`], which
    /// have no fixed-width representation.
    pub fn size_bytes(self) -> Option<usize> {
        match self {
            DataType::Undefined | DataType::String => None,
            DataType::Uint8 | DataType::Int8 | DataType::Bool => Some(1),
            DataType::Uint16 | DataType::Int16 | DataType::Float16 | DataType::Bfloat16 => Some(2),
            DataType::Float | DataType::Int32 | DataType::Uint32 => Some(4),
            DataType::Int64 | DataType::Uint64 | DataType::Double | DataType::Complex64 => Some(8),
            DataType::Complex128 => Some(16),
        }
    }

    /// Returns the numeric code used by ONNX and the ORT format.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps a numeric code back to a data type.
    pub fn from_code(code: i32) -> Option<Self> {
        let dtype = match code {
            0 => DataType::Undefined,
            1 => DataType::Float,
            2 => DataType::Uint8,
            3 => DataType::Int8,
            4 => DataType::Uint16,
            5 => DataType::Int16,
            6 => DataType::Int32,
            7 => DataType::Int64,
            8 => DataType::String,
            9 => DataType::Bool,
            10 => DataType::Float16,
            11 => DataType::Double,
            12 => DataType::Uint32,
            13 => DataType::Uint64,
            14 => DataType::Complex64,
            15 => DataType::Complex128,
            16 => DataType::Bfloat16,
            _ => return None,
        };
        Some(dtype)
    }

    /// Returns `true` for the string element type.
    pub fn is_string(self) -> bool {
        self == DataType::String
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Undefined => "undefined",
            DataType::Float => "float",
            DataType::Uint8 => "uint8",
            DataType::Int8 => "int8",
            DataType::Uint16 => "uint16",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::String => "string",
            DataType::Bool => "bool",
            DataType::Float16 => "float16",
            DataType::Double => "double",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Complex64 => "complex64",
            DataType::Complex128 => "complex128",
            DataType::Bfloat16 => "bfloat16",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
