// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Named constant tensors (initializers and tensor-valued attributes).

use tensor_core::{DataType, TensorData};

/// A named, shaped constant tensor.
///
/// `dims` are always concrete; constants have no symbolic axes. The payload
/// is [`TensorData::String`] exactly when `data_type` is
/// [`DataType::String`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorProto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub dims: Vec<i64>,
    pub data_type: DataType,
    pub data: TensorData,
}

impl TensorProto {
    /// A tensor whose elements are already packed.
    pub fn raw(name: impl Into<String>, data_type: DataType, dims: Vec<i64>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            doc_string: None,
            dims,
            data_type,
            data: TensorData::Raw(bytes),
        }
    }

    /// A string tensor.
    pub fn strings(name: impl Into<String>, dims: Vec<i64>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            doc_string: None,
            dims,
            data_type: DataType::String,
            data: TensorData::String(values),
        }
    }

    /// A float tensor carried in the typed field.
    pub fn from_f32(name: impl Into<String>, dims: Vec<i64>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            doc_string: None,
            dims,
            data_type: DataType::Float,
            data: TensorData::Float(values),
        }
    }

    /// Returns `true` for string tensors.
    pub fn is_string(&self) -> bool {
        self.data_type.is_string()
    }

    /// Packed bytes, if the payload is raw.
    pub fn raw_data(&self) -> Option<&[u8]> {
        self.data.as_raw()
    }

    /// String elements, if the payload is a string list.
    pub fn string_data(&self) -> Option<&[String]> {
        self.data.as_strings()
    }

    /// Bytes held by a raw payload, 0 for every other payload.
    pub fn raw_byte_len(&self) -> usize {
        self.raw_data().map_or(0, <[u8]>::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let w = TensorProto::raw("W", DataType::Float, vec![2, 3], vec![0u8; 24]);
        assert!(!w.is_string());
        assert_eq!(w.raw_byte_len(), 24);
        assert!(w.string_data().is_none());

        let s = TensorProto::strings("labels", vec![2], vec!["cat".into(), "dog".into()]);
        assert!(s.is_string());
        assert_eq!(s.string_data().unwrap(), &["cat".to_string(), "dog".to_string()]);
        assert_eq!(s.raw_byte_len(), 0);
    }

    #[test]
    fn test_json() {
        let json = r#"{ "name": "b", "dims": [2], "data_type": "float", "data": { "float": [0.5, 1.5] } }"#;
        let t: TensorProto = serde_json::from_str(json).unwrap();
        assert_eq!(t, TensorProto::from_f32("b", vec![2], vec![0.5, 1.5]));
    }
}
