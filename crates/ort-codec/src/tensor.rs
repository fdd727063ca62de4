// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor (initializer) codec.
//!
//! The payload slot is chosen by the element type alone: STRING tensors
//! write `string_data`, everything else is packed into `raw_data`. On load
//! raw bytes are copied back verbatim as [`TensorData::Raw`]; typed
//! payloads are not reconstructed.

use crate::CodecError;
use graph_ir::TensorProto;
use ort_format::schema::{self as fbs, TensorDataType};
use ort_format::{Offset, OrtBuilder, Table};
use tensor_core::{DataType, TensorData};

pub fn save_tensor(
    builder: &mut OrtBuilder,
    tensor: &TensorProto,
) -> Result<Offset<fbs::Tensor>, CodecError> {
    let (raw_data, string_data) = if tensor.is_string() {
        let strings = tensor.string_data().ok_or_else(|| {
            CodecError::InvalidArgument(format!(
                "string tensor '{}' carries a {} payload",
                tensor.name,
                tensor.data.kind()
            ))
        })?;
        (None, Some(builder.create_vector_of_strings(strings)))
    } else {
        let bytes = tensor_core::pack(tensor.data_type, &tensor.dims, &tensor.data).map_err(
            |source| CodecError::Packing {
                tensor: tensor.name.clone(),
                source,
            },
        )?;
        (Some(builder.create_bytes(&bytes)), None)
    };

    let name = builder.create_string(&tensor.name);
    let doc_string = tensor.doc_string.as_deref().map(|d| builder.create_string(d));
    let dims = builder.create_i64_vector(&tensor.dims);

    Ok(fbs::Tensor::create(
        builder,
        &fbs::TensorArgs {
            name: Some(name),
            doc_string,
            dims: Some(dims),
            data_type: TensorDataType(tensor.data_type.code()),
            raw_data,
            string_data,
        },
    ))
}

pub fn load_tensor(fbs_tensor: &Table<'_, fbs::Tensor>) -> Result<TensorProto, CodecError> {
    let name = fbs_tensor.name()?.unwrap_or_default().to_owned();
    let doc_string = fbs_tensor.doc_string()?.map(str::to_owned);
    let dims = fbs_tensor
        .dims()?
        .ok_or_else(|| CodecError::MalformedInput(format!("tensor '{name}' has no dims")))?;
    let code = fbs_tensor.data_type()?;
    let data_type = DataType::from_code(code.0).ok_or_else(|| {
        CodecError::MalformedInput(format!("tensor '{name}' has unknown data type {}", code.0))
    })?;

    let data = if data_type.is_string() {
        let fbs_strings = fbs_tensor.string_data()?.ok_or_else(|| {
            CodecError::MalformedInput(format!("string tensor '{name}' has no string_data"))
        })?;
        let mut strings = Vec::with_capacity(fbs_strings.len());
        for (i, entry) in fbs_strings.iter().enumerate() {
            let s = entry?.ok_or_else(|| {
                CodecError::MalformedInput(format!("tensor '{name}': string element {i} is null"))
            })?;
            strings.push(s.to_owned());
        }
        TensorData::String(strings)
    } else {
        let raw = fbs_tensor.raw_data()?.ok_or_else(|| {
            CodecError::MalformedInput(format!("tensor '{name}' has no raw_data"))
        })?;
        TensorData::Raw(raw.to_vec())
    };

    Ok(TensorProto {
        name,
        doc_string,
        dims,
        data_type,
        data,
    })
}

/// Checks a raw payload's length against `dims × element size`.
///
/// String tensors and non-raw payloads pass unchecked.
pub fn check_raw_data_size(tensor: &TensorProto) -> Result<(), CodecError> {
    let Some(raw) = tensor.raw_data() else {
        return Ok(());
    };
    if tensor.is_string() {
        return Ok(());
    }
    let expected = tensor_core::expected_byte_size(tensor.data_type, &tensor.dims).map_err(
        |source| CodecError::Packing {
            tensor: tensor.name.clone(),
            source,
        },
    )?;
    if raw.len() != expected {
        return Err(CodecError::MalformedInput(format!(
            "tensor '{}': raw data is {} bytes, dims {:?} of {} need {expected}",
            tensor.name,
            raw.len(),
            tensor.dims,
            tensor.data_type
        )));
    }
    Ok(())
}
