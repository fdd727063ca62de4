// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use super::TensorDataType;
use crate::{ByteVec, FormatError, I64Vec, Offset, OrtBuilder, Str, StrVec, StrVector, Table};

table_kind!(
    /// A named constant tensor. Exactly one of `raw_data` and `string_data`
    /// is written, chosen by `data_type`.
    Tensor = 7, slots = 6
);

impl Tensor {
    pub const NAME: usize = 0;
    pub const DOC_STRING: usize = 1;
    pub const DIMS: usize = 2;
    pub const DATA_TYPE: usize = 3;
    pub const RAW_DATA: usize = 4;
    pub const STRING_DATA: usize = 5;

    pub fn create(b: &mut OrtBuilder, args: &TensorArgs) -> Offset<Tensor> {
        let mut t = b.start_table::<Tensor>();
        if let Some(name) = args.name {
            t.add_offset(Self::NAME, name);
        }
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        if let Some(dims) = args.dims {
            t.add_offset(Self::DIMS, dims);
        }
        t.add_i32(Self::DATA_TYPE, args.data_type.0);
        if let Some(raw) = args.raw_data {
            t.add_offset(Self::RAW_DATA, raw);
        }
        if let Some(strings) = args.string_data {
            t.add_offset(Self::STRING_DATA, strings);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TensorArgs {
    pub name: Option<Offset<Str>>,
    pub doc_string: Option<Offset<Str>>,
    pub dims: Option<Offset<I64Vec>>,
    pub data_type: TensorDataType,
    pub raw_data: Option<Offset<ByteVec>>,
    pub string_data: Option<Offset<StrVec>>,
}

impl<'a> Table<'a, Tensor> {
    pub fn name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Tensor::NAME)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Tensor::DOC_STRING)
    }

    pub fn dims(&self) -> Result<Option<Vec<i64>>, FormatError> {
        self.i64_vector_field(Tensor::DIMS)
    }

    pub fn data_type(&self) -> Result<TensorDataType, FormatError> {
        self.scalar_i32(Tensor::DATA_TYPE, "Tensor.data_type")
            .map(TensorDataType)
    }

    /// Borrowed straight from the buffer.
    pub fn raw_data(&self) -> Result<Option<&'a [u8]>, FormatError> {
        self.bytes_field(Tensor::RAW_DATA)
    }

    pub fn string_data(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Tensor::STRING_DATA)
    }
}
