// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use super::{AttributeType, Graph, Tensor};
use crate::{
    F32Vec, FormatError, I64Vec, Offset, OrtBuilder, Str, StrVec, StrVector, Table, TableVec,
    TableVector,
};

table_kind!(
    /// One operator attribute. `type` names the single payload slot that
    /// is meaningful.
    Attribute = 8, slots = 12
);

impl Attribute {
    pub const NAME: usize = 0;
    pub const DOC_STRING: usize = 1;
    pub const TYPE: usize = 2;
    pub const F: usize = 3;
    pub const I: usize = 4;
    pub const S: usize = 5;
    pub const T: usize = 6;
    pub const G: usize = 7;
    pub const FLOATS: usize = 8;
    pub const INTS: usize = 9;
    pub const STRINGS: usize = 10;
    pub const TENSORS: usize = 11;

    pub fn create(b: &mut OrtBuilder, args: &AttributeArgs) -> Offset<Attribute> {
        let mut t = b.start_table::<Attribute>();
        if let Some(name) = args.name {
            t.add_offset(Self::NAME, name);
        }
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        t.add_i32(Self::TYPE, args.r#type.0);
        if let Some(f) = args.f {
            t.add_f32(Self::F, f);
        }
        if let Some(i) = args.i {
            t.add_i64(Self::I, i);
        }
        if let Some(s) = args.s {
            t.add_offset(Self::S, s);
        }
        if let Some(tensor) = args.t {
            t.add_offset(Self::T, tensor);
        }
        if let Some(g) = args.g {
            t.add_offset(Self::G, g);
        }
        if let Some(floats) = args.floats {
            t.add_offset(Self::FLOATS, floats);
        }
        if let Some(ints) = args.ints {
            t.add_offset(Self::INTS, ints);
        }
        if let Some(strings) = args.strings {
            t.add_offset(Self::STRINGS, strings);
        }
        if let Some(tensors) = args.tensors {
            t.add_offset(Self::TENSORS, tensors);
        }
        t.finish()
    }
}

/// Scalar payloads are optional here too, so an attribute written with one
/// payload leaves every other slot absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeArgs {
    pub name: Option<Offset<Str>>,
    pub doc_string: Option<Offset<Str>>,
    pub r#type: AttributeType,
    pub f: Option<f32>,
    pub i: Option<i64>,
    pub s: Option<Offset<Str>>,
    pub t: Option<Offset<Tensor>>,
    pub g: Option<Offset<Graph>>,
    pub floats: Option<Offset<F32Vec>>,
    pub ints: Option<Offset<I64Vec>>,
    pub strings: Option<Offset<StrVec>>,
    pub tensors: Option<Offset<TableVec<Tensor>>>,
}

impl<'a> Table<'a, Attribute> {
    pub fn name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Attribute::NAME)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Attribute::DOC_STRING)
    }

    pub fn type_(&self) -> Result<AttributeType, FormatError> {
        self.scalar_i32(Attribute::TYPE, "Attribute.type")
            .map(AttributeType)
    }

    /// `None` when the slot is absent.
    pub fn f(&self) -> Result<Option<f32>, FormatError> {
        if !self.is_present(Attribute::F) {
            return Ok(None);
        }
        self.scalar_f32(Attribute::F, "Attribute.f").map(Some)
    }

    /// `None` when the slot is absent.
    pub fn i(&self) -> Result<Option<i64>, FormatError> {
        if !self.is_present(Attribute::I) {
            return Ok(None);
        }
        self.scalar_i64(Attribute::I).map(Some)
    }

    pub fn s(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Attribute::S)
    }

    pub fn t(&self) -> Result<Option<Table<'a, Tensor>>, FormatError> {
        self.table_field(Attribute::T)
    }

    pub fn g(&self) -> Result<Option<Table<'a, Graph>>, FormatError> {
        self.table_field(Attribute::G)
    }

    pub fn floats(&self) -> Result<Option<Vec<f32>>, FormatError> {
        self.f32_vector_field(Attribute::FLOATS)
    }

    pub fn ints(&self) -> Result<Option<Vec<i64>>, FormatError> {
        self.i64_vector_field(Attribute::INTS)
    }

    pub fn strings(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Attribute::STRINGS)
    }

    pub fn tensors(&self) -> Result<Option<TableVector<'a, Tensor>>, FormatError> {
        self.table_vector_field(Attribute::TENSORS)
    }
}
