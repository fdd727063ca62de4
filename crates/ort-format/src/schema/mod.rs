// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Table schema of the ORT format.
//!
//! Each table kind is an uninhabited marker type implementing
//! [`TableKind`], with associated slot constants, an `*Args` struct plus
//! `create` for writing, and inherent accessors on
//! [`Table<'_, Kind>`](crate::Table) for reading.
//!
//! Scalar accessors return the field default when the slot is absent;
//! reference accessors return `Ok(None)`.

/// A table kind: its identity and how many slots it has.
pub trait TableKind: 'static {
    /// Identifier stored in the header when this kind is the root.
    const ID: u16;
    const TYPE_NAME: &'static str;
    /// Slots written by this build. Readers accept tables with fewer.
    const SLOT_COUNT: usize;
}

macro_rules! table_kind {
    ($(#[$doc:meta])* $name:ident = $id:literal, slots = $slots:literal) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub enum $name {}

        impl $crate::schema::TableKind for $name {
            const ID: u16 = $id;
            const TYPE_NAME: &'static str = stringify!($name);
            const SLOT_COUNT: usize = $slots;
        }
    };
}

mod attribute;
mod enums;
mod graph;
mod tensor;
mod types;

pub use attribute::{Attribute, AttributeArgs};
pub use enums::{AttributeType, DimensionValueType, TensorDataType, TypeInfoValue};
pub use graph::{Graph, GraphArgs, Model, ModelArgs, Node, NodeArgs, OperatorSetId, OperatorSetIdArgs};
pub use tensor::{Tensor, TensorArgs};
pub use types::{
    Dimension, DimensionArgs, DimensionValue, DimensionValueArgs, Shape, ShapeArgs,
    TensorTypeAndShape, TensorTypeAndShapeArgs, TypeInfo, TypeInfoArgs, ValueInfo, ValueInfoArgs,
};

/// Name of the table kind with the given header id.
pub fn kind_name(id: u16) -> Option<&'static str> {
    const KINDS: [(u16, &str); 12] = [
        (Shape::ID, Shape::TYPE_NAME),
        (Dimension::ID, Dimension::TYPE_NAME),
        (DimensionValue::ID, DimensionValue::TYPE_NAME),
        (TensorTypeAndShape::ID, TensorTypeAndShape::TYPE_NAME),
        (TypeInfo::ID, TypeInfo::TYPE_NAME),
        (ValueInfo::ID, ValueInfo::TYPE_NAME),
        (Tensor::ID, Tensor::TYPE_NAME),
        (Attribute::ID, Attribute::TYPE_NAME),
        (Node::ID, Node::TYPE_NAME),
        (Graph::ID, Graph::TYPE_NAME),
        (OperatorSetId::ID, OperatorSetId::TYPE_NAME),
        (Model::ID, Model::TYPE_NAME),
    ];
    KINDS.iter().find(|(k, _)| *k == id).map(|(_, name)| *name)
}
