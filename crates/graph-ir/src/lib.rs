// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-ir
//!
//! The in-memory intermediate representation (IR) of a computation graph,
//! as consumed and produced by the ORT format codec.
//!
//! - [`Dimension`], [`TensorShape`], [`TypeProto`], [`ValueInfoProto`] —
//!   type descriptors of graph values.
//! - [`TensorProto`] — named constant tensors (initializers).
//! - [`AttributeProto`] — operator attributes, including `GRAPH` bodies.
//! - [`ModelProto`] / [`GraphProto`] / [`NodeProto`] — the plain, fully
//!   inlined JSON form.
//! - [`Model`] / [`Graph`] / [`Node`] — the owning form, in which every
//!   control-flow body is held by the node that declares it.
//!
//! # Example
//! ```no_run
//! use graph_ir::Model;
//! use std::path::Path;
//!
//! let model = Model::from_json_file(Path::new("./demos/loop_model.json")).unwrap();
//! println!("{}", model.summary());
//! print!("{}", model.graph);
//! ```

mod attribute;
mod error;
pub mod graph;
mod model;
mod proto;
mod tensor;
pub mod types;

pub use attribute::{AttributeProto, AttributeType, AttributeValue};
pub use error::GraphError;
pub use graph::{Graph, Node, ParentLink};
pub use model::Model;
pub use proto::{GraphProto, ModelProto, NodeProto, OperatorSetId, SUBGRAPH_STUB_NAME};
pub use tensor::TensorProto;
pub use types::{
    Dimension, DimensionValue, TensorShape, TensorTypeProto, TypeProto, TypeValue, ValueInfoProto,
};

pub use tensor_core::{DataType, TensorData};
