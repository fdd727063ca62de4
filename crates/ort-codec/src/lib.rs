// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ort-codec
//!
//! Bidirectional codec between the [`graph_ir`] model representation and
//! the compact ORT binary format of [`ort_format`].
//!
//! Each IR entity has a `save_*` function that appends it to an
//! [`OrtBuilder`](ort_format::OrtBuilder) and returns a typed offset, and a
//! `load_*` function that rebuilds it from a table view:
//!
//! | entity | save | load |
//! |---|---|---|
//! | dimension | [`save_dimension`] | [`load_dimension`] |
//! | shape | [`save_shape`] | [`load_shape`] |
//! | type info | [`save_type_info`] | [`load_type_info`] |
//! | tensor | [`save_tensor`] | [`load_tensor`] |
//! | value info | [`save_value_info`] | [`load_value_info`] |
//! | attribute | [`save_attribute`] | [`load_attribute`] |
//! | node / graph | [`save_node`] / [`save_graph`] | [`load_node`] / [`load_graph`] |
//! | model | [`save_model`] | [`load_model`] |
//!
//! Any failure aborts the whole operation; a builder that produced an
//! error is dropped, never finished.
//!
//! # Example
//! ```no_run
//! use ort_codec::{load_model_from_path, save_model_to_path, CodecConfig};
//! use graph_ir::Model;
//! use std::path::Path;
//!
//! let model = Model::from_json_file(Path::new("./demos/loop_model.json")).unwrap();
//! save_model_to_path(&model, Path::new("/tmp/loop_model.ort")).unwrap();
//! let loaded = load_model_from_path(Path::new("/tmp/loop_model.ort"), &CodecConfig::default()).unwrap();
//! assert_eq!(loaded.graph.nesting_depth(), model.graph.nesting_depth());
//! ```

mod attribute;
mod config;
mod context;
mod error;
mod graph;
mod model;
mod tensor;
mod type_info;
mod value_info;

pub use attribute::{load_attribute, save_attribute, LoadedAttribute};
pub use config::{CodecConfig, DEFAULT_MAX_SUBGRAPH_DEPTH};
pub use context::{SubgraphLoader, SubgraphSaver};
pub use error::CodecError;
pub use graph::{load_graph, load_node, save_graph, save_node, NodeLoader};
pub use model::{load_model, load_model_from_path, map_model_file, save_model, save_model_to_path};
pub use tensor::{check_raw_data_size, load_tensor, save_tensor};
pub use type_info::{load_dimension, load_shape, load_type_info, save_dimension, save_shape, save_type_info};
pub use value_info::{load_value_info, save_value_info};

pub use ort_format;
