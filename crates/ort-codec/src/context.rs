// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sub-graph capabilities.
//!
//! A `GRAPH` attribute recurses into the graph domain: saving it needs the
//! body the owning node holds, and loading it produces a graph that must be
//! handed back to that node. The attribute codec never sees a concrete
//! graph type; callers pass these capabilities in.
//!
//! ```text
//! save_graph ─▶ save_node ─▶ save_attribute ─▶ SubgraphSaver (the body) ─▶ save_graph
//! load_graph ─▶ load_node ─▶ load_attribute ─▶ SubgraphLoader (NodeLoader) ─▶ load_graph
//! ```

use crate::CodecError;
use ort_format::schema as fbs;
use ort_format::{Offset, OrtBuilder, Table};

/// Something that can write itself as the body of a `GRAPH` attribute.
pub trait SubgraphSaver {
    fn save_subgraph(&self, builder: &mut OrtBuilder) -> Result<Offset<fbs::Graph>, CodecError>;
}

/// Materialises the body of a `GRAPH` attribute for the node being loaded.
pub trait SubgraphLoader {
    /// The owned sub-graph returned to the caller.
    type Subgraph;

    fn load_subgraph(
        &mut self,
        attribute_name: &str,
        fbs_graph: Table<'_, fbs::Graph>,
    ) -> Result<Self::Subgraph, CodecError>;
}
