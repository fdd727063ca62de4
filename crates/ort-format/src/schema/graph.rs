// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node, graph, and model tables.

use super::{Attribute, Tensor, ValueInfo};
use crate::{FormatError, Offset, OrtBuilder, Str, StrVec, StrVector, Table, TableVec, TableVector};

// ── Node ───────────────────────────────────────────────────────────

table_kind!(
    /// One operator invocation.
    Node = 9, slots = 8
);

impl Node {
    pub const NAME: usize = 0;
    pub const DOC_STRING: usize = 1;
    pub const DOMAIN: usize = 2;
    pub const INDEX: usize = 3;
    pub const OP_TYPE: usize = 4;
    pub const INPUTS: usize = 5;
    pub const OUTPUTS: usize = 6;
    pub const ATTRIBUTES: usize = 7;

    pub fn create(b: &mut OrtBuilder, args: &NodeArgs) -> Offset<Node> {
        let mut t = b.start_table::<Node>();
        if let Some(name) = args.name {
            t.add_offset(Self::NAME, name);
        }
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        if let Some(domain) = args.domain {
            t.add_offset(Self::DOMAIN, domain);
        }
        t.add_u32(Self::INDEX, args.index);
        if let Some(op_type) = args.op_type {
            t.add_offset(Self::OP_TYPE, op_type);
        }
        if let Some(inputs) = args.inputs {
            t.add_offset(Self::INPUTS, inputs);
        }
        if let Some(outputs) = args.outputs {
            t.add_offset(Self::OUTPUTS, outputs);
        }
        if let Some(attributes) = args.attributes {
            t.add_offset(Self::ATTRIBUTES, attributes);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeArgs {
    pub name: Option<Offset<Str>>,
    pub doc_string: Option<Offset<Str>>,
    pub domain: Option<Offset<Str>>,
    pub index: u32,
    pub op_type: Option<Offset<Str>>,
    pub inputs: Option<Offset<StrVec>>,
    pub outputs: Option<Offset<StrVec>>,
    pub attributes: Option<Offset<TableVec<Attribute>>>,
}

impl<'a> Table<'a, Node> {
    pub fn name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Node::NAME)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Node::DOC_STRING)
    }

    pub fn domain(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Node::DOMAIN)
    }

    pub fn index(&self) -> Result<u32, FormatError> {
        self.scalar_u32(Node::INDEX, "Node.index")
    }

    pub fn op_type(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Node::OP_TYPE)
    }

    pub fn inputs(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Node::INPUTS)
    }

    pub fn outputs(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Node::OUTPUTS)
    }

    pub fn attributes(&self) -> Result<Option<TableVector<'a, Attribute>>, FormatError> {
        self.table_vector_field(Node::ATTRIBUTES)
    }
}

// ── Graph ──────────────────────────────────────────────────────────

table_kind!(
    /// A computation graph. Inputs and outputs are names resolved against
    /// `node_args`.
    Graph = 10, slots = 8
);

impl Graph {
    pub const NAME: usize = 0;
    pub const DOC_STRING: usize = 1;
    pub const INITIALIZERS: usize = 2;
    pub const NODE_ARGS: usize = 3;
    pub const NODES: usize = 4;
    pub const INPUTS: usize = 5;
    pub const OUTPUTS: usize = 6;
    pub const MAX_NODE_INDEX: usize = 7;

    pub fn create(b: &mut OrtBuilder, args: &GraphArgs) -> Offset<Graph> {
        let mut t = b.start_table::<Graph>();
        if let Some(name) = args.name {
            t.add_offset(Self::NAME, name);
        }
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        if let Some(initializers) = args.initializers {
            t.add_offset(Self::INITIALIZERS, initializers);
        }
        if let Some(node_args) = args.node_args {
            t.add_offset(Self::NODE_ARGS, node_args);
        }
        if let Some(nodes) = args.nodes {
            t.add_offset(Self::NODES, nodes);
        }
        if let Some(inputs) = args.inputs {
            t.add_offset(Self::INPUTS, inputs);
        }
        if let Some(outputs) = args.outputs {
            t.add_offset(Self::OUTPUTS, outputs);
        }
        t.add_u32(Self::MAX_NODE_INDEX, args.max_node_index);
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphArgs {
    pub name: Option<Offset<Str>>,
    pub doc_string: Option<Offset<Str>>,
    pub initializers: Option<Offset<TableVec<Tensor>>>,
    pub node_args: Option<Offset<TableVec<ValueInfo>>>,
    pub nodes: Option<Offset<TableVec<Node>>>,
    pub inputs: Option<Offset<StrVec>>,
    pub outputs: Option<Offset<StrVec>>,
    pub max_node_index: u32,
}

impl<'a> Table<'a, Graph> {
    pub fn name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Graph::NAME)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Graph::DOC_STRING)
    }

    pub fn initializers(&self) -> Result<Option<TableVector<'a, Tensor>>, FormatError> {
        self.table_vector_field(Graph::INITIALIZERS)
    }

    pub fn node_args(&self) -> Result<Option<TableVector<'a, ValueInfo>>, FormatError> {
        self.table_vector_field(Graph::NODE_ARGS)
    }

    pub fn nodes(&self) -> Result<Option<TableVector<'a, Node>>, FormatError> {
        self.table_vector_field(Graph::NODES)
    }

    pub fn inputs(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Graph::INPUTS)
    }

    pub fn outputs(&self) -> Result<Option<StrVector<'a>>, FormatError> {
        self.str_vector_field(Graph::OUTPUTS)
    }

    pub fn max_node_index(&self) -> Result<u32, FormatError> {
        self.scalar_u32(Graph::MAX_NODE_INDEX, "Graph.max_node_index")
    }
}

// ── OperatorSetId ──────────────────────────────────────────────────

table_kind!(
    /// An operator set a model depends on.
    OperatorSetId = 11, slots = 2
);

impl OperatorSetId {
    pub const DOMAIN: usize = 0;
    pub const VERSION: usize = 1;

    pub fn create(b: &mut OrtBuilder, args: &OperatorSetIdArgs) -> Offset<OperatorSetId> {
        let mut t = b.start_table::<OperatorSetId>();
        if let Some(domain) = args.domain {
            t.add_offset(Self::DOMAIN, domain);
        }
        t.add_i64(Self::VERSION, args.version);
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorSetIdArgs {
    pub domain: Option<Offset<Str>>,
    pub version: i64,
}

impl<'a> Table<'a, OperatorSetId> {
    pub fn domain(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(OperatorSetId::DOMAIN)
    }

    pub fn version(&self) -> Result<i64, FormatError> {
        self.scalar_i64(OperatorSetId::VERSION)
    }
}

// ── Model ──────────────────────────────────────────────────────────

table_kind!(
    /// Root table of a saved model.
    Model = 12, slots = 8
);

impl Model {
    pub const IR_VERSION: usize = 0;
    pub const OPSET_IMPORT: usize = 1;
    pub const PRODUCER_NAME: usize = 2;
    pub const PRODUCER_VERSION: usize = 3;
    pub const DOMAIN: usize = 4;
    pub const MODEL_VERSION: usize = 5;
    pub const DOC_STRING: usize = 6;
    pub const GRAPH: usize = 7;

    pub fn create(b: &mut OrtBuilder, args: &ModelArgs) -> Offset<Model> {
        let mut t = b.start_table::<Model>();
        t.add_i64(Self::IR_VERSION, args.ir_version);
        if let Some(opsets) = args.opset_import {
            t.add_offset(Self::OPSET_IMPORT, opsets);
        }
        if let Some(name) = args.producer_name {
            t.add_offset(Self::PRODUCER_NAME, name);
        }
        if let Some(version) = args.producer_version {
            t.add_offset(Self::PRODUCER_VERSION, version);
        }
        if let Some(domain) = args.domain {
            t.add_offset(Self::DOMAIN, domain);
        }
        t.add_i64(Self::MODEL_VERSION, args.model_version);
        if let Some(doc) = args.doc_string {
            t.add_offset(Self::DOC_STRING, doc);
        }
        if let Some(graph) = args.graph {
            t.add_offset(Self::GRAPH, graph);
        }
        t.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelArgs {
    pub ir_version: i64,
    pub opset_import: Option<Offset<TableVec<OperatorSetId>>>,
    pub producer_name: Option<Offset<Str>>,
    pub producer_version: Option<Offset<Str>>,
    pub domain: Option<Offset<Str>>,
    pub model_version: i64,
    pub doc_string: Option<Offset<Str>>,
    pub graph: Option<Offset<Graph>>,
}

impl<'a> Table<'a, Model> {
    pub fn ir_version(&self) -> Result<i64, FormatError> {
        self.scalar_i64(Model::IR_VERSION)
    }

    pub fn opset_import(&self) -> Result<Option<TableVector<'a, OperatorSetId>>, FormatError> {
        self.table_vector_field(Model::OPSET_IMPORT)
    }

    pub fn producer_name(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Model::PRODUCER_NAME)
    }

    pub fn producer_version(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Model::PRODUCER_VERSION)
    }

    pub fn domain(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Model::DOMAIN)
    }

    pub fn model_version(&self) -> Result<i64, FormatError> {
        self.scalar_i64(Model::MODEL_VERSION)
    }

    pub fn doc_string(&self) -> Result<Option<&'a str>, FormatError> {
        self.str_field(Model::DOC_STRING)
    }

    pub fn graph(&self) -> Result<Option<Table<'a, Graph>>, FormatError> {
        self.table_field(Model::GRAPH)
    }
}
