// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owning graph structure.
//!
//! Unlike [`GraphProto`], where a control-flow body is buried inside its
//! `GRAPH` attribute, a [`Graph`] hands every body to the [`Node`] that
//! declares it:
//!
//! ```text
//! Graph "main"
//!   └─ Node 0 "if0" (If)
//!        ├─ subgraphs["then_branch"] ─▶ Graph "then" (parent = main/if0)
//!        └─ subgraphs["else_branch"] ─▶ Graph "else" (parent = main/if0)
//! ```
//!
//! The attribute itself keeps a stub payload (see [`GraphProto::stub`]), so
//! the attribute list still records which attributes exist and in what
//! order. [`Graph::to_proto`] puts the bodies back.

use crate::{
    AttributeProto, AttributeValue, GraphError, GraphProto, NodeProto, TensorProto,
    ValueInfoProto,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ── Parent link ────────────────────────────────────────────────────

/// Where a sub-graph hangs in its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the graph that owns the node.
    pub graph: String,
    /// Index of the owning node within that graph.
    pub node_index: usize,
    pub node_name: String,
    /// Attribute of the owning node that declares the sub-graph.
    pub attribute: String,
}

impl fmt::Display for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{}.{}",
            self.graph, self.node_name, self.node_index, self.attribute
        )
    }
}

// ── Node ───────────────────────────────────────────────────────────

/// One operator invocation inside a [`Graph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Position of the node in its graph. Stable across save and load.
    pub index: usize,
    pub name: String,
    pub op_type: String,
    pub domain: String,
    pub doc_string: Option<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Attributes in declaration order. `GRAPH` attributes hold a stub.
    pub attributes: Vec<AttributeProto>,
    /// Bodies of the `GRAPH` attributes, keyed by attribute name.
    pub subgraphs: BTreeMap<String, Box<Graph>>,
}

impl Node {
    /// Creates a node with no inputs, outputs, or attributes.
    pub fn new(index: usize, name: impl Into<String>, op_type: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            op_type: op_type.into(),
            domain: String::new(),
            doc_string: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            attributes: Vec::new(),
            subgraphs: BTreeMap::new(),
        }
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeProto> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns the body attached for the given `GRAPH` attribute.
    pub fn subgraph(&self, attribute: &str) -> Option<&Graph> {
        self.subgraphs.get(attribute).map(|g| g.as_ref())
    }

    /// Attaches a body under `attribute`, returning the one it replaces.
    pub fn attach_subgraph(&mut self, attribute: impl Into<String>, graph: Graph) -> Option<Box<Graph>> {
        self.subgraphs.insert(attribute.into(), Box::new(graph))
    }

    /// Builds a node from its plain description, lifting every `GRAPH`
    /// attribute body into [`Node::subgraphs`].
    pub fn from_proto(index: usize, proto: NodeProto, graph_name: &str) -> Result<Self, GraphError> {
        let mut node = Node {
            index,
            name: proto.name,
            op_type: proto.op_type,
            domain: proto.domain,
            doc_string: proto.doc_string,
            inputs: proto.inputs,
            outputs: proto.outputs,
            attributes: Vec::with_capacity(proto.attributes.len()),
            subgraphs: BTreeMap::new(),
        };

        for mut attr in proto.attributes {
            if let AttributeValue::Graph(body) = &mut attr.value {
                let body = std::mem::replace(body, GraphProto::stub());
                if node.subgraphs.contains_key(&attr.name) {
                    return Err(GraphError::DuplicateAttribute {
                        node: node.name.clone(),
                        attribute: attr.name,
                    });
                }
                let mut sub = Graph::from_proto(body)?;
                sub.parent = Some(ParentLink {
                    graph: graph_name.to_string(),
                    node_index: index,
                    node_name: node.name.clone(),
                    attribute: attr.name.clone(),
                });
                node.subgraphs.insert(attr.name.clone(), Box::new(sub));
            }
            node.attributes.push(attr);
        }

        Ok(node)
    }

    /// Plain description with every attached body re-inlined.
    pub fn to_proto(&self) -> NodeProto {
        let attributes = self
            .attributes
            .iter()
            .map(|attr| match (&attr.value, self.subgraphs.get(&attr.name)) {
                (AttributeValue::Graph(_), Some(sub)) => AttributeProto {
                    name: attr.name.clone(),
                    doc_string: attr.doc_string.clone(),
                    value: AttributeValue::Graph(sub.to_proto()),
                },
                _ => attr.clone(),
            })
            .collect();

        NodeProto {
            name: self.name.clone(),
            op_type: self.op_type.clone(),
            domain: self.domain.clone(),
            doc_string: self.doc_string.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            attributes,
        }
    }
}

// ── Graph ──────────────────────────────────────────────────────────

/// A computation graph whose nodes own their sub-graphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub name: String,
    pub doc_string: Option<String>,
    /// Constant tensors, in declaration order.
    pub initializers: Vec<TensorProto>,
    /// Every named, typed value (inputs, outputs, and intermediates), one
    /// entry per name.
    pub node_args: Vec<ValueInfoProto>,
    /// Nodes in topological order.
    pub nodes: Vec<Node>,
    /// Names of the graph inputs, resolved against `node_args`.
    pub inputs: Vec<String>,
    /// Names of the graph outputs, resolved against `node_args`.
    pub outputs: Vec<String>,
    /// Set when this graph is the body of a node's `GRAPH` attribute.
    pub parent: Option<ParentLink>,
}

impl Graph {
    /// Creates an empty top-level graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds the owning structure from a plain description.
    ///
    /// Value infos that repeat a name are folded when identical; a repeat
    /// with a different type is rejected.
    pub fn from_proto(proto: GraphProto) -> Result<Self, GraphError> {
        let mut graph = Graph::new(proto.name);
        graph.doc_string = proto.doc_string;
        graph.initializers = proto.initializers;
        graph.inputs = proto.inputs.iter().map(|v| v.name.clone()).collect();
        graph.outputs = proto.outputs.iter().map(|v| v.name.clone()).collect();

        let mut seen: HashMap<String, usize> = HashMap::new();
        for info in proto
            .inputs
            .into_iter()
            .chain(proto.outputs)
            .chain(proto.value_infos)
        {
            if let Some(&pos) = seen.get(&info.name) {
                if graph.node_args[pos] != info {
                    return Err(GraphError::ConflictingValueInfo {
                        graph: graph.name.clone(),
                        value: info.name,
                    });
                }
                tracing::warn!(
                    "graph '{}': folding duplicate value info '{}'",
                    graph.name,
                    info.name
                );
                continue;
            }
            seen.insert(info.name.clone(), graph.node_args.len());
            graph.node_args.push(info);
        }

        graph.nodes = proto
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| Node::from_proto(i, n, &graph.name))
            .collect::<Result<_, _>>()?;

        Ok(graph)
    }

    /// Plain description with every sub-graph re-inlined.
    pub fn to_proto(&self) -> GraphProto {
        let resolve = |name: &String| {
            self.node_arg(name)
                .cloned()
                .unwrap_or_else(|| ValueInfoProto::untyped(name.clone()))
        };
        let value_infos = self
            .node_args
            .iter()
            .filter(|v| !self.inputs.contains(&v.name) && !self.outputs.contains(&v.name))
            .cloned()
            .collect();

        GraphProto {
            name: self.name.clone(),
            doc_string: self.doc_string.clone(),
            nodes: self.nodes.iter().map(Node::to_proto).collect(),
            initializers: self.initializers.clone(),
            inputs: self.inputs.iter().map(resolve).collect(),
            outputs: self.outputs.iter().map(resolve).collect(),
            value_infos,
        }
    }

    /// Looks up a value by name.
    pub fn node_arg(&self, name: &str) -> Option<&ValueInfoProto> {
        self.node_args.iter().find(|v| v.name == name)
    }

    /// Returns a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// One past the highest node index in use.
    pub fn max_node_index(&self) -> usize {
        self.nodes.iter().map(|n| n.index + 1).max().unwrap_or(0)
    }

    /// Levels of sub-graphs below this graph (0 when there are none).
    pub fn nesting_depth(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.subgraphs.values())
            .map(|g| g.nesting_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total number of sub-graphs at every level below this graph.
    pub fn subgraph_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.subgraphs.values())
            .map(|g| g.subgraph_count() + 1)
            .sum()
    }

    /// Raw initializer bytes held by this graph and all its sub-graphs.
    pub fn initializer_bytes(&self) -> usize {
        let own: usize = self.initializers.iter().map(TensorProto::raw_byte_len).sum();
        let nested: usize = self
            .nodes
            .iter()
            .flat_map(|n| n.subgraphs.values())
            .map(|g| g.initializer_bytes())
            .sum();
        own + nested
    }

    /// Returns a summary string describing the graph.
    pub fn summary(&self) -> String {
        format!(
            "Graph '{}': {} nodes, {} initializers ({:.2} KB raw), {} values, {} sub-graphs (depth {})",
            self.name,
            self.nodes.len(),
            self.initializers.len(),
            self.initializer_bytes() as f64 / 1024.0,
            self.node_args.len(),
            self.subgraph_count(),
            self.nesting_depth(),
        )
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        writeln!(f, "{pad}graph '{}'", self.name)?;
        for node in &self.nodes {
            writeln!(
                f,
                "{pad}  [{}] {} ({}) {:?} -> {:?}",
                node.index, node.name, node.op_type, node.inputs, node.outputs
            )?;
            for (attr, sub) in &node.subgraphs {
                writeln!(f, "{pad}    {attr}:")?;
                sub.fmt_indented(f, indent + 3)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
