// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph and node codec.
//!
//! A graph is written as its initializers, every value info it knows, its
//! nodes, and the names of its inputs and outputs. Nodes write their
//! attributes through [`save_attribute`]; a `GRAPH` attribute is resolved
//! against the body the node holds in [`Node::subgraphs`].
//!
//! Loading mirrors this. Each node gets its own [`NodeLoader`], which loads
//! nested bodies one level deeper and links them back to the node.

use crate::attribute::{load_attribute, save_attribute};
use crate::context::{SubgraphLoader, SubgraphSaver};
use crate::tensor::{check_raw_data_size, load_tensor, save_tensor};
use crate::value_info::{load_value_info, save_value_info};
use crate::{CodecConfig, CodecError};
use graph_ir::{AttributeValue, Graph, Node, ParentLink};
use ort_format::schema as fbs;
use ort_format::{Offset, OrtBuilder, StrVector, Table};

impl SubgraphSaver for Graph {
    fn save_subgraph(&self, builder: &mut OrtBuilder) -> Result<Offset<fbs::Graph>, CodecError> {
        save_graph(builder, self)
    }
}

// ── Save ───────────────────────────────────────────────────────────

/// Saves a graph and, through its nodes, every sub-graph below it.
pub fn save_graph(builder: &mut OrtBuilder, graph: &Graph) -> Result<Offset<fbs::Graph>, CodecError> {
    let in_graph = |e: CodecError| e.context(format!("graph '{}'", graph.name));

    let initializers = graph
        .initializers
        .iter()
        .map(|t| save_tensor(builder, t))
        .collect::<Result<Vec<_>, _>>()
        .map_err(in_graph)?;
    let initializers = builder.create_vector_of_tables(&initializers);

    let node_args = graph
        .node_args
        .iter()
        .map(|v| save_value_info(builder, v))
        .collect::<Result<Vec<_>, _>>()
        .map_err(in_graph)?;
    let node_args = builder.create_vector_of_tables(&node_args);

    let nodes = graph
        .nodes
        .iter()
        .map(|n| save_node(builder, n))
        .collect::<Result<Vec<_>, _>>()
        .map_err(in_graph)?;
    let nodes = builder.create_vector_of_tables(&nodes);

    let inputs = builder.create_vector_of_strings(&graph.inputs);
    let outputs = builder.create_vector_of_strings(&graph.outputs);
    let name = builder.create_string(&graph.name);
    let doc_string = graph.doc_string.as_deref().map(|d| builder.create_string(d));
    let max_node_index = u32::try_from(graph.max_node_index()).map_err(|_| {
        CodecError::InvalidArgument(format!(
            "graph '{}': node index {} does not fit the format",
            graph.name,
            graph.max_node_index()
        ))
    })?;

    tracing::debug!(
        "saved graph '{}': {} nodes, {} initializers, {} node args",
        graph.name,
        graph.nodes.len(),
        graph.initializers.len(),
        graph.node_args.len()
    );

    Ok(fbs::Graph::create(
        builder,
        &fbs::GraphArgs {
            name: Some(name),
            doc_string,
            initializers: Some(initializers),
            node_args: Some(node_args),
            nodes: Some(nodes),
            inputs: Some(inputs),
            outputs: Some(outputs),
            max_node_index,
        },
    ))
}

/// Saves one node. `GRAPH` attributes take their body from the node.
pub fn save_node(builder: &mut OrtBuilder, node: &Node) -> Result<Offset<fbs::Node>, CodecError> {
    let in_node = |e: CodecError| e.context(format!("node '{}'", node.name));

    let attributes = node
        .attributes
        .iter()
        .map(|attr| {
            let body = node
                .subgraph(&attr.name)
                .map(|g| g as &dyn SubgraphSaver);
            save_attribute(builder, attr, body)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(in_node)?;
    let attributes = builder.create_vector_of_tables(&attributes);

    let inputs = builder.create_vector_of_strings(&node.inputs);
    let outputs = builder.create_vector_of_strings(&node.outputs);
    let name = builder.create_string(&node.name);
    let op_type = builder.create_string(&node.op_type);
    let domain = builder.create_string(&node.domain);
    let doc_string = node.doc_string.as_deref().map(|d| builder.create_string(d));
    let index = u32::try_from(node.index).map_err(|_| {
        CodecError::InvalidArgument(format!(
            "node '{}': index {} does not fit the format",
            node.name, node.index
        ))
    })?;

    tracing::trace!("saved node '{}' ({})", node.name, node.op_type);

    Ok(fbs::Node::create(
        builder,
        &fbs::NodeArgs {
            name: Some(name),
            doc_string,
            domain: Some(domain),
            index,
            op_type: Some(op_type),
            inputs: Some(inputs),
            outputs: Some(outputs),
            attributes: Some(attributes),
        },
    ))
}

// ── Load ───────────────────────────────────────────────────────────

/// Loads the sub-graphs of one node, one nesting level below its graph.
pub struct NodeLoader<'c> {
    graph: String,
    node_index: usize,
    node_name: String,
    depth: usize,
    config: &'c CodecConfig,
}

impl<'c> NodeLoader<'c> {
    pub fn new(
        graph: impl Into<String>,
        node_index: usize,
        node_name: impl Into<String>,
        depth: usize,
        config: &'c CodecConfig,
    ) -> Self {
        Self {
            graph: graph.into(),
            node_index,
            node_name: node_name.into(),
            depth,
            config,
        }
    }
}

impl SubgraphLoader for NodeLoader<'_> {
    type Subgraph = Graph;

    fn load_subgraph(
        &mut self,
        attribute_name: &str,
        fbs_graph: Table<'_, fbs::Graph>,
    ) -> Result<Graph, CodecError> {
        let span = tracing::debug_span!(
            "subgraph",
            graph = %self.graph,
            node = %self.node_name,
            attribute = attribute_name,
            depth = self.depth + 1
        );
        let _guard = span.enter();

        let parent = ParentLink {
            graph: self.graph.clone(),
            node_index: self.node_index,
            node_name: self.node_name.clone(),
            attribute: attribute_name.to_owned(),
        };
        load_graph(fbs_graph, Some(parent), self.config, self.depth + 1)
    }
}

fn load_names(names: Option<StrVector<'_>>, what: &str) -> Result<Vec<String>, CodecError> {
    let Some(names) = names else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(names.len());
    for (i, entry) in names.iter().enumerate() {
        let name = entry?
            .ok_or_else(|| CodecError::MalformedInput(format!("{what} {i} is null")))?;
        out.push(name.to_owned());
    }
    Ok(out)
}

/// Loads a graph at nesting level `depth` (0 for the model's main graph).
pub fn load_graph(
    fbs_graph: Table<'_, fbs::Graph>,
    parent: Option<ParentLink>,
    config: &CodecConfig,
    depth: usize,
) -> Result<Graph, CodecError> {
    let name = fbs_graph.name()?.unwrap_or_default().to_owned();
    if depth > config.max_subgraph_depth {
        return Err(CodecError::MalformedInput(format!(
            "graph '{name}' is nested {depth} levels deep, limit is {}",
            config.max_subgraph_depth
        )));
    }
    let in_graph = |e: CodecError| e.context(format!("graph '{name}'"));

    let mut graph = Graph::new(name.clone());
    graph.doc_string = fbs_graph.doc_string()?.map(str::to_owned);
    graph.parent = parent;

    if let Some(fbs_initializers) = fbs_graph.initializers()? {
        for (i, entry) in fbs_initializers.iter().enumerate() {
            let fbs_tensor = entry?.ok_or_else(|| {
                in_graph(CodecError::MalformedInput(format!("initializer {i} is null")))
            })?;
            let tensor = load_tensor(&fbs_tensor).map_err(in_graph)?;
            if config.verify_raw_data_size {
                check_raw_data_size(&tensor).map_err(in_graph)?;
            }
            graph.initializers.push(tensor);
        }
    }

    if let Some(fbs_node_args) = fbs_graph.node_args()? {
        for (i, entry) in fbs_node_args.iter().enumerate() {
            let fbs_value_info = entry?.ok_or_else(|| {
                in_graph(CodecError::MalformedInput(format!("node arg {i} is null")))
            })?;
            graph
                .node_args
                .push(load_value_info(&fbs_value_info).map_err(in_graph)?);
        }
    }

    let max_node_index = fbs_graph.max_node_index()? as usize;
    if let Some(fbs_nodes) = fbs_graph.nodes()? {
        for (i, entry) in fbs_nodes.iter().enumerate() {
            let fbs_node = entry?
                .ok_or_else(|| in_graph(CodecError::MalformedInput(format!("node {i} is null"))))?;
            let node = load_node(&fbs_node, &name, config, depth).map_err(in_graph)?;
            if node.index >= max_node_index {
                return Err(in_graph(CodecError::MalformedInput(format!(
                    "node '{}' has index {}, max_node_index is {max_node_index}",
                    node.name, node.index
                ))));
            }
            graph.nodes.push(node);
        }
    }

    graph.inputs = load_names(fbs_graph.inputs()?, "input").map_err(in_graph)?;
    graph.outputs = load_names(fbs_graph.outputs()?, "output").map_err(in_graph)?;

    tracing::debug!(
        "loaded graph '{}': {} nodes, {} initializers, {} node args",
        graph.name,
        graph.nodes.len(),
        graph.initializers.len(),
        graph.node_args.len()
    );
    Ok(graph)
}

/// Loads one node of graph `graph_name`, attaching any sub-graphs it owns.
pub fn load_node(
    fbs_node: &Table<'_, fbs::Node>,
    graph_name: &str,
    config: &CodecConfig,
    depth: usize,
) -> Result<Node, CodecError> {
    let index = fbs_node.index()? as usize;
    let name = fbs_node.name()?.unwrap_or_default().to_owned();
    let op_type = fbs_node.op_type()?.unwrap_or_default().to_owned();
    let in_node = |e: CodecError| e.context(format!("node '{name}'"));

    let mut node = Node::new(index, name.clone(), op_type);
    node.domain = fbs_node.domain()?.unwrap_or_default().to_owned();
    node.doc_string = fbs_node.doc_string()?.map(str::to_owned);
    node.inputs = load_names(fbs_node.inputs()?, "input").map_err(in_node)?;
    node.outputs = load_names(fbs_node.outputs()?, "output").map_err(in_node)?;

    let mut loader = NodeLoader::new(graph_name, index, name.clone(), depth, config);
    if let Some(fbs_attributes) = fbs_node.attributes()? {
        for (i, entry) in fbs_attributes.iter().enumerate() {
            let fbs_attr = entry?
                .ok_or_else(|| in_node(CodecError::MalformedInput(format!("attribute {i} is null"))))?;
            let loaded = load_attribute(&fbs_attr, &mut loader).map_err(in_node)?;
            let attr = loaded.attribute;

            if config.verify_raw_data_size {
                match &attr.value {
                    AttributeValue::Tensor(t) => check_raw_data_size(t).map_err(in_node)?,
                    AttributeValue::Tensors(ts) => {
                        for t in ts {
                            check_raw_data_size(t).map_err(in_node)?;
                        }
                    }
                    _ => {}
                }
            }

            if let Some(subgraph) = loaded.subgraph {
                if node.subgraph(&attr.name).is_some() {
                    return Err(in_node(CodecError::MalformedInput(format!(
                        "duplicate GRAPH attribute '{}'",
                        attr.name
                    ))));
                }
                node.attach_subgraph(attr.name.clone(), subgraph);
            }
            node.attributes.push(attr);
        }
    }

    tracing::trace!(
        "loaded node '{}' ({}), {} attributes",
        node.name,
        node.op_type,
        node.attributes.len()
    );
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_ir::{
        AttributeProto, DataType, GraphProto, TensorProto, TensorShape, TypeProto, ValueInfoProto,
    };
    use ort_format::root;

    fn float_value(name: &str, dims: &[i64]) -> ValueInfoProto {
        ValueInfoProto::new(
            name,
            TypeProto::tensor(DataType::Float, Some(TensorShape::from_values(dims))),
        )
    }

    fn add_graph(name: &str) -> Graph {
        let mut g = Graph::new(name);
        g.node_args = vec![float_value("x", &[2]), float_value("y", &[2])];
        g.inputs = vec!["x".into()];
        g.outputs = vec!["y".into()];
        let mut add = Node::new(0, "add", "Add");
        add.inputs = vec!["x".into(), "x".into()];
        add.outputs = vec!["y".into()];
        g.nodes.push(add);
        g
    }

    fn roundtrip(graph: &Graph, config: &CodecConfig) -> Result<Graph, CodecError> {
        let mut b = OrtBuilder::new();
        let off = save_graph(&mut b, graph)?;
        let buf = b.finish(off)?;
        load_graph(root::<fbs::Graph>(&buf)?, None, config, 0)
    }

    #[test]
    fn test_flat_graph_roundtrip() {
        let mut g = add_graph("main");
        g.doc_string = Some("adds".into());
        g.initializers
            .push(TensorProto::from_f32("bias", vec![2], vec![1.0, 2.0]));
        g.nodes[0].attributes.push(AttributeProto::new(
            "axes",
            AttributeValue::Ints(vec![0, 2]),
        ));

        let loaded = roundtrip(&g, &CodecConfig::default()).unwrap();
        assert_eq!(loaded.name, "main");
        assert_eq!(loaded.node_args, g.node_args);
        assert_eq!(loaded.inputs, g.inputs);
        assert_eq!(loaded.outputs, g.outputs);
        assert_eq!(loaded.nodes, g.nodes);
        assert_eq!(loaded.initializers.len(), 1);
        assert_eq!(loaded.initializers[0].raw_byte_len(), 8);
    }

    #[test]
    fn test_subgraph_attached_to_node() {
        let mut g = add_graph("main");
        let mut node = Node::new(1, "branch", "If");
        node.attributes.push(AttributeProto::new(
            "then_branch",
            AttributeValue::Graph(GraphProto::stub()),
        ));
        node.attach_subgraph("then_branch", add_graph("then"));
        g.nodes.push(node);

        let loaded = roundtrip(&g, &CodecConfig::default()).unwrap();
        let sub = loaded.nodes[1].subgraph("then_branch").unwrap();
        assert_eq!(sub.name, "then");
        assert_eq!(sub.nodes.len(), 1);
        let parent = sub.parent.as_ref().unwrap();
        assert_eq!(parent.graph, "main");
        assert_eq!(parent.node_index, 1);
        assert_eq!(parent.node_name, "branch");
        assert_eq!(parent.attribute, "then_branch");
        assert_eq!(
            loaded.nodes[1].attributes[0].value,
            AttributeValue::Graph(GraphProto::stub())
        );
    }

    #[test]
    fn test_graph_attribute_without_body() {
        let mut g = add_graph("main");
        g.nodes[0].attributes.push(AttributeProto::new(
            "then_branch",
            AttributeValue::Graph(GraphProto::stub()),
        ));
        let mut b = OrtBuilder::new();
        let err = save_graph(&mut b, &g).unwrap_err();
        assert!(matches!(
            &err,
            CodecError::InvalidArgument(msg) if msg.ends_with("attribute 'then_branch' of type GRAPH: graph is null")
        ));
        assert!(err.to_string().contains("graph 'main': node 'add'"));
    }

    #[test]
    fn test_untyped_node_arg_rejected() {
        let mut g = add_graph("main");
        g.node_args.push(ValueInfoProto::untyped("z"));
        let mut b = OrtBuilder::new();
        let err = save_graph(&mut b, &g).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(msg) if msg.contains("value 'z' has no type")));
    }

    #[test]
    fn test_depth_limit() {
        let mut inner = add_graph("inner");
        for level in 0..3 {
            let mut outer = add_graph(&format!("level{level}"));
            let mut node = Node::new(1, "loop", "Loop");
            node.attributes
                .push(AttributeProto::new("body", AttributeValue::Graph(GraphProto::stub())));
            node.attach_subgraph("body", inner);
            outer.nodes.push(node);
            inner = outer;
        }

        let config = CodecConfig {
            max_subgraph_depth: 3,
            ..CodecConfig::default()
        };
        let loaded = roundtrip(&inner, &config).unwrap();
        assert_eq!(loaded.nesting_depth(), 3);

        let config = CodecConfig {
            max_subgraph_depth: 2,
            ..CodecConfig::default()
        };
        let err = roundtrip(&inner, &config).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(msg) if msg.contains("limit is 2")));
    }

    #[test]
    fn test_node_index_beyond_max() {
        let mut b = OrtBuilder::new();
        let name = b.create_string("n");
        let node = fbs::Node::create(
            &mut b,
            &fbs::NodeArgs {
                name: Some(name),
                index: 5,
                ..Default::default()
            },
        );
        let nodes = b.create_vector_of_tables(&[node]);
        let graph = fbs::Graph::create(
            &mut b,
            &fbs::GraphArgs {
                nodes: Some(nodes),
                max_node_index: 2,
                ..Default::default()
            },
        );
        let buf = b.finish(graph).unwrap();
        let err = load_graph(root::<fbs::Graph>(&buf).unwrap(), None, &CodecConfig::default(), 0)
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(msg) if msg.contains("index 5")));
    }

    #[test]
    fn test_raw_size_verification() {
        // A FLOAT[3] initializer carrying only 8 bytes; saving would refuse it.
        let mut b = OrtBuilder::new();
        let name = b.create_string("short");
        let dims = b.create_i64_vector(&[3]);
        let raw = b.create_bytes(&[0u8; 8]);
        let tensor = fbs::Tensor::create(
            &mut b,
            &fbs::TensorArgs {
                name: Some(name),
                dims: Some(dims),
                data_type: fbs::TensorDataType::FLOAT,
                raw_data: Some(raw),
                ..Default::default()
            },
        );
        let initializers = b.create_vector_of_tables(&[tensor]);
        let graph = fbs::Graph::create(
            &mut b,
            &fbs::GraphArgs {
                initializers: Some(initializers),
                ..Default::default()
            },
        );
        let buf = b.finish(graph).unwrap();
        let fbs_graph = root::<fbs::Graph>(&buf).unwrap();

        let lenient = load_graph(fbs_graph, None, &CodecConfig::default(), 0).unwrap();
        assert_eq!(lenient.initializers[0].raw_byte_len(), 8);

        let strict = CodecConfig {
            verify_raw_data_size: true,
            ..CodecConfig::default()
        };
        let err = load_graph(fbs_graph, None, &strict, 0).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(msg) if msg.contains("'short'")));
    }
}
