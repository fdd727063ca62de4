// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON model description.
//!
//! [`ModelProto`] is the plain-data form of a model: everything is inline,
//! including the bodies of control-flow operators, which sit inside their
//! `GRAPH` attributes. It is what `ort-tool convert` reads and `ort-tool
//! dump` writes.
//!
//! # Format
//! ```json
//! {
//!   "ir_version": 8,
//!   "opset_imports": [{ "domain": "", "version": 17 }],
//!   "producer_name": "demo",
//!   "graph": {
//!     "name": "main",
//!     "inputs": [{ "name": "x", "type": { "value": { "tensor": { "elem_type": "float" } } } }],
//!     "outputs": [ ... ],
//!     "initializers": [ ... ],
//!     "nodes": [
//!       { "name": "relu", "op_type": "Relu", "inputs": ["x"], "outputs": ["y"] }
//!     ]
//!   }
//! }
//! ```

use crate::{AttributeProto, GraphError, TensorProto, ValueInfoProto};
use std::path::Path;

/// Name given to the stub payload a `GRAPH` attribute keeps once its body
/// has been moved into the owning node.
pub const SUBGRAPH_STUB_NAME: &str = "Empty graph proto from deserialization of ORT format model";

/// One operator invocation.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeProto {
    #[serde(default)]
    pub name: String,
    pub op_type: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeProto>,
}

/// A computation graph with every sub-graph inlined.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphProto {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeProto>,
    #[serde(default)]
    pub initializers: Vec<TensorProto>,
    #[serde(default)]
    pub inputs: Vec<ValueInfoProto>,
    #[serde(default)]
    pub outputs: Vec<ValueInfoProto>,
    /// Types of intermediate values.
    #[serde(default)]
    pub value_infos: Vec<ValueInfoProto>,
}

impl GraphProto {
    /// The stub left in a `GRAPH` attribute whose body is owned by a node.
    pub fn stub() -> Self {
        Self {
            name: SUBGRAPH_STUB_NAME.to_string(),
            ..Self::default()
        }
    }
}

/// An operator set the model depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OperatorSetId {
    /// Empty for the default ONNX domain.
    #[serde(default)]
    pub domain: String,
    pub version: i64,
}

/// Top-level model description, deserialized from JSON.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelProto {
    pub ir_version: i64,
    #[serde(default)]
    pub opset_imports: Vec<OperatorSetId>,
    #[serde(default)]
    pub producer_name: String,
    #[serde(default)]
    pub producer_version: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub model_version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    pub graph: GraphProto,
}

impl ModelProto {
    /// Loads a model description from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a model description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let model: Self = serde_json::from_str(json)?;
        Ok(model)
    }

    /// Serialises the description to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeValue, TypeProto};
    use tensor_core::DataType;

    fn sample_model_json() -> &'static str {
        r#"{
            "ir_version": 8,
            "opset_imports": [{ "version": 17 }],
            "producer_name": "unit-test",
            "graph": {
                "name": "main",
                "inputs": [
                    { "name": "cond", "type": { "value": { "tensor": { "elem_type": "bool", "shape": { "dims": [] } } } } }
                ],
                "outputs": [
                    { "name": "y", "type": { "value": { "tensor": { "elem_type": "float" } } } }
                ],
                "nodes": [
                    {
                        "name": "if0",
                        "op_type": "If",
                        "inputs": ["cond"],
                        "outputs": ["y"],
                        "attributes": [
                            { "name": "then_branch", "value": { "graph": { "name": "then" } } },
                            { "name": "else_branch", "value": { "graph": { "name": "else" } } }
                        ]
                    }
                ]
            }
        }"#
    }

    #[test]
    fn test_parse_model() {
        let m = ModelProto::from_json(sample_model_json()).unwrap();
        assert_eq!(m.ir_version, 8);
        assert_eq!(m.opset_imports, vec![OperatorSetId { domain: String::new(), version: 17 }]);
        assert_eq!(m.graph.name, "main");
        assert_eq!(m.graph.nodes.len(), 1);
        let node = &m.graph.nodes[0];
        assert_eq!(node.attributes.len(), 2);
        assert!(matches!(&node.attributes[0].value, AttributeValue::Graph(g) if g.name == "then"));
        assert_eq!(
            m.graph.outputs[0].r#type,
            Some(TypeProto::tensor(DataType::Float, None))
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let m = ModelProto::from_json(sample_model_json()).unwrap();
        let json = m.to_json_pretty().unwrap();
        let back = ModelProto::from_json(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_parse_error() {
        let err = ModelProto::from_json("{ \"ir_version\": ").unwrap_err();
        assert!(matches!(err, GraphError::ParseError(_)));
    }

    #[test]
    fn test_stub() {
        let stub = GraphProto::stub();
        assert_eq!(stub.name, SUBGRAPH_STUB_NAME);
        assert!(stub.nodes.is_empty());
    }
}
