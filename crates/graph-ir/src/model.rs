// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model: one top-level [`Graph`] plus the outer container fields.

use crate::{Graph, GraphError, ModelProto, OperatorSetId};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub ir_version: i64,
    pub opset_imports: Vec<OperatorSetId>,
    pub producer_name: String,
    pub producer_version: String,
    pub domain: String,
    pub model_version: i64,
    pub doc_string: Option<String>,
    pub graph: Graph,
}

impl Model {
    /// Builds a model from its plain description.
    pub fn from_proto(proto: ModelProto) -> Result<Self, GraphError> {
        let graph = Graph::from_proto(proto.graph)?;
        tracing::debug!(
            "model '{}': {} nodes, {} sub-graphs",
            graph.name,
            graph.nodes.len(),
            graph.subgraph_count()
        );
        Ok(Self {
            ir_version: proto.ir_version,
            opset_imports: proto.opset_imports,
            producer_name: proto.producer_name,
            producer_version: proto.producer_version,
            domain: proto.domain,
            model_version: proto.model_version,
            doc_string: proto.doc_string,
            graph,
        })
    }

    /// Reads a JSON model description and builds the model.
    pub fn from_json_file(path: &Path) -> Result<Self, GraphError> {
        Self::from_proto(ModelProto::from_file(path)?)
    }

    pub fn to_proto(&self) -> ModelProto {
        ModelProto {
            ir_version: self.ir_version,
            opset_imports: self.opset_imports.clone(),
            producer_name: self.producer_name.clone(),
            producer_version: self.producer_version.clone(),
            domain: self.domain.clone(),
            model_version: self.model_version,
            doc_string: self.doc_string.clone(),
            graph: self.graph.to_proto(),
        }
    }

    /// Returns a summary string describing the model.
    pub fn summary(&self) -> String {
        let opsets = self
            .opset_imports
            .iter()
            .map(|o| {
                let domain = if o.domain.is_empty() { "ai.onnx" } else { &o.domain };
                format!("{domain}:{}", o.version)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Model (IR v{}, producer '{}' {}, opsets [{}])\n{}",
            self.ir_version,
            self.producer_name,
            self.producer_version,
            opsets,
            self.graph.summary(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_proto() {
        let json = r#"{
            "ir_version": 9,
            "opset_imports": [{ "version": 18 }, { "domain": "com.microsoft", "version": 1 }],
            "producer_name": "unit-test",
            "producer_version": "0.1",
            "graph": { "name": "main" }
        }"#;
        let proto = ModelProto::from_json(json).unwrap();
        let model = Model::from_proto(proto.clone()).unwrap();
        assert_eq!(model.graph.name, "main");
        assert_eq!(model.to_proto(), proto);

        let summary = model.summary();
        assert!(summary.contains("IR v9"));
        assert!(summary.contains("ai.onnx:18, com.microsoft:1"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Model::from_json_file(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, GraphError::ReadError(_)));
    }
}
