// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Whole-model round-trips through the ORT format, in memory and on disk.

use graph_ir::{
    AttributeValue, DataType, GraphProto, Model, ModelProto, TensorData, SUBGRAPH_STUB_NAME,
};
use ort_codec::ort_format::schema as fbs;
use ort_codec::ort_format::{self, OrtBuilder};
use ort_codec::{
    load_model, load_model_from_path, load_value_info, save_model, save_model_to_path, CodecConfig,
    CodecError,
};
use std::path::PathBuf;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/loop_model.json")
}

fn demo_model() -> Model {
    Model::from_json_file(&demo_path()).expect("demo model should parse")
}

/// Model: If(then: Loop(body: Add), else: Identity), with a raw `W` at the
/// top level and a raw FLOAT[2] initializer in `then` and in `body`.
const NESTED_JSON: &str = r#"{
    "ir_version": 8,
    "opset_imports": [{ "version": 17 }],
    "producer_name": "roundtrip-test",
    "graph": {
        "name": "main",
        "initializers": [
            { "name": "W", "dims": [2, 3], "data_type": "float",
              "data": { "raw": [0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0] } }
        ],
        "inputs": [
            { "name": "cond", "type": { "value": { "tensor": { "elem_type": "bool" } } } }
        ],
        "outputs": [
            { "name": "y", "type": { "value": { "tensor": { "elem_type": "float",
              "shape": { "dims": [ { "value": { "param": "N" } }, { "value": { "value": 3 } }, {} ] } } } } }
        ],
        "nodes": [
            { "name": "branch", "op_type": "If", "inputs": ["cond"], "outputs": ["y"],
              "attributes": [
                { "name": "then_branch", "value": { "graph": {
                    "name": "then",
                    "initializers": [
                        { "name": "then_w", "dims": [2], "data_type": "float",
                          "data": { "raw": [0,0,128,63, 0,0,0,64] } }
                    ],
                    "outputs": [ { "name": "t", "type": { "value": { "tensor": { "elem_type": "float" } } } } ],
                    "nodes": [
                        { "name": "repeat", "op_type": "Loop", "outputs": ["t"],
                          "attributes": [
                            { "name": "body", "value": { "graph": {
                                "name": "body",
                                "initializers": [
                                    { "name": "body_w", "dims": [2], "data_type": "float",
                                      "data": { "raw": [0,0,64,64, 0,0,128,64] } }
                                ],
                                "inputs": [ { "name": "a", "type": { "value": { "tensor": { "elem_type": "float" } } } } ],
                                "outputs": [ { "name": "b", "type": { "value": { "tensor": { "elem_type": "float" } } } } ],
                                "nodes": [
                                    { "name": "add", "op_type": "Add", "inputs": ["a", "a"], "outputs": ["b"],
                                      "attributes": [ { "name": "axes", "value": { "ints": [0, 2] } } ] }
                                ]
                            } } }
                          ] }
                    ]
                } } },
                { "name": "else_branch", "value": { "graph": {
                    "name": "else",
                    "outputs": [ { "name": "e", "type": { "value": { "tensor": { "elem_type": "float" } } } } ],
                    "nodes": [ { "name": "id", "op_type": "Identity", "outputs": ["e"] } ]
                } } }
              ] }
        ]
    }
}"#;

fn nested_model() -> Model {
    Model::from_proto(ModelProto::from_json(NESTED_JSON).unwrap()).unwrap()
}

// ── Round-trips ────────────────────────────────────────────────────

#[test]
fn test_nested_model_roundtrip() {
    let model = nested_model();
    assert_eq!(model.graph.nesting_depth(), 2);

    let buf = save_model(&model).unwrap();
    let loaded = load_model(&buf, &CodecConfig::default()).unwrap();
    assert_eq!(loaded, model);
    assert_eq!(loaded.to_proto(), model.to_proto());

    let branch = loaded.graph.node("branch").unwrap();
    let then = branch.subgraph("then_branch").unwrap();
    let body = then.node("repeat").unwrap().subgraph("body").unwrap();
    assert_eq!(body.parent.as_ref().unwrap().graph, "then");
    assert_eq!(
        body.node("add").unwrap().attribute("axes").unwrap().value,
        AttributeValue::Ints(vec![0, 2])
    );
    match &branch.attribute("then_branch").unwrap().value {
        AttributeValue::Graph(stub) => assert_eq!(stub.name, SUBGRAPH_STUB_NAME),
        other => panic!("expected a graph stub, got {other:?}"),
    }
}

#[test]
fn test_subgraph_initializers_roundtrip() {
    let loaded = load_model(&save_model(&nested_model()).unwrap(), &CodecConfig::default()).unwrap();
    let then = loaded
        .graph
        .node("branch")
        .unwrap()
        .subgraph("then_branch")
        .unwrap();
    let body = then.node("repeat").unwrap().subgraph("body").unwrap();

    for (graph, name, raw) in [
        (then, "then_w", [0u8, 0, 128, 63, 0, 0, 0, 64]),
        (body, "body_w", [0u8, 0, 64, 64, 0, 0, 128, 64]),
    ] {
        assert_eq!(graph.initializers.len(), 1, "graph '{}'", graph.name);
        let w = &graph.initializers[0];
        assert_eq!(w.name, name);
        assert_eq!(w.dims, vec![2]);
        assert_eq!(w.data_type, DataType::Float);
        assert_eq!(w.data, TensorData::Raw(raw.to_vec()));
    }
    assert_eq!(body.inputs, vec!["a".to_string()]);
    let else_graph = loaded
        .graph
        .node("branch")
        .unwrap()
        .subgraph("else_branch")
        .unwrap();
    assert!(else_graph.initializers.is_empty());
}

#[test]
fn test_raw_initializer_preserved() {
    let loaded = load_model(&save_model(&nested_model()).unwrap(), &CodecConfig::default()).unwrap();
    let w = &loaded.graph.initializers[0];
    assert_eq!(w.name, "W");
    assert_eq!(w.dims, vec![2, 3]);
    assert_eq!(w.data_type, DataType::Float);
    assert_eq!(w.data, TensorData::Raw(vec![0u8; 24]));
}

#[test]
fn test_typed_initializer_comes_back_raw() {
    let model = demo_model();
    let loaded = load_model(&save_model(&model).unwrap(), &CodecConfig::default()).unwrap();
    let trip = loaded
        .graph
        .initializers
        .iter()
        .find(|t| t.name == "trip_count")
        .unwrap();
    assert_eq!(trip.data, TensorData::Raw(4i64.to_le_bytes().to_vec()));
    assert_eq!(loaded.graph.nodes, model.graph.nodes);
    assert_eq!(loaded.graph.nesting_depth(), 2);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.ort");
    let model = nested_model();

    save_model_to_path(&model, &path).unwrap();
    let header = ort_format::read_header(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(header.root_kind, <fbs::Model as ort_format::TableKind>::ID);

    let loaded = load_model_from_path(&path, &CodecConfig::default()).unwrap();
    assert_eq!(loaded, model);
}

#[test]
fn test_save_is_deterministic() {
    let model = nested_model();
    assert_eq!(save_model(&model).unwrap(), save_model(&model).unwrap());
}

// ── Rejections ─────────────────────────────────────────────────────

#[test]
fn test_untyped_output_rejected() {
    let mut proto = ModelProto::from_json(NESTED_JSON).unwrap();
    proto.graph.outputs[0].r#type = None;
    let model = Model::from_proto(proto).unwrap();
    let err = save_model(&model).unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(msg) if msg.contains("value 'y' has no type")));
}

#[test]
fn test_missing_subgraph_body_rejected() {
    let mut model = nested_model();
    model.graph.nodes[0].subgraphs.clear();
    let err = save_model(&model).unwrap_err();
    assert!(err
        .to_string()
        .contains("attribute 'then_branch' of type GRAPH: graph is null"));
}

#[test]
fn test_graphs_attribute_rejected() {
    let mut model = nested_model();
    model.graph.nodes[0].attributes.push(graph_ir::AttributeProto::new(
        "branches",
        AttributeValue::Graphs(vec![GraphProto::default()]),
    ));
    assert!(matches!(
        save_model(&model),
        Err(CodecError::InvalidArgument(_))
    ));
}

#[test]
fn test_depth_limit_on_load() {
    let buf = save_model(&nested_model()).unwrap();
    let shallow = CodecConfig {
        max_subgraph_depth: 1,
        ..CodecConfig::default()
    };
    let err = load_model(&buf, &shallow).unwrap_err();
    assert!(matches!(err, CodecError::MalformedInput(msg) if msg.contains("limit is 1")));
}

#[test]
fn test_truncated_buffer() {
    let buf = save_model(&nested_model()).unwrap();
    for len in [0, 5, 11, buf.len() / 2, buf.len() - 1] {
        let err = load_model(&buf[..len], &CodecConfig::default()).unwrap_err();
        assert!(
            matches!(err, CodecError::MalformedInput(_)),
            "truncated to {len} bytes: {err}"
        );
    }
}

#[test]
fn test_bad_magic() {
    let mut buf = save_model(&nested_model()).unwrap();
    buf[0] = b'X';
    assert!(matches!(
        load_model(&buf, &CodecConfig::default()),
        Err(CodecError::MalformedInput(_))
    ));
}

#[test]
fn test_tensor_type_without_payload() {
    let mut b = OrtBuilder::new();
    let name = b.create_string("x");
    let type_info = fbs::TypeInfo::create(
        &mut b,
        &fbs::TypeInfoArgs {
            denotation: None,
            value_type: fbs::TypeInfoValue::TENSOR_TYPE,
            value: None,
        },
    );
    let value_info = fbs::ValueInfo::create(
        &mut b,
        &fbs::ValueInfoArgs {
            name: Some(name),
            doc_string: None,
            r#type: Some(type_info),
        },
    );
    let buf = b.finish(value_info).unwrap();
    let err = load_value_info(&ort_format::root::<fbs::ValueInfo>(&buf).unwrap()).unwrap_err();
    assert!(matches!(err, CodecError::MalformedInput(msg) if msg.starts_with("value 'x'")));
}

#[test]
fn test_consistent_raw_passes_strict_check() {
    let buf = save_model(&nested_model()).unwrap();
    let strict = CodecConfig {
        verify_raw_data_size: true,
        ..CodecConfig::default()
    };
    assert!(load_model(&buf, &strict).is_ok());
}
