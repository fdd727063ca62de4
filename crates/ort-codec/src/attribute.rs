// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Attribute codec.
//!
//! Saving builds the payload for the attribute's kind first, then every
//! kind goes through [`finish_attribute`], so the written record always
//! carries a name, a type tag, and exactly the one payload slot that tag
//! names.
//!
//! `GRAPH` is the only kind that leaves this module: the body is written by
//! a [`SubgraphSaver`] and read back by a [`SubgraphLoader`], and the
//! loaded attribute keeps only a stub ([`GraphProto::stub`]).

use crate::context::{SubgraphLoader, SubgraphSaver};
use crate::tensor::{load_tensor, save_tensor};
use crate::CodecError;
use graph_ir::{AttributeProto, AttributeValue, GraphProto};
use ort_format::schema::{self as fbs, AttributeType};
use ort_format::{F32Vec, I64Vec, Offset, OrtBuilder, Str, StrVec, Table, TableVec};

/// A loaded attribute plus the sub-graph its `GRAPH` payload produced.
#[derive(Debug)]
pub struct LoadedAttribute<S> {
    pub attribute: AttributeProto,
    /// Set exactly when the attribute is of kind `GRAPH`.
    pub subgraph: Option<S>,
}

/// Already-written payload of one attribute.
enum Payload {
    Float(f32),
    Int(i64),
    String(Offset<Str>),
    Tensor(Offset<fbs::Tensor>),
    Graph(Offset<fbs::Graph>),
    Floats(Offset<F32Vec>),
    Ints(Offset<I64Vec>),
    Strings(Offset<StrVec>),
    Tensors(Offset<TableVec<fbs::Tensor>>),
}

impl Payload {
    fn attr_type(&self) -> AttributeType {
        match self {
            Payload::Float(_) => AttributeType::FLOAT,
            Payload::Int(_) => AttributeType::INT,
            Payload::String(_) => AttributeType::STRING,
            Payload::Tensor(_) => AttributeType::TENSOR,
            Payload::Graph(_) => AttributeType::GRAPH,
            Payload::Floats(_) => AttributeType::FLOATS,
            Payload::Ints(_) => AttributeType::INTS,
            Payload::Strings(_) => AttributeType::STRINGS,
            Payload::Tensors(_) => AttributeType::TENSORS,
        }
    }
}

/// Saves one attribute.
///
/// `subgraph` supplies the body of a `GRAPH` attribute; the stub held in
/// the attribute itself is never written.
pub fn save_attribute(
    builder: &mut OrtBuilder,
    attr: &AttributeProto,
    subgraph: Option<&dyn SubgraphSaver>,
) -> Result<Offset<fbs::Attribute>, CodecError> {
    let payload = match &attr.value {
        AttributeValue::Float(f) => Payload::Float(*f),
        AttributeValue::Int(i) => Payload::Int(*i),
        AttributeValue::String(s) => Payload::String(builder.create_string(s)),
        AttributeValue::Tensor(t) => Payload::Tensor(save_tensor(builder, t)?),
        AttributeValue::Graph(_) => {
            let saver = subgraph.ok_or_else(|| {
                CodecError::InvalidArgument(format!(
                    "attribute '{}' of type GRAPH: graph is null",
                    attr.name
                ))
            })?;
            Payload::Graph(saver.save_subgraph(builder)?)
        }
        AttributeValue::Floats(values) => Payload::Floats(builder.create_f32_vector(values)),
        AttributeValue::Ints(values) => Payload::Ints(builder.create_i64_vector(values)),
        AttributeValue::Strings(values) => {
            Payload::Strings(builder.create_vector_of_strings(values))
        }
        AttributeValue::Tensors(tensors) => {
            let offsets = tensors
                .iter()
                .map(|t| save_tensor(builder, t))
                .collect::<Result<Vec<_>, _>>()?;
            Payload::Tensors(builder.create_vector_of_tables(&offsets))
        }
        AttributeValue::Graphs(_) => {
            return Err(CodecError::InvalidArgument(format!(
                "attribute '{}': unsupported type {}",
                attr.name,
                attr.attr_type()
            )))
        }
    };
    Ok(finish_attribute(builder, attr, payload))
}

fn finish_attribute(
    builder: &mut OrtBuilder,
    attr: &AttributeProto,
    payload: Payload,
) -> Offset<fbs::Attribute> {
    let name = builder.create_string(&attr.name);
    let doc_string = attr.doc_string.as_deref().map(|d| builder.create_string(d));
    let mut args = fbs::AttributeArgs {
        name: Some(name),
        doc_string,
        r#type: payload.attr_type(),
        ..Default::default()
    };
    match payload {
        Payload::Float(f) => args.f = Some(f),
        Payload::Int(i) => args.i = Some(i),
        Payload::String(s) => args.s = Some(s),
        Payload::Tensor(t) => args.t = Some(t),
        Payload::Graph(g) => args.g = Some(g),
        Payload::Floats(v) => args.floats = Some(v),
        Payload::Ints(v) => args.ints = Some(v),
        Payload::Strings(v) => args.strings = Some(v),
        Payload::Tensors(v) => args.tensors = Some(v),
    }
    fbs::Attribute::create(builder, &args)
}

/// Loads one attribute. A `GRAPH` payload is handed to `loader`.
///
/// Every declared kind requires its payload slot; a missing one means the
/// buffer is corrupt.
pub fn load_attribute<L: SubgraphLoader + ?Sized>(
    fbs_attr: &Table<'_, fbs::Attribute>,
    loader: &mut L,
) -> Result<LoadedAttribute<L::Subgraph>, CodecError> {
    let name = fbs_attr.name()?.unwrap_or_default().to_owned();
    let doc_string = fbs_attr.doc_string()?.map(str::to_owned);
    let attr_type = fbs_attr.type_()?;
    let missing = |field: &str| {
        CodecError::MalformedInput(format!(
            "attribute '{name}' of type {attr_type} has a null {field}"
        ))
    };

    let mut subgraph = None;
    let value = match attr_type {
        AttributeType::FLOAT => AttributeValue::Float(fbs_attr.f()?.ok_or_else(|| missing("f"))?),
        AttributeType::INT => AttributeValue::Int(fbs_attr.i()?.ok_or_else(|| missing("i"))?),
        AttributeType::STRING => {
            AttributeValue::String(fbs_attr.s()?.ok_or_else(|| missing("s"))?.to_owned())
        }
        AttributeType::TENSOR => {
            let fbs_tensor = fbs_attr.t()?.ok_or_else(|| missing("t"))?;
            AttributeValue::Tensor(load_tensor(&fbs_tensor)?)
        }
        AttributeType::GRAPH => {
            let fbs_graph = fbs_attr.g()?.ok_or_else(|| missing("g"))?;
            subgraph = Some(loader.load_subgraph(&name, fbs_graph)?);
            AttributeValue::Graph(GraphProto::stub())
        }
        AttributeType::FLOATS => {
            AttributeValue::Floats(fbs_attr.floats()?.ok_or_else(|| missing("floats"))?)
        }
        AttributeType::INTS => {
            AttributeValue::Ints(fbs_attr.ints()?.ok_or_else(|| missing("ints"))?)
        }
        AttributeType::STRINGS => {
            let fbs_strings = fbs_attr.strings()?.ok_or_else(|| missing("strings"))?;
            let mut strings = Vec::with_capacity(fbs_strings.len());
            for entry in fbs_strings.iter() {
                strings.push(entry?.ok_or_else(|| missing("strings element"))?.to_owned());
            }
            AttributeValue::Strings(strings)
        }
        AttributeType::TENSORS => {
            let fbs_tensors = fbs_attr.tensors()?.ok_or_else(|| missing("tensors"))?;
            let mut tensors = Vec::with_capacity(fbs_tensors.len());
            for entry in fbs_tensors.iter() {
                let fbs_tensor = entry?.ok_or_else(|| missing("tensors element"))?;
                tensors.push(load_tensor(&fbs_tensor)?);
            }
            AttributeValue::Tensors(tensors)
        }
        other => {
            return Err(CodecError::InvalidArgument(format!(
                "attribute '{name}': unsupported type {other}"
            )))
        }
    };

    Ok(LoadedAttribute {
        attribute: AttributeProto {
            name,
            doc_string,
            value,
        },
        subgraph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_ir::TensorProto;
    use ort_format::root;
    use tensor_core::DataType;

    /// Writes a graph table holding only a name.
    struct NamedGraph(&'static str);

    impl SubgraphSaver for NamedGraph {
        fn save_subgraph(&self, builder: &mut OrtBuilder) -> Result<Offset<fbs::Graph>, CodecError> {
            let name = builder.create_string(self.0);
            Ok(fbs::Graph::create(
                builder,
                &fbs::GraphArgs {
                    name: Some(name),
                    ..Default::default()
                },
            ))
        }
    }

    /// Records which attributes asked for a sub-graph.
    #[derive(Default)]
    struct RecordingLoader {
        calls: Vec<String>,
    }

    impl SubgraphLoader for RecordingLoader {
        type Subgraph = String;

        fn load_subgraph(
            &mut self,
            attribute_name: &str,
            fbs_graph: Table<'_, fbs::Graph>,
        ) -> Result<String, CodecError> {
            self.calls.push(attribute_name.to_owned());
            Ok(fbs_graph.name()?.unwrap_or_default().to_owned())
        }
    }

    fn save(attr: &AttributeProto, sub: Option<&dyn SubgraphSaver>) -> Vec<u8> {
        let mut b = OrtBuilder::new();
        let off = save_attribute(&mut b, attr, sub).unwrap();
        b.finish(off).unwrap()
    }

    fn load(buf: &[u8]) -> Result<LoadedAttribute<String>, CodecError> {
        let mut loader = RecordingLoader::default();
        load_attribute(&root::<fbs::Attribute>(buf).unwrap(), &mut loader)
    }

    #[test]
    fn test_ints_roundtrip() {
        let attr = AttributeProto::new("axes", AttributeValue::Ints(vec![0, 2]));
        let loaded = load(&save(&attr, None)).unwrap();
        assert_eq!(loaded.attribute, attr);
        assert_eq!(loaded.attribute.attr_type(), graph_ir::AttributeType::Ints);
        assert!(loaded.subgraph.is_none());
    }

    #[test]
    fn test_every_value_kind_roundtrips() {
        let tensor = TensorProto::raw("t", DataType::Int64, vec![1], 7i64.to_le_bytes().to_vec());
        let values = vec![
            AttributeValue::Float(0.5),
            AttributeValue::Int(-3),
            AttributeValue::String("SAME_UPPER".into()),
            AttributeValue::Tensor(tensor.clone()),
            AttributeValue::Floats(vec![1.0, 2.0]),
            AttributeValue::Ints(vec![]),
            AttributeValue::Strings(vec!["a".into(), "b".into()]),
            AttributeValue::Tensors(vec![tensor.clone(), tensor]),
        ];
        for value in values {
            let mut attr = AttributeProto::new("a", value);
            attr.doc_string = Some("doc".into());
            let loaded = load(&save(&attr, None)).unwrap();
            assert_eq!(loaded.attribute, attr);
        }
    }

    #[test]
    fn test_only_matching_slot_written() {
        let attr = AttributeProto::new("alpha", AttributeValue::Float(0.0));
        let buf = save(&attr, None);
        let a = root::<fbs::Attribute>(&buf).unwrap();
        assert_eq!(a.type_().unwrap(), AttributeType::FLOAT);
        assert_eq!(a.f().unwrap(), Some(0.0));
        for slot in fbs::Attribute::I..=fbs::Attribute::TENSORS {
            assert!(!a.is_present(slot), "slot {slot} should be absent");
        }
    }

    #[test]
    fn test_graph_attribute_uses_saver_and_loader() {
        let attr = AttributeProto::new("body", AttributeValue::Graph(GraphProto::default()));
        let buf = save(&attr, Some(&NamedGraph("loop_body")));

        let mut loader = RecordingLoader::default();
        let loaded = load_attribute(&root::<fbs::Attribute>(&buf).unwrap(), &mut loader).unwrap();
        assert_eq!(loader.calls, vec!["body".to_string()]);
        assert_eq!(loaded.subgraph.as_deref(), Some("loop_body"));
        assert_eq!(
            loaded.attribute.value,
            AttributeValue::Graph(GraphProto::stub())
        );
    }

    #[test]
    fn test_graph_without_saver() {
        let attr = AttributeProto::new("then_branch", AttributeValue::Graph(GraphProto::default()));
        let mut b = OrtBuilder::new();
        let err = save_attribute(&mut b, &attr, None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidArgument(msg) if msg == "attribute 'then_branch' of type GRAPH: graph is null"
        ));
    }

    #[test]
    fn test_graphs_kind_rejected() {
        let attr = AttributeProto::new("branches", AttributeValue::Graphs(vec![]));
        let mut b = OrtBuilder::new();
        let err = save_attribute(&mut b, &attr, None).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(msg) if msg.contains("GRAPHS")));
    }

    #[test]
    fn test_unsupported_tags_rejected_on_load() {
        for tag in [
            AttributeType::UNDEFINED,
            AttributeType::GRAPHS,
            AttributeType::SPARSE_TENSOR,
            AttributeType(99),
            AttributeType(-1),
        ] {
            let mut b = OrtBuilder::new();
            let off = fbs::Attribute::create(
                &mut b,
                &fbs::AttributeArgs {
                    r#type: tag,
                    ..Default::default()
                },
            );
            let buf = b.finish(off).unwrap();
            assert!(
                matches!(load(&buf), Err(CodecError::InvalidArgument(_))),
                "tag {tag} should be rejected"
            );
        }
    }

    #[test]
    fn test_null_payload_is_malformed() {
        for tag in [
            AttributeType::FLOAT,
            AttributeType::INT,
            AttributeType::STRING,
            AttributeType::TENSOR,
            AttributeType::GRAPH,
            AttributeType::FLOATS,
            AttributeType::INTS,
            AttributeType::STRINGS,
            AttributeType::TENSORS,
        ] {
            let mut b = OrtBuilder::new();
            let off = fbs::Attribute::create(
                &mut b,
                &fbs::AttributeArgs {
                    r#type: tag,
                    ..Default::default()
                },
            );
            let buf = b.finish(off).unwrap();
            assert!(
                matches!(load(&buf), Err(CodecError::MalformedInput(_))),
                "tag {tag} with no payload should be malformed"
            );
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_scalar_value() -> impl Strategy<Value = AttributeValue> {
            prop_oneof![
                any::<f32>()
                    .prop_filter("NaN never compares equal", |f| !f.is_nan())
                    .prop_map(AttributeValue::Float),
                any::<i64>().prop_map(AttributeValue::Int),
                ".{0,16}".prop_map(AttributeValue::String),
                proptest::collection::vec(-1e6f32..1e6f32, 0..8).prop_map(AttributeValue::Floats),
                proptest::collection::vec(any::<i64>(), 0..8).prop_map(AttributeValue::Ints),
                proptest::collection::vec(".{0,6}", 0..5).prop_map(AttributeValue::Strings),
            ]
        }

        proptest! {
            #[test]
            fn prop_scalar_attribute_roundtrip(
                name in "[a-z_]{1,12}",
                value in arb_scalar_value(),
            ) {
                let attr = AttributeProto::new(name, value);
                let loaded = load(&save(&attr, None)).unwrap();
                prop_assert_eq!(loaded.attribute, attr);
            }
        }
    }
}
