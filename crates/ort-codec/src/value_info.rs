// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Value-info codec.

use crate::type_info::{load_type_info, save_type_info};
use crate::CodecError;
use graph_ir::ValueInfoProto;
use ort_format::schema as fbs;
use ort_format::{Offset, OrtBuilder, Table};

/// Saves a named value. The format has no representation for an untyped
/// value, so one is rejected.
pub fn save_value_info(
    builder: &mut OrtBuilder,
    value_info: &ValueInfoProto,
) -> Result<Offset<fbs::ValueInfo>, CodecError> {
    let type_proto = value_info.r#type.as_ref().ok_or_else(|| {
        CodecError::InvalidArgument(format!("value '{}' has no type", value_info.name))
    })?;
    let type_info = save_type_info(builder, type_proto)
        .map_err(|e| e.context(format!("value '{}'", value_info.name)))?;
    let name = builder.create_string(&value_info.name);
    let doc_string = value_info
        .doc_string
        .as_deref()
        .map(|d| builder.create_string(d));

    Ok(fbs::ValueInfo::create(
        builder,
        &fbs::ValueInfoArgs {
            name: Some(name),
            doc_string,
            r#type: Some(type_info),
        },
    ))
}

pub fn load_value_info(
    fbs_value_info: &Table<'_, fbs::ValueInfo>,
) -> Result<ValueInfoProto, CodecError> {
    let name = fbs_value_info.name()?.unwrap_or_default().to_owned();
    let doc_string = fbs_value_info.doc_string()?.map(str::to_owned);
    let fbs_type = fbs_value_info.type_()?.ok_or_else(|| {
        CodecError::MalformedInput(format!("value info '{name}' has no type"))
    })?;
    let type_proto = load_type_info(&fbs_type).map_err(|e| e.context(format!("value '{name}'")))?;

    Ok(ValueInfoProto {
        name,
        doc_string,
        r#type: Some(type_proto),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_ir::{Dimension, TensorShape, TypeProto};
    use ort_format::root;
    use tensor_core::DataType;

    #[test]
    fn test_roundtrip() {
        let mut info = ValueInfoProto::new(
            "x",
            TypeProto::tensor(
                DataType::Float,
                Some(TensorShape::new(vec![Dimension::symbolic("N"), Dimension::fixed(3)])),
            ),
        );
        info.doc_string = Some("input image".into());

        let mut b = OrtBuilder::new();
        let off = save_value_info(&mut b, &info).unwrap();
        let buf = b.finish(off).unwrap();
        let back = load_value_info(&root::<fbs::ValueInfo>(&buf).unwrap()).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_untyped_rejected() {
        let mut b = OrtBuilder::new();
        let err = save_value_info(&mut b, &ValueInfoProto::untyped("x")).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(msg) if msg == "value 'x' has no type"));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let mut b = OrtBuilder::new();
        let name = b.create_string("x");
        let off = fbs::ValueInfo::create(
            &mut b,
            &fbs::ValueInfoArgs {
                name: Some(name),
                ..Default::default()
            },
        );
        let buf = b.finish(off).unwrap();
        let err = load_value_info(&root::<fbs::ValueInfo>(&buf).unwrap()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }
}
