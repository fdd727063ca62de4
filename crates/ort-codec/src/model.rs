// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Whole-model save and load, in memory and on disk.

use crate::graph::{load_graph, save_graph};
use crate::{CodecConfig, CodecError};
use graph_ir::{Model, OperatorSetId};
use memmap2::Mmap;
use ort_format::schema as fbs;
use ort_format::OrtBuilder;
use std::fs::File;
use std::path::Path;

/// Serialises a model into a finished ORT format buffer.
pub fn save_model(model: &Model) -> Result<Vec<u8>, CodecError> {
    let estimate = model.graph.initializer_bytes() + 4096;
    let mut b = OrtBuilder::with_capacity(estimate);

    let graph = save_graph(&mut b, &model.graph)?;
    let opsets = model
        .opset_imports
        .iter()
        .map(|o| {
            let domain = b.create_string(&o.domain);
            fbs::OperatorSetId::create(
                &mut b,
                &fbs::OperatorSetIdArgs {
                    domain: Some(domain),
                    version: o.version,
                },
            )
        })
        .collect::<Vec<_>>();
    let opset_import = b.create_vector_of_tables(&opsets);
    let producer_name = b.create_string(&model.producer_name);
    let producer_version = b.create_string(&model.producer_version);
    let domain = b.create_string(&model.domain);
    let doc_string = model.doc_string.as_deref().map(|d| b.create_string(d));

    let root = fbs::Model::create(
        &mut b,
        &fbs::ModelArgs {
            ir_version: model.ir_version,
            opset_import: Some(opset_import),
            producer_name: Some(producer_name),
            producer_version: Some(producer_version),
            domain: Some(domain),
            model_version: model.model_version,
            doc_string,
            graph: Some(graph),
        },
    );
    let buf = b.finish(root)?;

    tracing::debug!(
        "saved model '{}': {} bytes, {} sub-graphs",
        model.graph.name,
        buf.len(),
        model.graph.subgraph_count()
    );
    Ok(buf)
}

/// Decodes a model from a finished ORT format buffer.
pub fn load_model(buf: &[u8], config: &CodecConfig) -> Result<Model, CodecError> {
    let fbs_model = ort_format::root::<fbs::Model>(buf)?;

    let mut opset_imports = Vec::new();
    if let Some(fbs_opsets) = fbs_model.opset_import()? {
        for (i, entry) in fbs_opsets.iter().enumerate() {
            let opset = entry?.ok_or_else(|| {
                CodecError::MalformedInput(format!("opset import {i} is null"))
            })?;
            opset_imports.push(OperatorSetId {
                domain: opset.domain()?.unwrap_or_default().to_owned(),
                version: opset.version()?,
            });
        }
    }

    let fbs_graph = fbs_model
        .graph()?
        .ok_or_else(|| CodecError::MalformedInput("model has no graph".to_string()))?;
    let graph = load_graph(fbs_graph, None, config, 0)?;

    tracing::debug!(
        "loaded model '{}': {} bytes, {} sub-graphs",
        graph.name,
        buf.len(),
        graph.subgraph_count()
    );

    Ok(Model {
        ir_version: fbs_model.ir_version()?,
        opset_imports,
        producer_name: fbs_model.producer_name()?.unwrap_or_default().to_owned(),
        producer_version: fbs_model.producer_version()?.unwrap_or_default().to_owned(),
        domain: fbs_model.domain()?.unwrap_or_default().to_owned(),
        model_version: fbs_model.model_version()?,
        doc_string: fbs_model.doc_string()?.map(str::to_owned),
        graph,
    })
}

/// Saves a model to `path`, replacing any existing file.
pub fn save_model_to_path(model: &Model, path: &Path) -> Result<(), CodecError> {
    let buf = save_model(model)?;
    std::fs::write(path, &buf).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("wrote ORT model '{}' ({} bytes)", path.display(), buf.len());
    Ok(())
}

/// Memory-maps a model file read-only.
///
/// The map can be handed to [`ort_format::read_header`] and [`load_model`]
/// without copying the file. It must not outlive edits to the file.
pub fn map_model_file(path: &Path) -> Result<Mmap, CodecError> {
    let io_err = |source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    // SAFETY: the map is read-only; decoding copies everything it keeps.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    tracing::info!("mapped ORT model '{}' ({} bytes)", path.display(), mmap.len());
    Ok(mmap)
}

/// Loads a model from a memory-mapped file.
pub fn load_model_from_path(path: &Path, config: &CodecConfig) -> Result<Model, CodecError> {
    let mmap = map_model_file(path)?;
    load_model(&mmap, config)
}
