// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ort-tool convert` command: JSON model description to ORT format.

use graph_ir::Model;
use std::path::PathBuf;

pub fn execute(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let model = Model::from_json_file(&input).map_err(|e| {
        anyhow::anyhow!("failed to read model from '{}': {e}", input.display())
    })?;

    ort_codec::save_model_to_path(&model, &output)?;
    let size = std::fs::metadata(&output)?.len();

    println!(
        "  Converted '{}' -> '{}' ({} bytes)",
        input.display(),
        output.display(),
        size
    );
    println!(
        "  {} nodes, {} initializers, {} sub-graphs (depth {})",
        model.graph.nodes.len(),
        model.graph.initializers.len(),
        model.graph.subgraph_count(),
        model.graph.nesting_depth(),
    );
    Ok(())
}
