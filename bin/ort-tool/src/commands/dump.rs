// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ort-tool dump` command: decode an ORT file back to a JSON description.
//!
//! Sub-graphs are re-inlined into their `GRAPH` attributes, so the output
//! can be fed straight back into `convert`.

use ort_codec::CodecConfig;
use std::path::PathBuf;

pub fn execute(model: PathBuf, output: Option<PathBuf>, config: &CodecConfig) -> anyhow::Result<()> {
    let loaded = ort_codec::load_model_from_path(&model, config)?;
    let json = loaded.to_proto().to_json_pretty()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json.as_bytes())
                .map_err(|e| anyhow::anyhow!("cannot write '{}': {e}", path.display()))?;
            tracing::info!("wrote JSON dump to '{}'", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
