// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ort-tool inspect` command: display the container header, a model
//! summary, and a per-node table for every graph.

use graph_ir::Graph;
use ort_codec::ort_format::{self, schema};
use ort_codec::CodecConfig;
use std::path::PathBuf;

pub fn execute(model: PathBuf, config: &CodecConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              ort-tool · Model Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let mmap = ort_codec::map_model_file(&model)?;
    let header = ort_format::read_header(&mmap)?;
    let loaded = ort_codec::load_model(&mmap, config)
        .map_err(|e| anyhow::anyhow!("failed to load model from '{}': {e}", model.display()))?;

    // ── Container ──────────────────────────────────────────────
    println!("  File: {} ({} bytes)", model.display(), mmap.len());
    println!(
        "  Format version: {}  root: {} @ {}",
        header.version,
        schema::kind_name(header.root_kind).unwrap_or("<unknown>"),
        header.root_offset,
    );
    println!();

    // ── Summary ────────────────────────────────────────────────
    for line in loaded.summary().lines() {
        println!("  {line}");
    }
    println!();

    // ── Per-Node Detail ────────────────────────────────────────
    print_nodes(&loaded.graph, 0);
    Ok(())
}

fn print_nodes(graph: &Graph, level: usize) {
    let indent = "  ".repeat(level + 1);
    match &graph.parent {
        Some(parent) => println!("{indent}Graph '{}' (owned by {parent})", graph.name),
        None => println!("{indent}Graph '{}'", graph.name),
    }
    println!(
        "{indent}{:<4} {:<24} {:<16} {:>4} {:>4}  {}",
        "Idx", "Name", "Op", "#In", "#Out", "Attributes",
    );
    println!("{indent}{}", "-".repeat(72));

    for node in &graph.nodes {
        let attrs = node
            .attributes
            .iter()
            .map(|a| format!("{}:{}", a.name, a.attr_type()))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{indent}{:<4} {:<24} {:<16} {:>4} {:>4}  {}",
            node.index,
            truncate(&node.name, 24),
            truncate(&node.op_type, 16),
            node.inputs.len(),
            node.outputs.len(),
            attrs,
        );
    }
    println!();

    for node in &graph.nodes {
        for sub in node.subgraphs.values() {
            print_nodes(sub, level + 1);
        }
    }
}

/// Truncates a string to `max_len` characters with an ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
