// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model parsing and graph construction.

/// Errors that can occur when building the in-memory graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The model file could not be read.
    #[error("failed to read model: {0}")]
    ReadError(#[from] std::io::Error),

    /// The model JSON is malformed.
    #[error("failed to parse model: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Two value infos with the same name disagree.
    #[error("graph '{graph}': conflicting value info for '{value}'")]
    ConflictingValueInfo { graph: String, value: String },

    /// A node carries two graph attributes with the same name, so the
    /// sub-graphs cannot be keyed by attribute.
    #[error("node '{node}' declares graph attribute '{attribute}' more than once")]
    DuplicateAttribute { node: String, attribute: String },
}
