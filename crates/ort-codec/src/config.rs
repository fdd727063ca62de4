// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Codec configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! max_subgraph_depth = 32
//! verify_raw_data_size = true
//! ```

use crate::CodecError;
use std::path::Path;

/// Default bound on sub-graph nesting when loading.
pub const DEFAULT_MAX_SUBGRAPH_DEPTH: usize = 32;

/// Options for loading ORT format models. Saving has none.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Deepest sub-graph nesting accepted before the buffer is rejected.
    pub max_subgraph_depth: usize,
    /// Check every loaded non-string tensor's raw byte length against its
    /// dims and element size.
    pub verify_raw_data_size: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_subgraph_depth: DEFAULT_MAX_SUBGRAPH_DEPTH,
            verify_raw_data_size: false,
        }
    }
}

impl CodecConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CodecError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CodecError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, CodecError> {
        toml::from_str(toml_str)
            .map_err(|e| CodecError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, CodecError> {
        toml::to_string_pretty(self)
            .map_err(|e| CodecError::Config(format!("TOML serialise error: {e}")))
    }
}
