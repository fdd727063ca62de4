// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

pub mod convert;
pub mod dump;
pub mod inspect;

use ort_codec::CodecConfig;
use std::path::Path;

/// Installs the global subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the codec configuration, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CodecConfig> {
    match path {
        Some(path) => {
            let config = CodecConfig::from_file(path)?;
            tracing::info!("loaded codec config from '{}'", path.display());
            Ok(config)
        }
        None => Ok(CodecConfig::default()),
    }
}
