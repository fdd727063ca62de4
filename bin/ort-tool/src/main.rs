// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ort-tool
//!
//! Command-line interface for the ORT format codec.
//!
//! ## Usage
//! ```bash
//! # Convert a JSON model description to ORT format
//! ort-tool convert --input ./demos/loop_model.json --output loop_model.ort
//!
//! # Print header, graph summary, and per-node detail
//! ort-tool inspect --model loop_model.ort
//!
//! # Decode back to JSON
//! ort-tool dump --model loop_model.ort --output roundtrip.json
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ort-tool",
    about = "Convert, inspect, and dump ORT format models",
    version,
    author
)]
struct Cli {
    /// Path to a TOML codec configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON model description into an ORT format file.
    Convert {
        /// Path to the JSON model.
        #[arg(short, long)]
        input: PathBuf,

        /// Path of the ORT file to write.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Inspect an ORT format file: header, graph summary, and nodes.
    Inspect {
        /// Path to the ORT file.
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Decode an ORT format file and print it as JSON.
    Dump {
        /// Path to the ORT file.
        #[arg(short, long)]
        model: PathBuf,

        /// Write the JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert { input, output } => commands::convert::execute(input, output),
        Commands::Inspect { model } => commands::inspect::execute(model, &config),
        Commands::Dump { model, output } => commands::dump::execute(model, output, &config),
    }
}
