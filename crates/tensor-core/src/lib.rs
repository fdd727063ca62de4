// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Element types and constant-tensor payloads shared by the IR and the
//! ORT format codec.
//!
//! This crate provides:
//! - [`DataType`] — the ONNX element types, with their wire codes and widths.
//! - [`TensorData`] — the typed payload a constant tensor arrives with.
//! - [`pack`] — flattens any payload into the canonical little-endian raw
//!   byte buffer the ORT format stores for non-string tensors.
//!
//! Packing never reinterprets memory: every element is written with
//! `to_le_bytes`, so the output is identical on every host.

mod dtype;
mod error;
mod tensor;

pub use dtype::DataType;
pub use error::TensorError;
pub use tensor::{expected_byte_size, num_elements, pack, TensorData};
