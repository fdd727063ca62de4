// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ort-format
//!
//! The ORT binary container: a compact, self-contained buffer of tables,
//! strings, and vectors addressed by absolute 32-bit offsets.
//!
//! - [`OrtBuilder`] — append-only writer producing typed [`Offset`] handles.
//! - [`Table`] — lazily-read view of one table with per-slot presence.
//! - [`schema`] — the table kinds, their slots, `*Args` constructors, and
//!   the open wire enumerations.
//!
//! # Layout
//! ```text
//! 0        4        6          8            12
//! ┌────────┬────────┬──────────┬────────────┬──────────────────────────┐
//! │ "ORTM" │ ver u16│ root kind│ root offset│ objects, children first  │
//! └────────┴────────┴──────────┴────────────┴──────────────────────────┘
//!
//! table:   u8 slot_count │ u32 presence mask │ slot_count × u64 slot
//! string:  u32 len │ utf-8 bytes          bytes:   u32 len │ bytes
//! i64/f32: u32 count │ packed LE values   offsets: u32 count │ u32 × count
//! ```
//!
//! All integers are little-endian. Offset `0` is null. A reference always
//! points strictly before the object that holds it.
//!
//! # Example
//! ```
//! use ort_format::schema::{OperatorSetId, OperatorSetIdArgs};
//! use ort_format::{root, OrtBuilder};
//!
//! let mut b = OrtBuilder::new();
//! let domain = b.create_string("ai.onnx");
//! let opset = OperatorSetId::create(&mut b, &OperatorSetIdArgs { domain: Some(domain), version: 17 });
//! let buf = b.finish(opset).unwrap();
//!
//! let table = root::<OperatorSetId>(&buf).unwrap();
//! assert_eq!(table.version().unwrap(), 17);
//! ```

mod builder;
mod error;
mod reader;
pub mod schema;

pub use builder::{ByteVec, F32Vec, I64Vec, Offset, OrtBuilder, Str, StrVec, TableVec, TableWriter};
pub use error::FormatError;
pub use reader::{read_header, root, Header, StrVector, Table, TableVector};
pub use schema::TableKind;

/// Magic bytes at the start of every buffer.
pub const MAGIC: [u8; 4] = *b"ORTM";

/// Format revision written by this crate and the only one it reads.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed buffer header.
pub const HEADER_SIZE: usize = 12;

/// Size of a table's slot count and presence mask.
pub const TABLE_HEADER_SIZE: usize = 5;

/// Most slots a table can carry (one presence bit each).
pub const MAX_SLOTS: usize = 32;
