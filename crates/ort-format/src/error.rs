// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for building and reading ORT format buffers.

/// Errors raised by [`crate::OrtBuilder`] and the buffer readers.
///
/// Everything except [`FormatError::BufferTooLarge`] means the bytes being
/// read are not a well-formed buffer.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A read ran past the end of the buffer.
    #[error("read of {needed} bytes at offset {offset} is out of bounds (buffer length {len})")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The buffer does not start with the format magic.
    #[error("bad magic number: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    /// The buffer was written by an incompatible format revision.
    #[error("unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u16, supported: u16 },

    /// The root table is not of the requested kind.
    #[error("root table is kind {found}, expected {expected} ({expected_name})")]
    RootKindMismatch {
        expected: u16,
        expected_name: &'static str,
        found: u16,
    },

    /// A reference does not point strictly backward into the buffer.
    #[error("offset {target} referenced from {from} does not point backward")]
    BadReference { from: usize, target: usize },

    /// A table header declares more slots than a presence mask can cover.
    #[error("table at offset {offset} declares {slots} slots (max {max})")]
    TooManySlots {
        offset: usize,
        slots: usize,
        max: usize,
    },

    /// A string is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// A stored scalar does not fit the field's declared width.
    #[error("field '{field}' holds {value}, which does not fit its type")]
    ScalarOverflow { field: &'static str, value: i64 },

    /// The builder grew past what a 32-bit offset can address.
    #[error("buffer grew to {size} bytes, beyond the 32-bit offset range")]
    BufferTooLarge { size: usize },
}

impl FormatError {
    /// Returns `true` for errors raised while writing rather than reading.
    pub fn is_builder_error(&self) -> bool {
        matches!(self, FormatError::BufferTooLarge { .. })
    }
}
