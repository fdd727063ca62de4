// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for ORT format save and load.

use ort_format::FormatError;
use std::path::PathBuf;

/// Errors that can occur while saving or loading an ORT format model.
///
/// Any error aborts the whole save or load. A builder that has seen an
/// error holds garbage and must be dropped.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The IR holds something the format cannot represent (an untyped
    /// value, a non-tensor type, an unsupported attribute kind, a `GRAPH`
    /// attribute without a body).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The buffer breaks the format's presence contract or is corrupt.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The byte-packing service rejected a tensor payload.
    #[error("cannot pack tensor '{tensor}': {source}")]
    Packing {
        tensor: String,
        #[source]
        source: tensor_core::TensorError,
    },

    /// Reading or writing a model file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CodecError {
    /// Prefixes the message of an `InvalidArgument` or `MalformedInput`
    /// with where it happened. Other variants pass through unchanged.
    pub fn context(self, location: impl std::fmt::Display) -> Self {
        match self {
            CodecError::InvalidArgument(msg) => {
                CodecError::InvalidArgument(format!("{location}: {msg}"))
            }
            CodecError::MalformedInput(msg) => {
                CodecError::MalformedInput(format!("{location}: {msg}"))
            }
            other => other,
        }
    }
}

impl From<FormatError> for CodecError {
    fn from(e: FormatError) -> Self {
        if e.is_builder_error() {
            CodecError::InvalidArgument(e.to_string())
        } else {
            CodecError::MalformedInput(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_mapping() {
        let read: CodecError = FormatError::InvalidUtf8 { offset: 40 }.into();
        assert!(matches!(read, CodecError::MalformedInput(_)));
        let write: CodecError = FormatError::BufferTooLarge { size: 1 << 33 }.into();
        assert!(matches!(write, CodecError::InvalidArgument(_)));
    }

    #[test]
    fn test_context() {
        let e = CodecError::InvalidArgument("graph is null".into()).context("node 'loop0'");
        assert_eq!(e.to_string(), "invalid argument: node 'loop0': graph is null");
        let e = CodecError::Config("x".into()).context("ignored");
        assert_eq!(e.to_string(), "configuration error: x");
    }

    #[test]
    fn test_collaborator_errors_keep_source() {
        use std::error::Error as _;

        let e = CodecError::Io {
            path: PathBuf::from("/models/missing.ort"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            e.to_string(),
            "I/O error on '/models/missing.ort': no such file"
        );
        assert!(e.source().is_some());

        let e = CodecError::Packing {
            tensor: "W".into(),
            source: tensor_core::TensorError::BufferSizeMismatch {
                expected: 24,
                actual: 16,
            },
        };
        assert_eq!(
            e.to_string(),
            "cannot pack tensor 'W': size mismatch: expected 24 bytes, got 16"
        );
        assert!(e.source().is_some());
    }
}
