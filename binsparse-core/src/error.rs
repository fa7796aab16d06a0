//! Error types for binsparse operations

use std::path::PathBuf;

use thiserror::Error;

use crate::dtype::Dtype;
use crate::format::MatrixFormat;

/// Errors that can occur while encoding, decoding or persisting a matrix
#[derive(Debug, Error)]
pub enum BinsparseError {
    /// A physical element type outside the canonical dtype set
    #[error("unsupported dtype: {dtype}")]
    UnsupportedDtype { dtype: String },

    /// A metadata dtype tag that names no canonical dtype
    #[error("unknown dtype tag {tag:?} for role '{role}'")]
    UnknownDtypeTag { role: String, tag: String },

    /// `write` was handed a representation the codec cannot encode
    #[error("no binsparse encoding for matrix representation '{representation}'")]
    UnsupportedMatrixType { representation: &'static str },

    /// Stored format tag is not one of COO, CSR, CSC
    #[error("unrecognized binsparse format {format:?}")]
    UnrecognizedFormat { format: String },

    /// A codec was handed metadata declaring another format
    #[error("format mismatch: expected {expected}, metadata declares {found}")]
    FormatMismatch {
        expected: MatrixFormat,
        found: MatrixFormat,
    },

    /// Decode target token names no known representation
    #[error("cannot decode into representation {representation:?}")]
    UnsupportedRepresentation { representation: String },

    /// No metadata blob under the expected attribute key
    #[error("no '{key}' metadata on node '{node}'")]
    MetadataNotFound { node: String, key: String },

    /// Metadata is present but violates the schema
    #[error("invalid binsparse metadata: {reason}")]
    InvalidMetadata { reason: String },

    /// Pointer array violates the compressed-format invariants
    #[error("malformed {format} pointer array '{role}': {reason}")]
    MalformedPointerArray {
        format: MatrixFormat,
        role: &'static str,
        reason: String,
    },

    /// Index array has the wrong length, dtype or out-of-range entries
    #[error("malformed index array '{role}': {reason}")]
    MalformedIndexArray { role: &'static str, reason: String },

    /// Two entries share a coordinate in a representation that forbids it
    #[error("duplicate entry at ({row}, {col})")]
    DuplicateEntry { row: usize, col: usize },

    /// A storage key that cannot address a node
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A child node expected by the codec does not exist
    #[error("no node at key '{key}'")]
    NodeNotFound { key: String },

    /// The key exists but holds the other kind of node
    #[error("node at key '{key}' is not {expected}")]
    NodeKindMismatch { key: String, expected: &'static str },

    /// Attribute value the backend cannot store natively
    #[error("backend stores text attributes only; cannot store structured value under '{key}'")]
    UnsupportedAttributeValue { key: String },

    /// Array bytes do not decode as the declared dtype
    #[error("corrupt {dtype} array data: {reason}")]
    CorruptArray { dtype: Dtype, reason: String },

    /// Filesystem failure in a storage backend
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Attribute or descriptor (de)serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BinsparseError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BinsparseError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_metadata(reason: impl Into<String>) -> Self {
        BinsparseError::InvalidMetadata {
            reason: reason.into(),
        }
    }
}

/// Result type for binsparse operations
pub type Result<T> = std::result::Result<T, BinsparseError>;
