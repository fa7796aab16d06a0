//! binsparse-core - binsparse format definitions
//!
//! This crate provides the pieces of the binsparse interchange format that do
//! not touch storage: the canonical dtype registry, dtype-tagged flat arrays,
//! format tags and array role names, the metadata schema, structural
//! validation, and the traits a storage backend implements.

pub mod array;
pub mod dtype;
pub mod error;
pub mod format;
pub mod options;
pub mod traits;
pub mod validation;

pub use array::TypedArray;
pub use dtype::{dtype_of, tag_of, Dtype, DTYPE_TAGS};
pub use error::{BinsparseError, Result};
pub use format::{roles, BinsparseMetadata, MatrixFormat, METADATA_KEY};
pub use options::CreationOptions;
pub use traits::{
    AttributeBackend, AttributeCapability, Element, Group, IndexElement, RawAttribute,
};
pub use validation::{validate_indices, validate_pointers};
