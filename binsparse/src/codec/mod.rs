//! Per-format encode and decode
//!
//! Each codec maps one matrix layout to metadata plus its three role arrays
//! and back. Codecs never touch storage: [`crate::dispatch`] hands them
//! arrays it has already read, and persists what they encode.

mod compressed;
mod coo;

pub use compressed::{CscCodec, CsrCodec};
pub use coo::CooCodec;

use binsparse_core::{BinsparseError, BinsparseMetadata, Group, MatrixFormat, Result, TypedArray};
use hashbrown::HashMap;
use tracing::warn;

use crate::matrix::Matrix;
use crate::options::Representation;

/// Metadata and borrowed role arrays for one matrix
#[derive(Debug, Clone)]
pub struct EncodedMatrix<'a> {
    pub metadata: BinsparseMetadata,
    /// Role name and array, in the format's role order
    pub arrays: [(&'static str, &'a TypedArray); 3],
}

impl<'a> EncodedMatrix<'a> {
    /// Record each array's physical dtype against its role
    fn new(
        format: MatrixFormat,
        shape: (usize, usize),
        arrays: [(&'static str, &'a TypedArray); 3],
    ) -> Result<Self> {
        let data_types = arrays
            .iter()
            .map(|(role, array)| (*role, array.dtype()))
            .collect();
        Ok(Self {
            metadata: BinsparseMetadata::new(format, shape, data_types)?,
            arrays,
        })
    }
}

/// Role arrays retrieved from storage for decoding
#[derive(Debug, Default)]
pub struct RoleArrays {
    arrays: HashMap<&'static str, TypedArray>,
}

impl RoleArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a fresh copy of every role array `format` needs from `group`
    pub fn read_from<G: Group>(group: &G, format: MatrixFormat) -> Result<Self> {
        let mut arrays = Self::new();
        for role in format.roles() {
            arrays.insert(role, group.read_array(role)?);
        }
        Ok(arrays)
    }

    pub fn insert(&mut self, role: &'static str, array: TypedArray) {
        self.arrays.insert(role, array);
    }

    /// Remove and return the array for `role`
    pub fn take(&mut self, role: &'static str) -> Result<TypedArray> {
        self.arrays
            .remove(role)
            .ok_or_else(|| BinsparseError::NodeNotFound {
                key: role.to_string(),
            })
    }
}

/// Encode and decode for one storage format
pub trait FormatCodec {
    /// Format tag this codec writes and accepts
    const FORMAT: MatrixFormat;

    /// In-memory layout this codec encodes
    type Matrix;

    /// Build metadata and extract role arrays; side-effect free
    fn encode(matrix: &Self::Matrix) -> Result<EncodedMatrix<'_>>;

    /// Rebuild the native layout from metadata and role arrays
    fn build(metadata: &BinsparseMetadata, arrays: RoleArrays) -> Result<Matrix>;

    /// Check metadata, then rebuild the matrix in the requested representation
    ///
    /// Fails with `FormatMismatch` when the metadata declares another format.
    /// Array dtypes are taken from the arrays themselves; a disagreeing tag in
    /// the metadata is logged and otherwise ignored.
    fn decode(
        metadata: &BinsparseMetadata,
        arrays: RoleArrays,
        representation: Representation,
    ) -> Result<Matrix> {
        if metadata.format != Self::FORMAT {
            return Err(BinsparseError::FormatMismatch {
                expected: Self::FORMAT,
                found: metadata.format,
            });
        }
        for (role, declared) in &metadata.data_types {
            if let Some(array) = arrays.arrays.get(role) {
                if array.dtype() != *declared {
                    warn!(
                        format = %Self::FORMAT,
                        role,
                        declared = %declared,
                        physical = %array.dtype(),
                        "declared dtype differs from stored array, using stored dtype"
                    );
                }
            }
        }

        let matrix = Self::build(metadata, arrays)?;
        match representation {
            Representation::Native => Ok(matrix),
            Representation::Triplets => matrix.to_triplets().map(Matrix::Triplets),
        }
    }
}
