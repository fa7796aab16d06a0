//! Coordinate-format sparse matrix

use binsparse_core::{
    roles, validate_indices, BinsparseError, Element, IndexElement, Result, TypedArray,
};

use super::TripletMatrix;

/// Sparse matrix in COO layout: parallel row, column and value arrays
///
/// Entries are kept exactly as given. No sorting and no merging of duplicate
/// coordinates is done, so a round trip through storage reproduces the
/// arrays element for element.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    shape: (usize, usize),
    row_indices: TypedArray,
    col_indices: TypedArray,
    values: TypedArray,
}

impl CooMatrix {
    /// Build from dtype-tagged arrays
    ///
    /// Both index arrays must be integer arrays of the same length as
    /// `values`, with every entry inside `shape`.
    pub fn try_new(
        shape: (usize, usize),
        row_indices: TypedArray,
        col_indices: TypedArray,
        values: TypedArray,
    ) -> Result<Self> {
        check_len(roles::INDICES_0, &row_indices, values.len())?;
        check_len(roles::INDICES_1, &col_indices, values.len())?;
        let rows = row_indices.to_indices(roles::INDICES_0)?;
        validate_indices(roles::INDICES_0, &rows, shape.0)?;
        let cols = col_indices.to_indices(roles::INDICES_1)?;
        validate_indices(roles::INDICES_1, &cols, shape.1)?;

        Ok(Self {
            shape,
            row_indices,
            col_indices,
            values,
        })
    }

    /// Build from typed vectors
    pub fn from_triplets<I: IndexElement, T: Element>(
        shape: (usize, usize),
        row_indices: Vec<I>,
        col_indices: Vec<I>,
        values: Vec<T>,
    ) -> Result<Self> {
        Self::try_new(shape, row_indices.into(), col_indices.into(), values.into())
    }

    /// Matrix dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row index of each entry
    pub fn row_indices(&self) -> &TypedArray {
        &self.row_indices
    }

    /// Column index of each entry
    pub fn col_indices(&self) -> &TypedArray {
        &self.col_indices
    }

    pub fn values(&self) -> &TypedArray {
        &self.values
    }

    /// Convert to the canonical triplet representation
    ///
    /// Fails with `DuplicateEntry` if two entries share a coordinate.
    pub fn to_triplets(&self) -> Result<TripletMatrix> {
        TripletMatrix::from_entries(
            self.shape,
            self.row_indices.to_indices(roles::INDICES_0)?,
            self.col_indices.to_indices(roles::INDICES_1)?,
            self.values.clone(),
        )
    }
}

pub(super) fn check_len(role: &'static str, array: &TypedArray, expected: usize) -> Result<()> {
    if array.len() != expected {
        return Err(BinsparseError::MalformedIndexArray {
            role,
            reason: format!(
                "has {} entries, values has {expected}",
                array.len()
            ),
        });
    }
    Ok(())
}
