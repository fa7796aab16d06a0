use binsparse_core::{roles, BinsparseMetadata, MatrixFormat, Result};

use super::{EncodedMatrix, FormatCodec, RoleArrays};
use crate::matrix::{CooMatrix, Matrix};

/// COO codec: `indices_0`, `indices_1`, `values`
///
/// Entries pass through in stored order; duplicates are neither merged nor
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CooCodec;

impl FormatCodec for CooCodec {
    const FORMAT: MatrixFormat = MatrixFormat::Coo;
    type Matrix = CooMatrix;

    fn encode(matrix: &CooMatrix) -> Result<EncodedMatrix<'_>> {
        EncodedMatrix::new(
            Self::FORMAT,
            matrix.shape(),
            [
                (roles::INDICES_0, matrix.row_indices()),
                (roles::INDICES_1, matrix.col_indices()),
                (roles::VALUES, matrix.values()),
            ],
        )
    }

    fn build(metadata: &BinsparseMetadata, mut arrays: RoleArrays) -> Result<Matrix> {
        CooMatrix::try_new(
            metadata.shape,
            arrays.take(roles::INDICES_0)?,
            arrays.take(roles::INDICES_1)?,
            arrays.take(roles::VALUES)?,
        )
        .map(Matrix::Coo)
    }
}
