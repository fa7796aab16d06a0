use binsparse_core::{roles, BinsparseMetadata, MatrixFormat, Result};

use super::{EncodedMatrix, FormatCodec, RoleArrays};
use crate::matrix::{CscMatrix, CsrMatrix, Matrix};

macro_rules! compressed_codec {
    ($(#[$doc:meta])* $codec:ident, $matrix:ident, $variant:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $codec;

        impl FormatCodec for $codec {
            const FORMAT: MatrixFormat = $matrix::FORMAT;
            type Matrix = $matrix;

            fn encode(matrix: &$matrix) -> Result<EncodedMatrix<'_>> {
                EncodedMatrix::new(
                    Self::FORMAT,
                    matrix.shape(),
                    [
                        (roles::POINTERS_TO_1, matrix.pointers()),
                        (roles::INDICES_1, matrix.indices()),
                        (roles::VALUES, matrix.values()),
                    ],
                )
            }

            /// The pointer array is validated here, before the matrix exists
            fn build(metadata: &BinsparseMetadata, mut arrays: RoleArrays) -> Result<Matrix> {
                $matrix::try_new(
                    metadata.shape,
                    arrays.take(roles::POINTERS_TO_1)?,
                    arrays.take(roles::INDICES_1)?,
                    arrays.take(roles::VALUES)?,
                )
                .map(Matrix::$variant)
            }
        }
    };
}

compressed_codec!(
    /// CSR codec: `pointers_to_1` over rows, column `indices_1`, `values`
    CsrCodec,
    CsrMatrix,
    Csr
);

compressed_codec!(
    /// CSC codec: `pointers_to_1` over columns, row `indices_1`, `values`
    CscCodec,
    CscMatrix,
    Csc
);
