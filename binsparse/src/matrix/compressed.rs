//! Compressed sparse row and column matrices
//!
//! Both layouts share one representation: a pointer array over the
//! compressed (major) axis, a minor-axis index per entry, and the values.
//! They differ only in which axis is major.

use binsparse_core::{
    roles, validate_indices, validate_pointers, Element, IndexElement, MatrixFormat, Result,
    TypedArray,
};

use super::coo::check_len;
use super::TripletMatrix;

#[derive(Debug, Clone, PartialEq)]
struct Compressed {
    shape: (usize, usize),
    pointers: TypedArray,
    indices: TypedArray,
    values: TypedArray,
}

impl Compressed {
    fn try_new(
        format: MatrixFormat,
        shape: (usize, usize),
        pointers: TypedArray,
        indices: TypedArray,
        values: TypedArray,
    ) -> Result<Self> {
        let (major_len, minor_len) = axes(format, shape);

        check_len(roles::INDICES_1, &indices, values.len())?;
        let ptrs = pointers.to_indices(roles::POINTERS_TO_1)?;
        validate_pointers(format, &ptrs, major_len, values.len())?;
        let minor = indices.to_indices(roles::INDICES_1)?;
        validate_indices(roles::INDICES_1, &minor, minor_len)?;

        Ok(Self {
            shape,
            pointers,
            indices,
            values,
        })
    }

    /// Expand the pointer array into one major-axis index per entry
    fn major_indices(&self) -> Result<Vec<usize>> {
        let ptrs = self.pointers.to_indices(roles::POINTERS_TO_1)?;
        let mut major = Vec::with_capacity(self.values.len());
        for (i, span) in ptrs.windows(2).enumerate() {
            major.extend(std::iter::repeat(i).take(span[1] - span[0]));
        }
        Ok(major)
    }
}

/// (major, minor) axis lengths for a compressed format
fn axes(format: MatrixFormat, (rows, cols): (usize, usize)) -> (usize, usize) {
    match format {
        MatrixFormat::Csc => (cols, rows),
        _ => (rows, cols),
    }
}

macro_rules! compressed_matrix {
    ($(#[$doc:meta])* $name:ident, $format:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Compressed);

        impl $name {
            /// Storage format of this layout
            pub const FORMAT: MatrixFormat = $format;

            /// Build from dtype-tagged arrays
            ///
            /// The pointer array is checked before the matrix exists: it must
            /// have one more entry than the compressed axis, start at 0, end at
            /// the number of values and never decrease. Indices must lie inside
            /// the other axis.
            pub fn try_new(
                shape: (usize, usize),
                pointers: TypedArray,
                indices: TypedArray,
                values: TypedArray,
            ) -> Result<Self> {
                Compressed::try_new($format, shape, pointers, indices, values).map(Self)
            }

            /// Build from typed vectors
            pub fn from_parts<I: IndexElement, T: Element>(
                shape: (usize, usize),
                pointers: Vec<I>,
                indices: Vec<I>,
                values: Vec<T>,
            ) -> Result<Self> {
                Self::try_new(shape, pointers.into(), indices.into(), values.into())
            }

            /// Matrix dimensions as (rows, cols)
            pub fn shape(&self) -> (usize, usize) {
                self.0.shape
            }

            /// Number of stored entries
            pub fn nnz(&self) -> usize {
                self.0.values.len()
            }

            /// Offsets into `indices` and `values`, one per major slice plus one
            pub fn pointers(&self) -> &TypedArray {
                &self.0.pointers
            }

            /// Minor-axis index of each entry
            pub fn indices(&self) -> &TypedArray {
                &self.0.indices
            }

            pub fn values(&self) -> &TypedArray {
                &self.0.values
            }
        }
    };
}

compressed_matrix!(
    /// Sparse matrix in CSR layout, compressed over rows
    CsrMatrix,
    MatrixFormat::Csr
);

compressed_matrix!(
    /// Sparse matrix in CSC layout, compressed over columns
    CscMatrix,
    MatrixFormat::Csc
);

impl CsrMatrix {
    /// Convert to the canonical triplet representation
    pub fn to_triplets(&self) -> Result<TripletMatrix> {
        TripletMatrix::from_entries(
            self.0.shape,
            self.0.major_indices()?,
            self.0.indices.to_indices(roles::INDICES_1)?,
            self.0.values.clone(),
        )
    }
}

impl CscMatrix {
    /// Convert to the canonical triplet representation
    pub fn to_triplets(&self) -> Result<TripletMatrix> {
        TripletMatrix::from_entries(
            self.0.shape,
            self.0.indices.to_indices(roles::INDICES_1)?,
            self.0.major_indices()?,
            self.0.values.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsparse_core::BinsparseError;

    // [[1, 0, 2],
    //  [0, 0, 3]]
    fn csr() -> CsrMatrix {
        CsrMatrix::from_parts((2, 3), vec![0i32, 2, 3], vec![0i32, 2, 2], vec![1.0f32, 2.0, 3.0])
            .unwrap()
    }

    #[test]
    fn test_csr_accessors() {
        let m = csr();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.pointers().len(), 3);
        assert_eq!(CsrMatrix::FORMAT, MatrixFormat::Csr);
    }

    #[test]
    fn test_csc_uses_columns_as_major_axis() {
        // Same matrix as `csr()`, column-compressed
        let csc = CscMatrix::from_parts(
            (2, 3),
            vec![0i64, 1, 1, 3],
            vec![0i64, 0, 1],
            vec![1.0f32, 2.0, 3.0],
        )
        .unwrap();
        assert_eq!(csc.to_triplets().unwrap(), csr().to_triplets().unwrap());
    }

    #[test]
    fn test_pointer_length_checked_against_major_axis() {
        // Three pointers fit CSR (2 rows) but not CSC (3 columns)
        let err = CscMatrix::from_parts((2, 3), vec![0i32, 2, 3], vec![0i32, 1, 1], vec![1u8, 2, 3])
            .unwrap_err();
        assert!(matches!(
            err,
            BinsparseError::MalformedPointerArray {
                format: MatrixFormat::Csc,
                ..
            }
        ));
    }

    #[test]
    fn test_decreasing_pointers_rejected() {
        let err = CsrMatrix::from_parts((3, 3), vec![0u32, 2, 1, 2], vec![0u32, 1], vec![5i16, 6])
            .unwrap_err();
        assert!(matches!(err, BinsparseError::MalformedPointerArray { .. }));
    }

    #[test]
    fn test_minor_index_out_of_range() {
        let err = CsrMatrix::from_parts((2, 2), vec![0i32, 1, 1], vec![2i32], vec![true]).unwrap_err();
        assert!(matches!(
            err,
            BinsparseError::MalformedIndexArray { role: "indices_1", .. }
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let m = CsrMatrix::from_parts((0, 4), vec![0i64], Vec::<i64>::new(), Vec::<f64>::new()).unwrap();
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.to_triplets().unwrap().nnz(), 0);
    }

    #[test]
    fn test_to_triplets_expands_pointers() {
        let t = csr().to_triplets().unwrap();
        assert_eq!(t.rows(), &[0, 0, 1]);
        assert_eq!(t.cols(), &[0, 2, 2]);
    }
}
