//! In-memory sparse matrix representations
//!
//! [`Matrix`] is what [`crate::read`] returns and [`crate::write`] accepts.
//! Only the three storage layouts can be written; [`Matrix::as_sparse`]
//! narrows a matrix to that closed set.

mod compressed;
mod coo;
mod triplets;

pub use compressed::{CscMatrix, CsrMatrix};
pub use coo::CooMatrix;
pub use triplets::TripletMatrix;

use binsparse_core::{BinsparseError, MatrixFormat, Result};

/// Any matrix the codec can hand back to a caller
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    Coo(CooMatrix),
    Csr(CsrMatrix),
    Csc(CscMatrix),
    /// Format-agnostic entries, produced by decoding with
    /// [`Representation::Triplets`](crate::Representation::Triplets)
    Triplets(TripletMatrix),
}

/// Borrowed view of a matrix in one of the three storage layouts
#[derive(Debug, Clone, Copy)]
pub enum SparseRef<'a> {
    Coo(&'a CooMatrix),
    Csr(&'a CsrMatrix),
    Csc(&'a CscMatrix),
}

impl Matrix {
    /// Matrix dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Coo(m) => m.shape(),
            Matrix::Csr(m) => m.shape(),
            Matrix::Csc(m) => m.shape(),
            Matrix::Triplets(m) => m.shape(),
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        match self {
            Matrix::Coo(m) => m.nnz(),
            Matrix::Csr(m) => m.nnz(),
            Matrix::Csc(m) => m.nnz(),
            Matrix::Triplets(m) => m.nnz(),
        }
    }

    /// Short name of the representation, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Matrix::Coo(_) => "coo",
            Matrix::Csr(_) => "csr",
            Matrix::Csc(_) => "csc",
            Matrix::Triplets(_) => "triplets",
        }
    }

    /// Storage format of this representation, `None` for triplets
    pub fn format(&self) -> Option<MatrixFormat> {
        self.as_sparse().ok().map(|sparse| sparse.format())
    }

    /// Classify into one of the writable layouts
    ///
    /// Fails with `UnsupportedMatrixType` for representations that have no
    /// binsparse encoding.
    pub fn as_sparse(&self) -> Result<SparseRef<'_>> {
        match self {
            Matrix::Coo(m) => Ok(SparseRef::Coo(m)),
            Matrix::Csr(m) => Ok(SparseRef::Csr(m)),
            Matrix::Csc(m) => Ok(SparseRef::Csc(m)),
            Matrix::Triplets(_) => Err(BinsparseError::UnsupportedMatrixType {
                representation: self.kind(),
            }),
        }
    }

    /// Canonical entries of this matrix, whatever its layout
    pub fn to_triplets(&self) -> Result<TripletMatrix> {
        match self {
            Matrix::Coo(m) => m.to_triplets(),
            Matrix::Csr(m) => m.to_triplets(),
            Matrix::Csc(m) => m.to_triplets(),
            Matrix::Triplets(m) => Ok(m.clone()),
        }
    }
}

impl SparseRef<'_> {
    pub fn format(&self) -> MatrixFormat {
        match self {
            SparseRef::Coo(_) => MatrixFormat::Coo,
            SparseRef::Csr(_) => MatrixFormat::Csr,
            SparseRef::Csc(_) => MatrixFormat::Csc,
        }
    }
}

macro_rules! impl_from_matrix {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Matrix {
                fn from(m: $ty) -> Self {
                    Matrix::$variant(m)
                }
            }
        )*
    };
}

impl_from_matrix!(
    Coo(CooMatrix),
    Csr(CsrMatrix),
    Csc(CscMatrix),
    Triplets(TripletMatrix)
);
