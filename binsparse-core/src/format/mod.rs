//! Binsparse format definitions
//!
//! Format tags, the per-format array role sets and the metadata schema.
//! Pure definitions with validation; no storage access.

pub mod constants;
pub mod metadata;

use core::fmt;
use core::str::FromStr;

use crate::error::{BinsparseError, Result};

pub use constants::{roles, METADATA_KEY};
pub use metadata::BinsparseMetadata;

/// Sparse matrix layouts the codec can encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixFormat {
    /// Coordinate format (COO)
    Coo,
    /// Compressed Sparse Row (CSR)
    Csr,
    /// Compressed Sparse Column (CSC)
    Csc,
}

impl MatrixFormat {
    /// Tag written to the `format` metadata field
    pub const fn tag(self) -> &'static str {
        match self {
            MatrixFormat::Coo => "COO",
            MatrixFormat::Csr => "CSR",
            MatrixFormat::Csc => "CSC",
        }
    }

    /// Array roles this format stores, in write order
    pub const fn roles(self) -> [&'static str; 3] {
        match self {
            MatrixFormat::Coo => [roles::INDICES_0, roles::INDICES_1, roles::VALUES],
            MatrixFormat::Csr | MatrixFormat::Csc => {
                [roles::POINTERS_TO_1, roles::INDICES_1, roles::VALUES]
            }
        }
    }

    /// Whether this format compresses one axis into a pointer array
    pub const fn is_compressed(self) -> bool {
        matches!(self, MatrixFormat::Csr | MatrixFormat::Csc)
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MatrixFormat {
    type Err = BinsparseError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "COO" => Ok(MatrixFormat::Coo),
            "CSR" => Ok(MatrixFormat::Csr),
            "CSC" => Ok(MatrixFormat::Csc),
            other => Err(BinsparseError::UnrecognizedFormat {
                format: other.to_string(),
            }),
        }
    }
}
