//! binsparse - sparse matrix codec for hierarchical key/value stores
//!
//! Encodes COO, CSR and CSC matrices as a group holding three typed flat
//! arrays plus a `"binsparse"` metadata attribute, and decodes them back with
//! the exact layout and element types they were written with.
//!
//! ## Architecture
//!
//! - **binsparse-core**: dtype registry, typed arrays, metadata schema,
//!   validation and the storage traits (no I/O)
//! - **binsparse**: matrix representations, format codecs, the attribute
//!   adapter, read/write dispatch and two storage backends
//!
//! ## Quick Start
//!
//! ```rust
//! use binsparse::{read, write, CsrMatrix, Group, Matrix, MemoryGroup, Representation, WriteOptions};
//!
//! fn example() -> binsparse::Result<()> {
//!     let csr = CsrMatrix::from_parts((2, 3), vec![0i32, 1, 2], vec![2i32, 0], vec![1.5f64, 2.5])?;
//!     let store = MemoryGroup::new();
//!     write(&store, "matrix", &Matrix::Csr(csr.clone()), &WriteOptions::default())?;
//!
//!     let back = read(&store.group("matrix")?, Representation::Native)?;
//!     assert_eq!(back, Matrix::Csr(csr));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **directory** (default): [`DirectoryStore`], a memory-mapped on-disk
//!   backend

pub use binsparse_core::{
    // Dtypes and arrays
    dtype_of, tag_of, Dtype, Element, IndexElement, TypedArray, DTYPE_TAGS,
    // Format definitions
    roles, BinsparseMetadata, MatrixFormat, METADATA_KEY,
    // Storage traits
    AttributeBackend, AttributeCapability, CreationOptions, Group, RawAttribute,
    // Error handling
    BinsparseError, Result,
};

pub mod attrs;
pub mod codec;
pub mod dispatch;
pub mod matrix;
pub mod options;
pub mod store;

pub use attrs::{adapter_for, AttributeAdapter, NativeAttributes, TextAttributes};
pub use codec::{CooCodec, CscCodec, CsrCodec, EncodedMatrix, FormatCodec, RoleArrays};
pub use dispatch::{read, read_metadata, write};
pub use matrix::{CooMatrix, CscMatrix, CsrMatrix, Matrix, SparseRef, TripletMatrix};
pub use options::{Representation, WriteOptions};
#[cfg(feature = "directory")]
pub use store::DirectoryStore;
pub use store::MemoryGroup;
