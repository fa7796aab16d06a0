//! Structural validation for sparse matrix arrays
//!
//! Pure checks over index and pointer arrays, run by the matrix constructors
//! before a matrix is built from decoded storage.

pub mod pointers;

pub use pointers::{validate_indices, validate_pointers};
