//! Pointer and index array checks

use crate::error::{BinsparseError, Result};
use crate::format::{roles, MatrixFormat};

/// Validate a compressed-format pointer array
///
/// `major_len` is the compressed axis length (rows for CSR, columns for CSC).
/// The array must have `major_len + 1` entries, start at 0, end at `nnz` and
/// never decrease.
pub fn validate_pointers(
    format: MatrixFormat,
    pointers: &[usize],
    major_len: usize,
    nnz: usize,
) -> Result<()> {
    let malformed = |reason: String| BinsparseError::MalformedPointerArray {
        format,
        role: roles::POINTERS_TO_1,
        reason,
    };

    let expected_len = major_len
        .checked_add(1)
        .ok_or_else(|| malformed(format!("axis length {major_len} overflows")))?;
    if pointers.len() != expected_len {
        return Err(malformed(format!(
            "expected {expected_len} entries, found {}",
            pointers.len()
        )));
    }

    // Length is at least 1 here
    if pointers[0] != 0 {
        return Err(malformed(format!("first entry is {}, expected 0", pointers[0])));
    }
    let last = pointers[pointers.len() - 1];
    if last != nnz {
        return Err(malformed(format!(
            "last entry is {last}, expected nnz = {nnz}"
        )));
    }

    if let Some(i) = pointers.windows(2).position(|w| w[0] > w[1]) {
        return Err(malformed(format!(
            "decreases at position {}: {} > {}",
            i + 1,
            pointers[i],
            pointers[i + 1]
        )));
    }

    Ok(())
}

/// Validate that every index is below `bound`
pub fn validate_indices(role: &'static str, indices: &[usize], bound: usize) -> Result<()> {
    match indices.iter().position(|&i| i >= bound) {
        Some(pos) => Err(BinsparseError::MalformedIndexArray {
            role,
            reason: format!(
                "entry {pos} is {}, axis length is {bound}",
                indices[pos]
            ),
        }),
        None => Ok(()),
    }
}
