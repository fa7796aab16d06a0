//! Format-agnostic triplet representation

use binsparse_core::{roles, validate_indices, BinsparseError, Element, Result, TypedArray};

use super::{CooMatrix, CscMatrix, CsrMatrix};

/// Sparse matrix as a canonical list of `(row, col, value)` entries
///
/// Entries are sorted by `(row, col)` and every coordinate appears at most
/// once, so two triplet matrices holding the same entries compare equal no
/// matter which storage format they were decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletMatrix {
    shape: (usize, usize),
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: TypedArray,
}

impl TripletMatrix {
    /// Build from parallel coordinate vectors and values in any order
    ///
    /// Entries are sorted into canonical order. Fails with `DuplicateEntry`
    /// when two entries share a coordinate.
    pub fn from_entries(
        shape: (usize, usize),
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: TypedArray,
    ) -> Result<Self> {
        for (role, len) in [(roles::INDICES_0, rows.len()), (roles::INDICES_1, cols.len())] {
            if len != values.len() {
                return Err(BinsparseError::MalformedIndexArray {
                    role,
                    reason: format!("has {len} entries, values has {}", values.len()),
                });
            }
        }
        validate_indices(roles::INDICES_0, &rows, shape.0)?;
        validate_indices(roles::INDICES_1, &cols, shape.1)?;

        let mut perm: Vec<usize> = (0..rows.len()).collect();
        perm.sort_by_key(|&i| (rows[i], cols[i]));

        let rows: Vec<usize> = perm.iter().map(|&i| rows[i]).collect();
        let cols: Vec<usize> = perm.iter().map(|&i| cols[i]).collect();
        if let Some(i) = (1..rows.len()).find(|&i| rows[i - 1] == rows[i] && cols[i - 1] == cols[i]) {
            return Err(BinsparseError::DuplicateEntry {
                row: rows[i],
                col: cols[i],
            });
        }

        Ok(Self {
            shape,
            rows,
            cols,
            values: values.take(&perm),
        })
    }

    /// Build from `(row, col, value)` tuples
    pub fn from_tuples<T: Element>(
        shape: (usize, usize),
        entries: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut values = Vec::new();
        for (r, c, v) in entries {
            rows.push(r);
            cols.push(c);
            values.push(v);
        }
        Self::from_entries(shape, rows, cols, values.into())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn values(&self) -> &TypedArray {
        &self.values
    }

    /// COO matrix with `int64` indices, entries in row-major order
    pub fn to_coo(&self) -> Result<CooMatrix> {
        CooMatrix::try_new(
            self.shape,
            index_array(&self.rows)?,
            index_array(&self.cols)?,
            self.values.clone(),
        )
    }

    /// CSR matrix with `int64` pointers and indices
    pub fn to_csr(&self) -> Result<CsrMatrix> {
        let pointers = pointers_from_sorted(&self.rows, self.shape.0);
        CsrMatrix::try_new(
            self.shape,
            index_array(&pointers)?,
            index_array(&self.cols)?,
            self.values.clone(),
        )
    }

    /// CSC matrix with `int64` pointers and indices
    pub fn to_csc(&self) -> Result<CscMatrix> {
        let mut perm: Vec<usize> = (0..self.nnz()).collect();
        perm.sort_by_key(|&i| (self.cols[i], self.rows[i]));
        let cols: Vec<usize> = perm.iter().map(|&i| self.cols[i]).collect();
        let rows: Vec<usize> = perm.iter().map(|&i| self.rows[i]).collect();

        let pointers = pointers_from_sorted(&cols, self.shape.1);
        CscMatrix::try_new(
            self.shape,
            index_array(&pointers)?,
            index_array(&rows)?,
            self.values.take(&perm),
        )
    }
}

/// Pointer array for a sorted major-axis index list
fn pointers_from_sorted(major: &[usize], major_len: usize) -> Vec<usize> {
    let mut pointers = vec![0usize; major_len + 1];
    for &m in major {
        pointers[m + 1] += 1;
    }
    for i in 0..major_len {
        pointers[i + 1] += pointers[i];
    }
    pointers
}

fn index_array(indices: &[usize]) -> Result<TypedArray> {
    indices
        .iter()
        .map(|&i| {
            i64::try_from(i).map_err(|_| BinsparseError::MalformedIndexArray {
                role: roles::INDICES_1,
                reason: format!("index {i} does not fit int64"),
            })
        })
        .collect::<Result<Vec<i64>>>()
        .map(TypedArray::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TripletMatrix {
        TripletMatrix::from_tuples((3, 2), [(2, 0, 7u16), (0, 1, 5), (1, 1, 6), (0, 0, 4)]).unwrap()
    }

    #[test]
    fn test_sorted_on_construction() {
        let t = sample();
        assert_eq!(t.rows(), &[0, 0, 1, 2]);
        assert_eq!(t.cols(), &[0, 1, 1, 0]);
        assert_eq!(t.values(), &TypedArray::from(vec![4u16, 5, 6, 7]));
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = TripletMatrix::from_tuples((2, 2), [(0, 1, 1.0f64), (0, 1, 2.0)]).unwrap_err();
        assert!(matches!(err, BinsparseError::DuplicateEntry { row: 0, col: 1 }));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert!(TripletMatrix::from_tuples((2, 2), [(0, 2, true)]).is_err());
    }

    #[test]
    fn test_conversions_preserve_entries() {
        let t = sample();
        assert_eq!(t.to_coo().unwrap().to_triplets().unwrap(), t);
        assert_eq!(t.to_csr().unwrap().to_triplets().unwrap(), t);

        let csc = t.to_csc().unwrap();
        assert_eq!(csc.pointers(), &TypedArray::from(vec![0i64, 2, 4]));
        assert_eq!(csc.indices(), &TypedArray::from(vec![0i64, 2, 0, 1]));
        assert_eq!(csc.to_triplets().unwrap(), t);
    }

    #[test]
    fn test_empty() {
        let t = TripletMatrix::from_entries((0, 5), vec![], vec![], TypedArray::empty(binsparse_core::Dtype::Int8))
            .unwrap();
        assert_eq!(t.to_csr().unwrap().pointers().len(), 1);
        assert_eq!(t.to_csc().unwrap().pointers().len(), 6);
    }
}
