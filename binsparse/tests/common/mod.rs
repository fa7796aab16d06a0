//! Shared fixtures for the integration tests
#![allow(dead_code)]

use binsparse::{
    AttributeCapability, CooMatrix, CscMatrix, CsrMatrix, DirectoryStore, Element, IndexElement,
    MemoryGroup,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CAPABILITIES: [AttributeCapability; 2] =
    [AttributeCapability::Structured, AttributeCapability::TextOnly];

/// Random sparse entries in row-major order, no repeated coordinates
#[derive(Debug, Clone)]
pub struct Entries<T> {
    pub shape: (usize, usize),
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<T>,
}

/// `round(density * rows * cols)` distinct positions with generated values
pub fn random_entries<T>(
    seed: u64,
    shape: (usize, usize),
    density: f64,
    mut value: impl FnMut(&mut StdRng) -> T,
) -> Entries<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = shape.0 * shape.1;
    let nnz = ((cells as f64) * density).round() as usize;

    let mut positions = rand::seq::index::sample(&mut rng, cells, nnz).into_vec();
    positions.sort_unstable();

    let rows = positions.iter().map(|p| p / shape.1).collect();
    let cols = positions.iter().map(|p| p % shape.1).collect();
    let values = positions.iter().map(|_| value(&mut rng)).collect();
    Entries {
        shape,
        rows,
        cols,
        values,
    }
}

/// Random float matrix entries, the usual test input
pub fn random_f64(seed: u64, shape: (usize, usize), density: f64) -> Entries<f64> {
    random_entries(seed, shape, density, |rng| rng.gen_range(-1.0..1.0))
}

fn to_index<I: IndexElement>(values: &[usize]) -> Vec<I> {
    values
        .iter()
        .map(|&v| I::from_usize(v).expect("index fits"))
        .collect()
}

fn pointers(major: &[usize], major_len: usize) -> Vec<usize> {
    let mut pointers = vec![0; major_len + 1];
    for &m in major {
        pointers[m + 1] += 1;
    }
    for i in 0..major_len {
        pointers[i + 1] += pointers[i];
    }
    pointers
}

impl<T: Element> Entries<T> {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// COO in a shuffled entry order, to check nothing gets sorted
    pub fn coo<I: IndexElement>(&self) -> CooMatrix {
        let mut order: Vec<usize> = (0..self.nnz()).collect();
        order.reverse();
        let pick = |v: &[usize]| order.iter().map(|&i| v[i]).collect::<Vec<_>>();
        CooMatrix::from_triplets(
            self.shape,
            to_index::<I>(&pick(&self.rows)),
            to_index::<I>(&pick(&self.cols)),
            order.iter().map(|&i| self.values[i]).collect(),
        )
        .expect("valid COO")
    }

    pub fn csr<I: IndexElement>(&self) -> CsrMatrix {
        CsrMatrix::from_parts(
            self.shape,
            to_index::<I>(&pointers(&self.rows, self.shape.0)),
            to_index::<I>(&self.cols),
            self.values.clone(),
        )
        .expect("valid CSR")
    }

    pub fn csc<I: IndexElement>(&self) -> CscMatrix {
        let mut order: Vec<usize> = (0..self.nnz()).collect();
        order.sort_by_key(|&i| (self.cols[i], self.rows[i]));
        let cols: Vec<usize> = order.iter().map(|&i| self.cols[i]).collect();
        let rows: Vec<usize> = order.iter().map(|&i| self.rows[i]).collect();
        CscMatrix::from_parts(
            self.shape,
            to_index::<I>(&pointers(&cols, self.shape.1)),
            to_index::<I>(&rows),
            order.iter().map(|&i| self.values[i]).collect(),
        )
        .expect("valid CSC")
    }
}

pub fn memory(capability: AttributeCapability) -> MemoryGroup {
    MemoryGroup::with_capability(capability)
}

/// Fresh directory store; keep the `TempDir` alive for the test's duration
pub fn directory(capability: AttributeCapability) -> (tempfile::TempDir, DirectoryStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = DirectoryStore::create(dir.path().join("store"), capability).expect("store");
    (dir, store)
}
