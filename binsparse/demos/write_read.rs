//! Write a matrix in each format to an on-disk store and read it back

use binsparse::{
    read, read_metadata, write, AttributeCapability, CooMatrix, CreationOptions, DirectoryStore,
    Group, Matrix, Representation, Result, WriteOptions,
};
use tracing::Level;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let path = std::env::temp_dir().join("binsparse_demo");
    let store = DirectoryStore::create(&path, AttributeCapability::TextOnly)?;
    println!("Store at {}", store.path().display());

    // 4x5 matrix with six entries
    let coo = CooMatrix::from_triplets(
        (4, 5),
        vec![0i32, 0, 1, 2, 3, 3],
        vec![1i32, 4, 2, 0, 3, 4],
        vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
    )?;
    let triplets = coo.to_triplets()?;
    let options = WriteOptions::with_creation(CreationOptions::new().with_chunks(1024));

    let matrices = [
        ("coo", Matrix::Coo(coo)),
        ("csr", Matrix::Csr(triplets.to_csr()?)),
        ("csc", Matrix::Csc(triplets.to_csc()?)),
    ];
    for (key, matrix) in &matrices {
        write(&store, key, matrix, &options)?;
        let node = store.group(key)?;
        let metadata = read_metadata(&node)?;
        println!(
            "{key}: format={} shape={:?} data_types={:?}",
            metadata.format, metadata.shape, metadata.data_types
        );

        let back = read(&node, Representation::Native)?;
        assert_eq!(&back, matrix);
        let entries = read(&node, Representation::Triplets)?;
        assert_eq!(entries, Matrix::Triplets(triplets.clone()));
    }

    println!("All formats round-tripped");
    Ok(())
}
