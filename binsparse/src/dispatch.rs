//! Public read and write entry points
//!
//! `write` classifies the matrix, encodes it and persists metadata plus role
//! arrays under a child group. `read` parses the stored metadata and routes to
//! the codec its format tag names, whatever arrays happen to be present.

use binsparse_core::{roles, BinsparseMetadata, Group, MatrixFormat, Result, METADATA_KEY};
use tracing::debug;

use crate::attrs;
use crate::codec::{CooCodec, CscCodec, CsrCodec, EncodedMatrix, FormatCodec, RoleArrays};
use crate::matrix::{Matrix, SparseRef};
use crate::options::{Representation, WriteOptions};

/// Write `matrix` to the group at `key` under `store`
///
/// The group is created if absent. Its metadata is replaced and each role
/// array is created or overwritten with `options.creation` passed through to
/// the backend. Matrices with no binsparse encoding fail with
/// `UnsupportedMatrixType` before anything is written.
///
/// No rollback is attempted: a backend failure part way through leaves the
/// group in whatever state the backend produced.
pub fn write<G: Group>(store: &G, key: &str, matrix: &Matrix, options: &WriteOptions) -> Result<()> {
    let encoded = encode(matrix.as_sparse()?)?;
    let metadata = &encoded.metadata;

    let group = store.require_group(key)?;
    attrs::write_metadata(&group, METADATA_KEY, &metadata.to_value())?;

    if options.prune_stale_arrays {
        let current = metadata.format.roles();
        for role in roles::ALL.into_iter().filter(|role| !current.contains(role)) {
            if group.remove(role)? {
                debug!(key, role, "removed stale role array");
            }
        }
    }

    for (role, array) in encoded.arrays {
        group.create_array(role, array, &options.creation)?;
    }

    debug!(
        key,
        node = %group.node_path(),
        format = %metadata.format,
        rows = metadata.shape.0,
        cols = metadata.shape.1,
        nnz = matrix.nnz(),
        "wrote binsparse matrix"
    );
    Ok(())
}

fn encode(matrix: SparseRef<'_>) -> Result<EncodedMatrix<'_>> {
    match matrix {
        SparseRef::Coo(m) => CooCodec::encode(m),
        SparseRef::Csr(m) => CsrCodec::encode(m),
        SparseRef::Csc(m) => CscCodec::encode(m),
    }
}

/// Parse and validate the metadata stored on `node`
///
/// Fails with `MetadataNotFound` if the node carries none and with
/// `UnrecognizedFormat` if its format tag is not COO, CSR or CSC.
pub fn read_metadata<G: Group>(node: &G) -> Result<BinsparseMetadata> {
    let value = attrs::read_metadata(node, METADATA_KEY)?;
    BinsparseMetadata::from_value(&value)
}

/// Read the matrix stored at `node` in the requested representation
pub fn read<G: Group>(node: &G, representation: Representation) -> Result<Matrix> {
    let metadata = read_metadata(node)?;
    let arrays = RoleArrays::read_from(node, metadata.format)?;

    let matrix = match metadata.format {
        MatrixFormat::Coo => CooCodec::decode(&metadata, arrays, representation)?,
        MatrixFormat::Csr => CsrCodec::decode(&metadata, arrays, representation)?,
        MatrixFormat::Csc => CscCodec::decode(&metadata, arrays, representation)?,
    };

    debug!(
        node = %node.node_path(),
        format = %metadata.format,
        %representation,
        rows = metadata.shape.0,
        cols = metadata.shape.1,
        nnz = matrix.nnz(),
        "read binsparse matrix"
    );
    Ok(matrix)
}
