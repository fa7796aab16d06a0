//! Storage backends implementing [`binsparse_core::Group`]
//!
//! - [`MemoryGroup`]: shared in-memory node tree
//! - [`DirectoryStore`]: one directory per node on the local filesystem
//!
//! Both resolve `/`-separated keys one segment at a time and pick their
//! attribute capability at construction.

mod memory;
pub use memory::MemoryGroup;

#[cfg(feature = "directory")]
mod directory;
#[cfg(feature = "directory")]
pub use directory::DirectoryStore;

use binsparse_core::{BinsparseError, Result};

/// Split a key into path segments, ignoring empty ones
///
/// `"a//b/"` resolves like `"a/b"`. Relative segments are rejected.
pub(crate) fn split_key(key: &str) -> Result<Vec<&str>> {
    key.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            "." | ".." => Err(BinsparseError::InvalidKey {
                key: key.to_string(),
                reason: "relative path segments are not allowed",
            }),
            _ => Ok(segment),
        })
        .collect()
}

/// Split a key into its parent segments and final name
pub(crate) fn split_leaf(key: &str) -> Result<(Vec<&str>, &str)> {
    let mut segments = split_key(key)?;
    let leaf = segments.pop().ok_or_else(|| BinsparseError::InvalidKey {
        key: key.to_string(),
        reason: "key names no node",
    })?;
    Ok((segments, leaf))
}

/// Child path string for error messages and node paths
pub(crate) fn join_path(base: &str, segments: &[&str]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
