//! Write and read configuration

use std::fmt;
use std::str::FromStr;

use binsparse_core::{BinsparseError, CreationOptions};

/// Options for [`crate::write`]
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Passed unchanged to the backend for every role array
    pub creation: CreationOptions,
    /// Remove role arrays left behind by a matrix of another format
    pub prune_stale_arrays: bool,
}

impl WriteOptions {
    /// Options with the given backend creation options
    pub fn with_creation(creation: CreationOptions) -> Self {
        Self {
            creation,
            ..Self::default()
        }
    }

    /// Set whether stale role arrays are removed
    pub fn with_prune_stale_arrays(mut self, prune: bool) -> Self {
        self.prune_stale_arrays = prune;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            creation: CreationOptions::default(),
            prune_stale_arrays: true,
        }
    }
}

/// In-memory representation requested from [`crate::read`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The layout the matrix was stored in: COO, CSR or CSC
    #[default]
    Native,
    /// Format-agnostic sorted entries
    Triplets,
}

impl Representation {
    pub fn token(self) -> &'static str {
        match self {
            Representation::Native => "native",
            Representation::Triplets => "triplets",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Representation {
    type Err = BinsparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Representation::Native),
            "triplets" => Ok(Representation::Triplets),
            _ => Err(BinsparseError::UnsupportedRepresentation {
                representation: s.to_string(),
            }),
        }
    }
}
