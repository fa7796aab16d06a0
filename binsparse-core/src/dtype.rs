//! Canonical element dtypes and their metadata tags
//!
//! Every array persisted by the codec carries exactly one [`Dtype`]. The
//! mapping between dtypes and the tags written into `data_types` is a single
//! constant table, [`DTYPE_TAGS`].

use core::fmt;
use core::str::FromStr;

use crate::error::{BinsparseError, Result};

/// Canonical element kinds recognized by the binsparse format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Dtype {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Boolean, stored as one byte per element
    Bool,
}

/// Tag table used for `data_types` entries in metadata
///
/// Indexed by the `Dtype` discriminant.
pub const DTYPE_TAGS: [(Dtype, &str); 11] = [
    (Dtype::Int8, "int8"),
    (Dtype::Int16, "int16"),
    (Dtype::Int32, "int32"),
    (Dtype::Int64, "int64"),
    (Dtype::UInt8, "uint8"),
    (Dtype::UInt16, "uint16"),
    (Dtype::UInt32, "uint32"),
    (Dtype::UInt64, "uint64"),
    (Dtype::Float32, "float32"),
    (Dtype::Float64, "float64"),
    (Dtype::Bool, "bint8"),
];

/// Metadata tag for a dtype
pub fn tag_of(dtype: Dtype) -> &'static str {
    DTYPE_TAGS[dtype as usize].1
}

/// Look up the dtype for a metadata tag
///
/// `role` is only used to give the error context.
pub fn dtype_of(role: &str, tag: &str) -> Result<Dtype> {
    DTYPE_TAGS
        .iter()
        .find(|(_, t)| *t == tag)
        .map(|(d, _)| *d)
        .ok_or_else(|| BinsparseError::UnknownDtypeTag {
            role: role.to_string(),
            tag: tag.to_string(),
        })
}

impl Dtype {
    /// All canonical dtypes, in tag-table order
    pub fn all() -> impl Iterator<Item = Dtype> {
        DTYPE_TAGS.iter().map(|(d, _)| *d)
    }

    /// Metadata tag for this dtype
    pub fn tag(self) -> &'static str {
        tag_of(self)
    }

    /// Size of one element in bytes
    pub const fn size_bytes(self) -> usize {
        match self {
            Dtype::Int8 | Dtype::UInt8 | Dtype::Bool => 1,
            Dtype::Int16 | Dtype::UInt16 => 2,
            Dtype::Int32 | Dtype::UInt32 | Dtype::Float32 => 4,
            Dtype::Int64 | Dtype::UInt64 | Dtype::Float64 => 8,
        }
    }

    /// Whether arrays of this dtype can hold indices or pointers
    pub const fn is_integer(self) -> bool {
        !matches!(self, Dtype::Float32 | Dtype::Float64 | Dtype::Bool)
    }

    /// Array-protocol type descriptor, little-endian (`<i4`, `|b1`, ...)
    pub fn typestr(self) -> String {
        let (kind, size) = match self {
            Dtype::Int8 | Dtype::Int16 | Dtype::Int32 | Dtype::Int64 => ('i', self.size_bytes()),
            Dtype::UInt8 | Dtype::UInt16 | Dtype::UInt32 | Dtype::UInt64 => {
                ('u', self.size_bytes())
            }
            Dtype::Float32 | Dtype::Float64 => ('f', self.size_bytes()),
            Dtype::Bool => ('b', 1),
        };
        let order = if size == 1 { '|' } else { '<' };
        format!("{order}{kind}{size}")
    }

    /// Map a physical type descriptor onto a canonical dtype
    ///
    /// Accepts little-endian, native (`=`) and not-applicable (`|`) byte
    /// orders. Kinds outside the canonical set (complex, half floats,
    /// strings, big-endian multi-byte data) fail with `UnsupportedDtype`.
    pub fn from_typestr(typestr: &str) -> Result<Self> {
        let unsupported = || BinsparseError::UnsupportedDtype {
            dtype: typestr.to_string(),
        };

        let mut chars = typestr.chars();
        let order = chars.next().ok_or_else(unsupported)?;
        let kind = chars.next().ok_or_else(unsupported)?;
        let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;

        let native_little = cfg!(target_endian = "little");
        match order {
            '<' | '|' => {}
            '=' if native_little => {}
            _ if size == 1 => {}
            _ => return Err(unsupported()),
        }

        let dtype = match (kind, size) {
            ('i', 1) => Dtype::Int8,
            ('i', 2) => Dtype::Int16,
            ('i', 4) => Dtype::Int32,
            ('i', 8) => Dtype::Int64,
            ('u', 1) => Dtype::UInt8,
            ('u', 2) => Dtype::UInt16,
            ('u', 4) => Dtype::UInt32,
            ('u', 8) => Dtype::UInt64,
            ('f', 4) => Dtype::Float32,
            ('f', 8) => Dtype::Float64,
            ('b', 1) => Dtype::Bool,
            _ => return Err(unsupported()),
        };
        Ok(dtype)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Dtype {
    type Err = BinsparseError;

    fn from_str(tag: &str) -> Result<Self> {
        dtype_of("<unspecified>", tag)
    }
}
