//! Dtype-tagged flat arrays
//!
//! [`TypedArray`] is the unit of data exchanged between the format codecs and
//! a storage backend: one contiguous, owned vector whose element kind is one
//! of the canonical dtypes.

use crate::dtype::Dtype;
use crate::error::{BinsparseError, Result};
use crate::traits::element::{Element, IndexElement};

/// A flat array of one canonical dtype
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

/// Run `$body` with `$v` bound to the inner vector, whatever the variant
macro_rules! with_values {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            TypedArray::Int8($v) => $body,
            TypedArray::Int16($v) => $body,
            TypedArray::Int32($v) => $body,
            TypedArray::Int64($v) => $body,
            TypedArray::UInt8($v) => $body,
            TypedArray::UInt16($v) => $body,
            TypedArray::UInt32($v) => $body,
            TypedArray::UInt64($v) => $body,
            TypedArray::Float32($v) => $body,
            TypedArray::Float64($v) => $body,
            TypedArray::Bool($v) => $body,
        }
    };
}

/// Like `with_values!`, but rewraps the result in the same variant
macro_rules! map_values {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            TypedArray::Int8($v) => TypedArray::Int8($body),
            TypedArray::Int16($v) => TypedArray::Int16($body),
            TypedArray::Int32($v) => TypedArray::Int32($body),
            TypedArray::Int64($v) => TypedArray::Int64($body),
            TypedArray::UInt8($v) => TypedArray::UInt8($body),
            TypedArray::UInt16($v) => TypedArray::UInt16($body),
            TypedArray::UInt32($v) => TypedArray::UInt32($body),
            TypedArray::UInt64($v) => TypedArray::UInt64($body),
            TypedArray::Float32($v) => TypedArray::Float32($body),
            TypedArray::Float64($v) => TypedArray::Float64($body),
            TypedArray::Bool($v) => TypedArray::Bool($body),
        }
    };
}

impl TypedArray {
    /// Canonical dtype of the elements
    pub fn dtype(&self) -> Dtype {
        match self {
            TypedArray::Int8(_) => Dtype::Int8,
            TypedArray::Int16(_) => Dtype::Int16,
            TypedArray::Int32(_) => Dtype::Int32,
            TypedArray::Int64(_) => Dtype::Int64,
            TypedArray::UInt8(_) => Dtype::UInt8,
            TypedArray::UInt16(_) => Dtype::UInt16,
            TypedArray::UInt32(_) => Dtype::UInt32,
            TypedArray::UInt64(_) => Dtype::UInt64,
            TypedArray::Float32(_) => Dtype::Float32,
            TypedArray::Float64(_) => Dtype::Float64,
            TypedArray::Bool(_) => Dtype::Bool,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_values!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the elements as `T`, `None` if the dtype differs
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice_of(self)
    }

    /// An empty array of the given dtype
    pub fn empty(dtype: Dtype) -> Self {
        match dtype {
            Dtype::Int8 => TypedArray::Int8(Vec::new()),
            Dtype::Int16 => TypedArray::Int16(Vec::new()),
            Dtype::Int32 => TypedArray::Int32(Vec::new()),
            Dtype::Int64 => TypedArray::Int64(Vec::new()),
            Dtype::UInt8 => TypedArray::UInt8(Vec::new()),
            Dtype::UInt16 => TypedArray::UInt16(Vec::new()),
            Dtype::UInt32 => TypedArray::UInt32(Vec::new()),
            Dtype::UInt64 => TypedArray::UInt64(Vec::new()),
            Dtype::Float32 => TypedArray::Float32(Vec::new()),
            Dtype::Float64 => TypedArray::Float64(Vec::new()),
            Dtype::Bool => TypedArray::Bool(Vec::new()),
        }
    }

    /// Read an integer array as `usize` indices
    ///
    /// `role` names the array in errors. Fails for float and bool arrays and
    /// for negative entries.
    pub fn to_indices(&self, role: &'static str) -> Result<Vec<usize>> {
        fn convert<I: IndexElement>(role: &'static str, values: &[I]) -> Result<Vec<usize>> {
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    v.to_usize().ok_or_else(|| BinsparseError::MalformedIndexArray {
                        role,
                        reason: format!("entry {i} ({v:?}) is not a valid index"),
                    })
                })
                .collect()
        }

        match self {
            TypedArray::Int8(v) => convert(role, v),
            TypedArray::Int16(v) => convert(role, v),
            TypedArray::Int32(v) => convert(role, v),
            TypedArray::Int64(v) => convert(role, v),
            TypedArray::UInt8(v) => convert(role, v),
            TypedArray::UInt16(v) => convert(role, v),
            TypedArray::UInt32(v) => convert(role, v),
            TypedArray::UInt64(v) => convert(role, v),
            TypedArray::Float32(_) | TypedArray::Float64(_) | TypedArray::Bool(_) => {
                Err(BinsparseError::MalformedIndexArray {
                    role,
                    reason: format!("dtype {} cannot hold indices", self.dtype()),
                })
            }
        }
    }

    /// Gather elements at `positions`, keeping the dtype
    ///
    /// Panics if a position is out of bounds.
    pub fn take(&self, positions: &[usize]) -> TypedArray {
        map_values!(self, v => positions.iter().map(|&i| v[i]).collect())
    }

    /// Serialize the elements as little-endian bytes (bools as 0/1)
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            TypedArray::Int8(v) => encode_le(v, i8::to_le_bytes),
            TypedArray::Int16(v) => encode_le(v, i16::to_le_bytes),
            TypedArray::Int32(v) => encode_le(v, i32::to_le_bytes),
            TypedArray::Int64(v) => encode_le(v, i64::to_le_bytes),
            TypedArray::UInt8(v) => v.clone(),
            TypedArray::UInt16(v) => encode_le(v, u16::to_le_bytes),
            TypedArray::UInt32(v) => encode_le(v, u32::to_le_bytes),
            TypedArray::UInt64(v) => encode_le(v, u64::to_le_bytes),
            TypedArray::Float32(v) => encode_le(v, f32::to_le_bytes),
            TypedArray::Float64(v) => encode_le(v, f64::to_le_bytes),
            TypedArray::Bool(v) => v.iter().map(|&b| u8::from(b)).collect(),
        }
    }

    /// Decode little-endian bytes written by [`TypedArray::to_le_bytes`]
    pub fn from_le_bytes(dtype: Dtype, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % dtype.size_bytes() != 0 {
            return Err(BinsparseError::CorruptArray {
                dtype,
                reason: format!(
                    "{} bytes is not a multiple of the element size {}",
                    bytes.len(),
                    dtype.size_bytes()
                ),
            });
        }

        let array = match dtype {
            Dtype::Int8 => TypedArray::Int8(decode_le(bytes, i8::from_le_bytes)),
            Dtype::Int16 => TypedArray::Int16(decode_le(bytes, i16::from_le_bytes)),
            Dtype::Int32 => TypedArray::Int32(decode_le(bytes, i32::from_le_bytes)),
            Dtype::Int64 => TypedArray::Int64(decode_le(bytes, i64::from_le_bytes)),
            Dtype::UInt8 => TypedArray::UInt8(bytes.to_vec()),
            Dtype::UInt16 => TypedArray::UInt16(decode_le(bytes, u16::from_le_bytes)),
            Dtype::UInt32 => TypedArray::UInt32(decode_le(bytes, u32::from_le_bytes)),
            Dtype::UInt64 => TypedArray::UInt64(decode_le(bytes, u64::from_le_bytes)),
            Dtype::Float32 => TypedArray::Float32(decode_le(bytes, f32::from_le_bytes)),
            Dtype::Float64 => TypedArray::Float64(decode_le(bytes, f64::from_le_bytes)),
            Dtype::Bool => {
                let values = bytes
                    .iter()
                    .enumerate()
                    .map(|(i, &b)| match b {
                        0 => Ok(false),
                        1 => Ok(true),
                        other => Err(BinsparseError::CorruptArray {
                            dtype,
                            reason: format!("byte {i} is {other}, expected 0 or 1"),
                        }),
                    })
                    .collect::<Result<Vec<bool>>>()?;
                TypedArray::Bool(values)
            }
        };
        Ok(array)
    }
}

impl<T: Element> From<Vec<T>> for TypedArray {
    fn from(values: Vec<T>) -> Self {
        T::into_array(values)
    }
}

fn encode_le<T: bytemuck::Pod, const N: usize>(values: &[T], to_le: impl Fn(T) -> [u8; N]) -> Vec<u8> {
    if cfg!(target_endian = "little") {
        bytemuck::cast_slice(values).to_vec()
    } else {
        values.iter().flat_map(|&v| to_le(v)).collect()
    }
}

// `bytes.len()` has already been checked to be a multiple of N
fn decode_le<T: bytemuck::Pod, const N: usize>(bytes: &[u8], from_le: impl Fn([u8; N]) -> T) -> Vec<T> {
    if cfg!(target_endian = "little") {
        bytemuck::pod_collect_to_vec(bytes)
    } else {
        bytes
            .chunks_exact(N)
            .map(|chunk| {
                let mut buf = [0u8; N];
                buf.copy_from_slice(chunk);
                from_le(buf)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_follows_vec_type() {
        assert_eq!(TypedArray::from(vec![1u16, 2]).dtype(), Dtype::UInt16);
        assert_eq!(TypedArray::from(vec![true]).dtype(), Dtype::Bool);
        assert_eq!(TypedArray::from(Vec::<f32>::new()).dtype(), Dtype::Float32);
        assert_eq!(TypedArray::empty(Dtype::Int64).dtype(), Dtype::Int64);
    }

    #[test]
    fn test_to_indices() {
        let array = TypedArray::from(vec![0i32, 3, 7]);
        assert_eq!(array.to_indices("indices_1").unwrap(), vec![0, 3, 7]);

        let negative = TypedArray::from(vec![0i64, -2]);
        assert!(matches!(
            negative.to_indices("indices_0"),
            Err(BinsparseError::MalformedIndexArray { role: "indices_0", .. })
        ));

        let floats = TypedArray::from(vec![0.0f64]);
        assert!(floats.to_indices("pointers_to_1").is_err());
    }

    #[test]
    fn test_take_keeps_dtype() {
        let array = TypedArray::from(vec![10u8, 20, 30]);
        assert_eq!(array.take(&[2, 0]), TypedArray::from(vec![30u8, 10]));
    }

    #[test]
    fn test_le_bytes_layout() {
        let array = TypedArray::from(vec![1i32, -1]);
        assert_eq!(
            array.to_le_bytes(),
            vec![1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]
        );

        let decoded = TypedArray::from_le_bytes(Dtype::Int32, &array.to_le_bytes()).unwrap();
        assert_eq!(decoded, array);
    }

    #[test]
    fn test_bool_bytes() {
        let array = TypedArray::from(vec![true, false, true]);
        assert_eq!(array.to_le_bytes(), vec![1, 0, 1]);
        assert!(matches!(
            TypedArray::from_le_bytes(Dtype::Bool, &[0, 2]),
            Err(BinsparseError::CorruptArray { .. })
        ));
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        assert!(matches!(
            TypedArray::from_le_bytes(Dtype::Float64, &[0; 12]),
            Err(BinsparseError::CorruptArray { .. })
        ));
    }
}
