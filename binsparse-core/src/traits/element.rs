//! Element type constraints for binsparse arrays
//!
//! Maps Rust scalar types onto the canonical [`Dtype`] set so that typed
//! vectors can be moved into and out of [`TypedArray`] without losing their
//! element kind.

use crate::array::TypedArray;
use crate::dtype::Dtype;

/// Trait for types that can be stored in a binsparse array
///
/// Implemented for the ten fixed-width numeric types and `bool`.
pub trait Element: Copy + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Canonical dtype of this element type
    const DTYPE: Dtype;

    /// Move a vector into the matching [`TypedArray`] variant
    fn into_array(values: Vec<Self>) -> TypedArray;

    /// Borrow the contents of `array` if it holds this element type
    fn slice_of(array: &TypedArray) -> Option<&[Self]>;
}

/// Integer element types usable as indices and pointers
pub trait IndexElement: Element + Ord {
    /// Convert to `usize`, `None` if negative or too large
    fn to_usize(self) -> Option<usize>;

    /// Convert from `usize`, `None` if the value does not fit
    fn from_usize(value: usize) -> Option<Self>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: Dtype = $dtype;

            fn into_array(values: Vec<Self>) -> TypedArray {
                TypedArray::$variant(values)
            }

            fn slice_of(array: &TypedArray) -> Option<&[Self]> {
                match array {
                    TypedArray::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_index_element {
    ($($ty:ty),*) => {
        $(
            impl IndexElement for $ty {
                fn to_usize(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                fn from_usize(value: usize) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_element!(i8, Int8, Dtype::Int8);
impl_element!(i16, Int16, Dtype::Int16);
impl_element!(i32, Int32, Dtype::Int32);
impl_element!(i64, Int64, Dtype::Int64);
impl_element!(u8, UInt8, Dtype::UInt8);
impl_element!(u16, UInt16, Dtype::UInt16);
impl_element!(u32, UInt32, Dtype::UInt32);
impl_element!(u64, UInt64, Dtype::UInt64);
impl_element!(f32, Float32, Dtype::Float32);
impl_element!(f64, Float64, Dtype::Float64);
impl_element!(bool, Bool, Dtype::Bool);

impl_index_element!(i8, i16, i32, i64, u8, u16, u32, u64);
