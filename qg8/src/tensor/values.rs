//! Typed value storage for a tensor's stored elements.

use crate::types::DType;

/// Value arrays of a tensor, one variant per storable dtype.
///
/// The dtype of a tensor is derived from the variant, so the two can never
/// disagree. Complex variants hold parallel real and imaginary arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex64 { re: Vec<f32>, im: Vec<f32> },
    Complex128 { re: Vec<f64>, im: Vec<f64> },
}

impl Values {
    pub fn dtype(&self) -> DType {
        match self {
            Self::UInt8(_) => DType::UInt8,
            Self::UInt16(_) => DType::UInt16,
            Self::UInt32(_) => DType::UInt32,
            Self::UInt64(_) => DType::UInt64,
            Self::Int8(_) => DType::Int8,
            Self::Int16(_) => DType::Int16,
            Self::Int32(_) => DType::Int32,
            Self::Int64(_) => DType::Int64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
            Self::Complex64 { .. } => DType::Complex64,
            Self::Complex128 { .. } => DType::Complex128,
        }
    }

    /// Length of the real component array
    pub fn len(&self) -> usize {
        match self {
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Complex64 { re, .. } => re.len(),
            Self::Complex128 { re, .. } => re.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the imaginary component array, for complex variants
    pub fn imag_len(&self) -> Option<usize> {
        match self {
            Self::Complex64 { im, .. } => Some(im.len()),
            Self::Complex128 { im, .. } => Some(im.len()),
            _ => None,
        }
    }

    /// Float32 values, promoted to complex64 when an imaginary part is given.
    pub fn from_f32(re: Vec<f32>, im: Option<Vec<f32>>) -> Self {
        match im {
            Some(im) => Self::Complex64 { re, im },
            None => Self::Float32(re),
        }
    }

    /// Float64 values, promoted to complex128 when an imaginary part is given.
    pub fn from_f64(re: Vec<f64>, im: Option<Vec<f64>>) -> Self {
        match im {
            Some(im) => Self::Complex128 { re, im },
            None => Self::Float64(re),
        }
    }
}

macro_rules! impl_from_vec {
    ($t:ty, $variant:ident) => {
        impl From<Vec<$t>> for Values {
            fn from(v: Vec<$t>) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_vec!(u8, UInt8);
impl_from_vec!(u16, UInt16);
impl_from_vec!(u32, UInt32);
impl_from_vec!(u64, UInt64);
impl_from_vec!(i8, Int8);
impl_from_vec!(i16, Int16);
impl_from_vec!(i32, Int32);
impl_from_vec!(i64, Int64);
impl_from_vec!(f32, Float32);
impl_from_vec!(f64, Float64);
