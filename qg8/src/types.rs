//! Type catalog: dtype, itype and packing identifiers and their on-disk widths.

use std::fmt;

use crate::error::{Qg8Error, Result};

/// Value type of a tensor's stored elements.
///
/// `Bool` and `Char` are defined by the format but carry no value storage;
/// decoding a payload declaring either fails with `UnsupportedDtype`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum DType {
    Bool = 1,
    Char = 2,
    UInt8 = 3,
    UInt16 = 4,
    UInt32 = 5,
    UInt64 = 6,
    Int8 = 7,
    Int16 = 8,
    Int32 = 9,
    Int64 = 10,
    Float32 = 11,
    Float64 = 12,
    Complex64 = 13,
    Complex128 = 14,
}

impl DType {
    /// On-disk identifier
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Byte width of one component (the real or imaginary part for complex kinds)
    pub fn width(self) -> usize {
        match self {
            Self::Bool | Self::Char | Self::UInt8 | Self::Int8 => 1,
            Self::UInt16 | Self::Int16 => 2,
            Self::UInt32 | Self::Int32 | Self::Float32 | Self::Complex64 => 4,
            Self::UInt64 | Self::Int64 | Self::Float64 | Self::Complex128 => 8,
        }
    }

    /// Whether values carry an imaginary component array
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// Number of component arrays stored per element (2 for complex, else 1)
    pub fn components(self) -> u64 {
        if self.is_complex() {
            2
        } else {
            1
        }
    }

    /// Whether the codec implements value storage for this dtype
    pub fn is_storable(self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<DType> for u8 {
    fn from(dtype: DType) -> u8 {
        dtype.id()
    }
}

impl TryFrom<u8> for DType {
    type Error = Qg8Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            1 => Self::Bool,
            2 => Self::Char,
            3 => Self::UInt8,
            4 => Self::UInt16,
            5 => Self::UInt32,
            6 => Self::UInt64,
            7 => Self::Int8,
            8 => Self::Int16,
            9 => Self::Int32,
            10 => Self::Int64,
            11 => Self::Float32,
            12 => Self::Float64,
            13 => Self::Complex64,
            14 => Self::Complex128,
            _ => return Err(Qg8Error::UnknownType(value)),
        })
    }
}

/// Byte width for any dtype or itype identifier.
pub fn width_of(id: u8) -> Result<usize> {
    DType::try_from(id).map(DType::width)
}

/// Unsigned integer width used for every index and dimension value of a tensor.
///
/// Identifiers are shared with the matching unsigned [`DType`] codes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum IndexType {
    U8 = 3,
    U16 = 4,
    U32 = 5,
    U64 = 6,
}

impl IndexType {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    /// Narrowest width whose range covers `max`.
    ///
    /// The comparison is strict, so an extent of 256 selects `U16`.
    pub fn for_extent(max: u64) -> Self {
        if max < 1 << 8 {
            Self::U8
        } else if max < 1 << 16 {
            Self::U16
        } else if max < 1 << 32 {
            Self::U32
        } else {
            Self::U64
        }
    }

    /// Narrowest width covering the largest of `dimensions`.
    pub fn for_dimensions(dimensions: &[u64]) -> Self {
        Self::for_extent(dimensions.iter().copied().max().unwrap_or(0))
    }

    pub fn as_dtype(self) -> DType {
        match self {
            Self::U8 => DType::UInt8,
            Self::U16 => DType::UInt16,
            Self::U32 => DType::UInt32,
            Self::U64 => DType::UInt64,
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dtype().name())
    }
}

impl TryFrom<u8> for IndexType {
    type Error = Qg8Error;

    fn try_from(value: u8) -> Result<Self> {
        match DType::try_from(value)? {
            DType::UInt8 => Ok(Self::U8),
            DType::UInt16 => Ok(Self::U16),
            DType::UInt32 => Ok(Self::U32),
            DType::UInt64 => Ok(Self::U64),
            other => Err(Qg8Error::UnsupportedDtype(other)),
        }
    }
}

/// Declared layout of a tensor's index arrays.
///
/// Stored as a discriminator only: the codec applies no deduplication or
/// symmetry for `SparseCoo` or `HalfHermitian`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Packing {
    #[default]
    Full = 1,
    SparseCoo = 2,
    HalfHermitian = 3,
}

impl Packing {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::SparseCoo => "sparse-coo",
            Self::HalfHermitian => "half-hermitian",
        }
    }
}

impl fmt::Display for Packing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Packing {
    type Error = Qg8Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Full),
            2 => Ok(Self::SparseCoo),
            3 => Ok(Self::HalfHermitian),
            _ => Err(Qg8Error::UnknownPacking(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_of_every_dtype() {
        let expected = [1, 1, 1, 2, 4, 8, 1, 2, 4, 8, 4, 8, 4, 8];
        for (id, want) in (1u8..=14).zip(expected) {
            assert_eq!(width_of(id).unwrap(), want, "dtype id {id}");
        }
    }

    #[test]
    fn test_width_of_unknown() {
        assert!(matches!(width_of(0), Err(Qg8Error::UnknownType(0))));
        assert!(matches!(width_of(15), Err(Qg8Error::UnknownType(15))));
    }

    #[test]
    fn test_dtype_id_roundtrip() {
        for id in 1u8..=14 {
            assert_eq!(DType::try_from(id).unwrap().id(), id);
        }
    }

    #[test]
    fn test_storable_dtypes() {
        assert!(!DType::Bool.is_storable());
        assert!(!DType::Char.is_storable());
        assert_eq!((1u8..=14).filter(|&id| DType::try_from(id).unwrap().is_storable()).count(), 12);
    }

    #[test]
    fn test_index_type_for_extent() {
        assert_eq!(IndexType::for_extent(2), IndexType::U8);
        assert_eq!(IndexType::for_extent(255), IndexType::U8);
        assert_eq!(IndexType::for_extent(256), IndexType::U16);
        assert_eq!(IndexType::for_extent(65535), IndexType::U16);
        assert_eq!(IndexType::for_extent(65536), IndexType::U32);
        assert_eq!(IndexType::for_extent(70000), IndexType::U32);
        assert_eq!(IndexType::for_extent(1 << 32), IndexType::U64);
    }

    #[test]
    fn test_index_type_for_dimensions() {
        assert_eq!(IndexType::for_dimensions(&[2, 2, 2]), IndexType::U8);
        assert_eq!(IndexType::for_dimensions(&[1, 2, 3, 4, 5, 6]), IndexType::U8);
        assert_eq!(IndexType::for_dimensions(&[3, 70000]), IndexType::U32);
    }

    #[test]
    fn test_index_type_rejects_non_index_dtypes() {
        assert_eq!(IndexType::try_from(5).unwrap(), IndexType::U32);
        assert!(matches!(
            IndexType::try_from(DType::Int8.id()),
            Err(Qg8Error::UnsupportedDtype(DType::Int8))
        ));
        assert!(matches!(IndexType::try_from(99), Err(Qg8Error::UnknownType(99))));
    }

    #[test]
    fn test_packing_codes() {
        assert_eq!(Packing::try_from(2).unwrap(), Packing::SparseCoo);
        assert!(matches!(Packing::try_from(0), Err(Qg8Error::UnknownPacking(0))));
    }
}
