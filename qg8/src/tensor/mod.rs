//! Tensor - labeled sparse/dense tensor stored as (index tuple, value) pairs.

use crate::element::Element;
use crate::error::{Qg8Error, Result};
use crate::types::{DType, IndexType, Packing};

pub mod codec;
mod values;

pub use codec::{payload_len, TENSOR_HEADER_LEN};
pub use values::Values;

/// Multi-dimensional tensor stored as parallel per-axis index arrays plus values.
///
/// Invariants, checked at construction:
/// - rank (number of dimensions) is at least 1 and fits in 16 bits
/// - no dimension extent is zero
/// - there is one index array per axis and every index array, value array and
///   imaginary array has the same length (the element count)
///
/// Index values are not checked against the dimensions; they are stored as
/// given and narrowed to the index width on encode.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    packing: Packing,
    itype: IndexType,
    dimensions: Vec<u64>,
    indices: Vec<Vec<u64>>,
    values: Values,
}

/// Owned pieces of a tensor, returned by [`Tensor::into_parts`].
#[derive(Debug, Clone, PartialEq)]
pub struct TensorParts {
    pub packing: Packing,
    pub itype: IndexType,
    pub dimensions: Vec<u64>,
    pub indices: Vec<Vec<u64>>,
    pub values: Values,
}

macro_rules! typed_constructor {
    ($name:ident, $t:ty) => {
        #[doc = concat!("Create a tensor holding `", stringify!($t), "` values.")]
        pub fn $name(
            indices: Vec<Vec<u64>>,
            re: Vec<$t>,
            dimensions: Vec<u64>,
            packing: Packing,
        ) -> Result<Self> {
            Self::new(indices, Values::from(re), dimensions, packing)
        }
    };
}

impl Tensor {
    /// Create a tensor, choosing the narrowest index width that covers the
    /// largest dimension.
    ///
    /// # Errors
    /// `InvalidArgument` if any construction invariant is violated.
    pub fn new(
        indices: Vec<Vec<u64>>,
        values: impl Into<Values>,
        dimensions: Vec<u64>,
        packing: Packing,
    ) -> Result<Self> {
        let itype = IndexType::for_dimensions(&dimensions);
        Self::from_parts(packing, itype, dimensions, indices, values.into())
    }

    typed_constructor!(from_u8, u8);
    typed_constructor!(from_u16, u16);
    typed_constructor!(from_u32, u32);
    typed_constructor!(from_u64, u64);
    typed_constructor!(from_i8, i8);
    typed_constructor!(from_i16, i16);
    typed_constructor!(from_i32, i32);
    typed_constructor!(from_i64, i64);

    /// Create a float32 tensor, or complex64 when `im` is given.
    pub fn from_f32(
        indices: Vec<Vec<u64>>,
        re: Vec<f32>,
        im: Option<Vec<f32>>,
        dimensions: Vec<u64>,
        packing: Packing,
    ) -> Result<Self> {
        Self::new(indices, Values::from_f32(re, im), dimensions, packing)
    }

    /// Create a float64 tensor, or complex128 when `im` is given.
    pub fn from_f64(
        indices: Vec<Vec<u64>>,
        re: Vec<f64>,
        im: Option<Vec<f64>>,
        dimensions: Vec<u64>,
        packing: Packing,
    ) -> Result<Self> {
        Self::new(indices, Values::from_f64(re, im), dimensions, packing)
    }

    /// Validate and assemble a tensor with an explicit index width.
    pub(crate) fn from_parts(
        packing: Packing,
        itype: IndexType,
        dimensions: Vec<u64>,
        indices: Vec<Vec<u64>>,
        values: Values,
    ) -> Result<Self> {
        let rank = dimensions.len();
        if rank == 0 {
            return Err(Qg8Error::InvalidArgument("tensor rank must be at least 1".into()));
        }
        if rank > u16::MAX as usize {
            return Err(Qg8Error::InvalidArgument(format!(
                "tensor rank {rank} exceeds {}",
                u16::MAX
            )));
        }
        if let Some(axis) = dimensions.iter().position(|&d| d == 0) {
            return Err(Qg8Error::InvalidArgument(format!("dimension {axis} has extent 0")));
        }
        if indices.len() != rank {
            return Err(Qg8Error::InvalidArgument(format!(
                "expected {rank} index arrays, got {}",
                indices.len()
            )));
        }

        let num_elements = values.len();
        if let Some(im_len) = values.imag_len() {
            if im_len != num_elements {
                return Err(Qg8Error::InvalidArgument(format!(
                    "imaginary array has {im_len} elements, real array has {num_elements}"
                )));
            }
        }
        if let Some((axis, idx)) = indices.iter().enumerate().find(|(_, idx)| idx.len() != num_elements) {
            return Err(Qg8Error::InvalidArgument(format!(
                "index array {axis} has {} elements, value array has {num_elements}",
                idx.len()
            )));
        }

        Ok(Self {
            packing,
            itype,
            dimensions,
            indices,
            values,
        })
    }

    /// Store indices at a wider width than the one chosen at construction.
    ///
    /// # Errors
    /// `InvalidArgument` if `itype` cannot represent the largest dimension.
    pub fn with_index_type(mut self, itype: IndexType) -> Result<Self> {
        let required = IndexType::for_dimensions(&self.dimensions);
        if itype < required {
            return Err(Qg8Error::InvalidArgument(format!(
                "index type {itype} is narrower than required {required}"
            )));
        }
        self.itype = itype;
        Ok(self)
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    pub fn itype(&self) -> IndexType {
        self.itype
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    /// Number of stored (index tuple, value) pairs
    pub fn num_elements(&self) -> u64 {
        self.values.len() as u64
    }

    /// Per-axis index arrays, widened to 64 bits
    pub fn indices(&self) -> &[Vec<u64>] {
        &self.indices
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Real component array, if the tensor stores `T` values.
    ///
    /// For complex tensors use the component type (`f32` for complex64).
    pub fn real<T: Element>(&self) -> Option<&[T]> {
        T::real(&self.values)
    }

    /// Imaginary component array; `None` unless the tensor is complex over `T`.
    pub fn imag<T: Element>(&self) -> Option<&[T]> {
        T::imag(&self.values)
    }

    /// Product of the dimensions (element count of a full packing), `None` on overflow
    pub fn dense_len(&self) -> Option<u64> {
        self.dimensions.iter().try_fold(1u64, |acc, &d| acc.checked_mul(d))
    }

    pub fn into_parts(self) -> TensorParts {
        TensorParts {
            packing: self.packing,
            itype: self.itype,
            dimensions: self.dimensions,
            indices: self.indices,
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_indices(rank: usize, n: u64) -> Vec<Vec<u64>> {
        (0..rank).map(|_| (0..n).collect()).collect()
    }

    #[test]
    fn test_create_int8() {
        let re: Vec<i8> = (0..8).map(|i| (i * i) as i8).collect();
        let t = Tensor::from_i8(diagonal_indices(3, 8), re, vec![2, 2, 2], Packing::Full).unwrap();

        assert_eq!(t.rank(), 3);
        assert_eq!(t.num_elements(), 8);
        assert_eq!(t.itype(), IndexType::U8);
        assert_eq!(t.dtype(), DType::Int8);
        assert_eq!(t.dimensions(), &[2, 2, 2]);
        assert_eq!(t.indices()[2], (0..8).collect::<Vec<u64>>());
        assert_eq!(t.real::<i8>().unwrap(), &[0, 1, 4, 9, 16, 25, 36, 49]);
        assert!(t.imag::<i8>().is_none());
    }

    #[test]
    fn test_create_complex_variants() {
        let re: Vec<f32> = (0..8).map(|i| (i * i) as f32).collect();
        let im: Vec<f32> = (0..8).map(|i| -(i as f32)).collect();
        let t = Tensor::from_f32(diagonal_indices(3, 8), re.clone(), Some(im.clone()), vec![2, 2, 2], Packing::Full)
            .unwrap();
        assert_eq!(t.dtype(), DType::Complex64);
        assert_eq!(t.real::<f32>().unwrap(), re.as_slice());
        assert_eq!(t.imag::<f32>().unwrap(), im.as_slice());

        let t = Tensor::from_f64(diagonal_indices(3, 8), vec![0.0; 8], None, vec![2, 2, 2], Packing::Full).unwrap();
        assert_eq!(t.dtype(), DType::Float64);
        assert!(t.imag::<f64>().is_none());
    }

    #[test]
    fn test_every_integer_constructor_sets_dtype() {
        let idx = || diagonal_indices(1, 2);
        let dims = || vec![4];
        assert_eq!(Tensor::from_u8(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::UInt8);
        assert_eq!(Tensor::from_u16(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::UInt16);
        assert_eq!(Tensor::from_u32(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::UInt32);
        assert_eq!(Tensor::from_u64(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::UInt64);
        assert_eq!(Tensor::from_i16(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::Int16);
        assert_eq!(Tensor::from_i32(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::Int32);
        assert_eq!(Tensor::from_i64(idx(), vec![1, 2], dims(), Packing::Full).unwrap().dtype(), DType::Int64);
    }

    #[test]
    fn test_index_width_selection() {
        let t = Tensor::from_u8(diagonal_indices(6, 1), vec![0], vec![1, 2, 3, 4, 5, 6], Packing::Full).unwrap();
        assert_eq!(t.itype(), IndexType::U8);

        let t = Tensor::from_u8(diagonal_indices(2, 1), vec![0], vec![256, 256], Packing::Full).unwrap();
        assert_eq!(t.itype(), IndexType::U16);

        let t = Tensor::from_u8(diagonal_indices(1, 1), vec![0], vec![70000], Packing::SparseCoo).unwrap();
        assert_eq!(t.itype(), IndexType::U32);
    }

    #[test]
    fn test_indices_beyond_dimensions_are_accepted() {
        // index 7 on axes of extent 2
        let t = Tensor::from_i8(diagonal_indices(3, 8), vec![0; 8], vec![2, 2, 2], Packing::Full);
        assert!(t.is_ok());
    }

    #[test]
    fn test_rank_zero_rejected() {
        let err = Tensor::from_i32(vec![], vec![1], vec![], Packing::Full).unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(_)));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Tensor::from_i32(diagonal_indices(3, 8), vec![0; 8], vec![2, 0, 2], Packing::Full).unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(msg) if msg.contains("dimension 1")));
    }

    #[test]
    fn test_missing_indices_rejected() {
        let err = Tensor::from_i32(vec![], vec![0; 8], vec![2, 2, 2], Packing::Full).unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_values_rejected() {
        let err = Tensor::from_i32(diagonal_indices(3, 8), vec![], vec![2, 2, 2], Packing::Full).unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(_)));
    }

    #[test]
    fn test_mismatched_imaginary_rejected() {
        let err = Tensor::from_f64(diagonal_indices(1, 2), vec![1.0, 2.0], Some(vec![1.0]), vec![2], Packing::Full)
            .unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_tensor_is_valid() {
        let t = Tensor::from_u8(diagonal_indices(2, 0), vec![], vec![3, 3], Packing::SparseCoo).unwrap();
        assert_eq!(t.num_elements(), 0);
        assert_eq!(t.dense_len(), Some(9));
    }

    #[test]
    fn test_with_index_type() {
        let t = Tensor::from_u8(diagonal_indices(1, 1), vec![7], vec![300], Packing::Full).unwrap();
        assert_eq!(t.itype(), IndexType::U16);

        let wide = t.clone().with_index_type(IndexType::U64).unwrap();
        assert_eq!(wide.itype(), IndexType::U64);

        let err = t.with_index_type(IndexType::U8).unwrap_err();
        assert!(matches!(err, Qg8Error::InvalidArgument(_)));
    }

    #[test]
    fn test_dense_len_overflow() {
        let t = Tensor::from_u8(diagonal_indices(2, 0), vec![], vec![u64::MAX, 2], Packing::SparseCoo).unwrap();
        assert_eq!(t.dense_len(), None);
    }

    #[test]
    fn test_into_parts() {
        let t = Tensor::from_u16(diagonal_indices(1, 2), vec![5, 6], vec![2], Packing::HalfHermitian).unwrap();
        let parts = t.into_parts();
        assert_eq!(parts.packing, Packing::HalfHermitian);
        assert_eq!(parts.values, Values::UInt16(vec![5, 6]));
    }
}
