//! Binary encoding of a tensor payload.
//!
//! Layout (native byte order):
//! - packing: 1 byte
//! - itype: 1 byte
//! - dtype: 1 byte
//! - rank: 2 bytes
//! - reserved: 3 zero bytes
//! - dimensions: rank values at itype width
//! - element count N: 8 bytes
//! - indices: rank arrays of N values at itype width
//! - values: N values at dtype width, followed by N imaginary values for complex dtypes

use std::io::{Read, Write};

use log::trace;

use super::{Tensor, Values};
use crate::config::CodecConfig;
use crate::element::{read_vec, write_slice, Element};
use crate::error::{Qg8Error, Result};
use crate::types::{DType, IndexType, Packing};

/// Fixed bytes of a tensor payload: the 8-byte header plus the 8-byte element count
pub const TENSOR_HEADER_LEN: u64 = 16;

/// Total payload length in bytes for a tensor of the given shape.
///
/// This is the value stored in the enclosing chunk frame's skip field, and the
/// value a decoder expects to consume. Returns `None` on arithmetic overflow.
pub fn payload_len(itype: IndexType, dtype: DType, rank: u64, num_elements: u64) -> Option<u64> {
    let iw = itype.width() as u64;
    let dw = dtype.width() as u64;
    let per_element = iw.checked_mul(rank)?.checked_add(dw.checked_mul(dtype.components())?)?;
    per_element
        .checked_mul(num_elements)?
        .checked_add(iw.checked_mul(rank)?)?
        .checked_add(TENSOR_HEADER_LEN)
}

/// Write index or dimension values narrowed to `itype` by plain truncation.
fn write_indices<W: Write>(w: &mut W, itype: IndexType, values: &[u64]) -> Result<()> {
    match itype {
        IndexType::U8 => write_slice(w, &values.iter().map(|&v| v as u8).collect::<Vec<_>>())?,
        IndexType::U16 => write_slice(w, &values.iter().map(|&v| v as u16).collect::<Vec<_>>())?,
        IndexType::U32 => write_slice(w, &values.iter().map(|&v| v as u32).collect::<Vec<_>>())?,
        IndexType::U64 => write_slice(w, values)?,
    }
    Ok(())
}

/// Read `count` values stored at `itype` width, widened to 64 bits.
fn read_indices<R: Read>(r: &mut R, itype: IndexType, count: u64) -> Result<Vec<u64>> {
    Ok(match itype {
        IndexType::U8 => widen(read_vec::<u8, _>(r, count)?),
        IndexType::U16 => widen(read_vec::<u16, _>(r, count)?),
        IndexType::U32 => widen(read_vec::<u32, _>(r, count)?),
        IndexType::U64 => read_vec::<u64, _>(r, count)?,
    })
}

fn widen<T: Into<u64>>(values: Vec<T>) -> Vec<u64> {
    values.into_iter().map(Into::into).collect()
}

impl Values {
    /// Write the real array, then the imaginary array for complex variants.
    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            Self::UInt8(v) => write_slice(w, v)?,
            Self::UInt16(v) => write_slice(w, v)?,
            Self::UInt32(v) => write_slice(w, v)?,
            Self::UInt64(v) => write_slice(w, v)?,
            Self::Int8(v) => write_slice(w, v)?,
            Self::Int16(v) => write_slice(w, v)?,
            Self::Int32(v) => write_slice(w, v)?,
            Self::Int64(v) => write_slice(w, v)?,
            Self::Float32(v) => write_slice(w, v)?,
            Self::Float64(v) => write_slice(w, v)?,
            Self::Complex64 { re, im } => {
                write_slice(w, re)?;
                write_slice(w, im)?;
            }
            Self::Complex128 { re, im } => {
                write_slice(w, re)?;
                write_slice(w, im)?;
            }
        }
        Ok(())
    }

    /// Read `count` values of `dtype`.
    ///
    /// float32 pairs with complex64 and float64 with complex128.
    pub(crate) fn read_from<R: Read>(r: &mut R, dtype: DType, count: u64) -> Result<Self> {
        Ok(match dtype {
            DType::UInt8 => Self::UInt8(read_vec(r, count)?),
            DType::UInt16 => Self::UInt16(read_vec(r, count)?),
            DType::UInt32 => Self::UInt32(read_vec(r, count)?),
            DType::UInt64 => Self::UInt64(read_vec(r, count)?),
            DType::Int8 => Self::Int8(read_vec(r, count)?),
            DType::Int16 => Self::Int16(read_vec(r, count)?),
            DType::Int32 => Self::Int32(read_vec(r, count)?),
            DType::Int64 => Self::Int64(read_vec(r, count)?),
            DType::Float32 => Self::Float32(read_vec(r, count)?),
            DType::Float64 => Self::Float64(read_vec(r, count)?),
            DType::Complex64 => {
                let re = read_vec(r, count)?;
                let im = read_vec(r, count)?;
                Self::Complex64 { re, im }
            }
            DType::Complex128 => {
                let re = read_vec(r, count)?;
                let im = read_vec(r, count)?;
                Self::Complex128 { re, im }
            }
            DType::Bool | DType::Char => return Err(Qg8Error::UnsupportedDtype(dtype)),
        })
    }
}

impl Tensor {
    /// Encoded payload length, as stored in the chunk frame's skip field.
    pub fn encoded_len(&self) -> Result<u64> {
        payload_len(self.itype, self.dtype(), self.rank() as u64, self.num_elements())
            .ok_or_else(|| Qg8Error::InvalidArgument("tensor payload length overflows u64".into()))
    }

    /// Write the tensor payload to a binary stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&[self.packing.id(), self.itype.id(), self.dtype().id()])?;
        (self.rank() as u16).write_ne(w)?;
        w.write_all(&[0u8; 3])?;
        write_indices(w, self.itype, &self.dimensions)?;
        self.num_elements().write_ne(w)?;

        for axis in &self.indices {
            write_indices(w, self.itype, axis)?;
        }
        self.values.write_to(w)
    }

    /// Read a tensor payload of `available` bytes (the frame's skip value).
    ///
    /// # Errors
    /// - `UnknownType` / `UnknownPacking` for undefined header codes
    /// - `UnsupportedDtype` for bool/char payloads or a non-index itype
    /// - `CorruptChunk` for a zero rank or extent, non-zero reserved bytes under
    ///   `strict_reserved`, or a payload size that disagrees with `available`
    /// - `UnexpectedEof` if the stream ends early
    pub fn read_from<R: Read>(r: &mut R, available: u64, config: &CodecConfig) -> Result<Self> {
        let mut header = [0u8; 8];
        r.read_exact(&mut header)?;

        let packing = Packing::try_from(header[0])?;
        let itype = IndexType::try_from(header[1])?;
        let dtype = DType::try_from(header[2])?;
        let rank = u16::from_ne_bytes([header[3], header[4]]);
        if config.is_strict_reserved() && header[5..8] != [0u8; 3] {
            return Err(Qg8Error::CorruptChunk(format!(
                "tensor header reserved bytes are not zero: {:?}",
                &header[5..8]
            )));
        }
        if rank == 0 {
            return Err(Qg8Error::CorruptChunk("tensor rank is zero".into()));
        }
        if !dtype.is_storable() {
            return Err(Qg8Error::UnsupportedDtype(dtype));
        }

        let dimensions = read_indices(r, itype, rank as u64)?;
        let num_elements = u64::read_ne(r)?;
        trace!(
            "tensor header: packing={packing} itype={itype} dtype={dtype} rank={rank} dims={dimensions:?} n={num_elements}"
        );

        if config.should_verify_payload_len() {
            let expected = payload_len(itype, dtype, rank as u64, num_elements).ok_or_else(|| {
                Qg8Error::CorruptChunk(format!("payload length of {num_elements} elements overflows"))
            })?;
            if expected != available {
                return Err(Qg8Error::CorruptChunk(format!(
                    "tensor payload needs {expected} bytes but chunk skip is {available}"
                )));
            }
        }

        let indices = (0..rank)
            .map(|_| read_indices(r, itype, num_elements))
            .collect::<Result<Vec<_>>>()?;
        let values = Values::read_from(r, dtype, num_elements)?;

        Tensor::from_parts(packing, itype, dimensions, indices, values).map_err(|e| match e {
            Qg8Error::InvalidArgument(msg) => Qg8Error::CorruptChunk(msg),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(t: &Tensor) -> Vec<u8> {
        let mut buf = Vec::new();
        t.write_to(&mut buf).unwrap();
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Tensor> {
        Tensor::read_from(&mut Cursor::new(bytes), bytes.len() as u64, &CodecConfig::default())
    }

    fn sample_i8() -> Tensor {
        let idx: Vec<Vec<u64>> = (0..3).map(|_| (0..8).collect()).collect();
        let re: Vec<i8> = (0..8).map(|i| (i * i) as i8).collect();
        Tensor::from_i8(idx, re, vec![2, 2, 2], Packing::Full).unwrap()
    }

    #[test]
    fn test_payload_len_formula() {
        // (1*3 + 1) * 8 + 1*3 + 16
        assert_eq!(payload_len(IndexType::U8, DType::Int8, 3, 8), Some(51));
        // (2*2 + 8*2) * 10 + 2*2 + 16
        assert_eq!(payload_len(IndexType::U16, DType::Complex128, 2, 10), Some(220));
        assert_eq!(payload_len(IndexType::U64, DType::Complex128, 2, u64::MAX), None);
    }

    #[test]
    fn test_encoded_len_matches_bytes_written() {
        let t = sample_i8();
        let bytes = encode(&t);
        assert_eq!(bytes.len() as u64, t.encoded_len().unwrap());
        assert_eq!(bytes.len(), 51);
    }

    #[test]
    fn test_header_bytes() {
        let bytes = encode(&sample_i8());
        assert_eq!(bytes[0], Packing::Full.id());
        assert_eq!(bytes[1], IndexType::U8.id());
        assert_eq!(bytes[2], DType::Int8.id());
        assert_eq!(u16::from_ne_bytes([bytes[3], bytes[4]]), 3);
        assert_eq!(&bytes[5..8], &[0, 0, 0]);
        assert_eq!(&bytes[8..11], &[2, 2, 2]);
        assert_eq!(u64::from_ne_bytes(bytes[11..19].try_into().unwrap()), 8);
        // first index array
        assert_eq!(&bytes[19..27], &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_roundtrip_int8() {
        let t = sample_i8();
        assert_eq!(decode(&encode(&t)).unwrap(), t);
    }

    #[test]
    fn test_roundtrip_complex_and_wide_indices() {
        let idx = vec![vec![0, 69_999, 12], vec![1, 2, 3]];
        let t = Tensor::from_f64(idx, vec![1.5, -2.5, 0.0], Some(vec![0.25, 0.5, -1.0]), vec![70_000, 4], Packing::SparseCoo)
            .unwrap();
        assert_eq!(t.itype(), IndexType::U32);
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.imag::<f64>().unwrap(), &[0.25, 0.5, -1.0]);
    }

    #[test]
    fn test_roundtrip_float32_is_not_complex() {
        let t = Tensor::from_f32(vec![vec![0, 1]], vec![0.5, 1.5], None, vec![2], Packing::Full).unwrap();
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back.dtype(), DType::Float32);
        assert!(back.imag::<f32>().is_none());
    }

    #[test]
    fn test_roundtrip_uint32_bounds() {
        let t = Tensor::from_u32(vec![vec![0, 1]], vec![u32::MAX, 7], vec![2], Packing::Full).unwrap();
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back.dtype(), DType::UInt32);
        assert_eq!(back.itype(), IndexType::U8);
        assert_eq!(back.real::<u32>().unwrap(), &[u32::MAX, 7]);
        assert_eq!(back, t);
    }

    #[test]
    fn test_roundtrip_uint64_with_wide_extent() {
        let extent = 1u64 << 34;
        let idx = vec![vec![0, (1u64 << 33) + 5, extent - 1]];
        let t = Tensor::from_u64(idx, vec![u64::MAX, 0, 1], vec![extent], Packing::SparseCoo).unwrap();
        assert_eq!(t.itype(), IndexType::U64);

        let bytes = encode(&t);
        assert_eq!(bytes.len() as u64, payload_len(IndexType::U64, DType::UInt64, 1, 3).unwrap());
        let back = decode(&bytes).unwrap();
        assert_eq!(back.indices()[0], vec![0, (1u64 << 33) + 5, extent - 1]);
        assert_eq!(back.real::<u64>().unwrap(), &[u64::MAX, 0, 1]);
        assert_eq!(back, t);
    }

    #[test]
    fn test_roundtrip_int16_bounds() {
        let idx = vec![vec![0, 300]];
        let t = Tensor::from_i16(idx, vec![i16::MIN, -1], vec![301], Packing::SparseCoo).unwrap();
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back.dtype(), DType::Int16);
        assert_eq!(back.itype(), IndexType::U16);
        assert_eq!(back.real::<i16>().unwrap(), &[i16::MIN, -1]);
        assert_eq!(back, t);
    }

    #[test]
    fn test_roundtrip_int32_bounds() {
        let idx = vec![vec![0, 1], vec![1, 0]];
        let t = Tensor::from_i32(idx, vec![i32::MIN, i32::MAX], vec![2, 2], Packing::HalfHermitian).unwrap();
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back.dtype(), DType::Int32);
        assert_eq!(back.packing(), Packing::HalfHermitian);
        assert_eq!(back.real::<i32>().unwrap(), &[i32::MIN, i32::MAX]);
        assert_eq!(back, t);
    }

    #[test]
    fn test_explicit_wide_itype_preserved() {
        let t = sample_i8().with_index_type(IndexType::U64).unwrap();
        let bytes = encode(&t);
        assert_eq!(bytes.len() as u64, payload_len(IndexType::U64, DType::Int8, 3, 8).unwrap());
        assert_eq!(decode(&bytes).unwrap().itype(), IndexType::U64);
    }

    #[test]
    fn test_indices_truncated_to_itype() {
        // 300 does not fit the u8 width chosen for extent 4
        let t = Tensor::from_u8(vec![vec![300]], vec![1], vec![4], Packing::SparseCoo).unwrap();
        let back = decode(&encode(&t)).unwrap();
        assert_eq!(back.indices()[0], vec![300 % 256]);
    }

    #[test]
    fn test_unsupported_dtype() {
        let mut bytes = encode(&sample_i8());
        bytes[2] = DType::Bool.id();
        assert!(matches!(decode(&bytes), Err(Qg8Error::UnsupportedDtype(DType::Bool))));
        bytes[2] = 42;
        assert!(matches!(decode(&bytes), Err(Qg8Error::UnknownType(42))));
    }

    #[test]
    fn test_non_index_itype() {
        let mut bytes = encode(&sample_i8());
        bytes[1] = DType::Float32.id();
        assert!(matches!(decode(&bytes), Err(Qg8Error::UnsupportedDtype(DType::Float32))));
    }

    #[test]
    fn test_unknown_packing() {
        let mut bytes = encode(&sample_i8());
        bytes[0] = 9;
        assert!(matches!(decode(&bytes), Err(Qg8Error::UnknownPacking(9))));
    }

    #[test]
    fn test_zero_rank_in_payload() {
        let mut bytes = encode(&sample_i8());
        bytes[3] = 0;
        bytes[4] = 0;
        assert!(matches!(decode(&bytes), Err(Qg8Error::CorruptChunk(_))));
    }

    #[test]
    fn test_zero_extent_in_payload() {
        let mut bytes = encode(&sample_i8());
        bytes[9] = 0;
        assert!(matches!(decode(&bytes), Err(Qg8Error::CorruptChunk(msg)) if msg.contains("extent 0")));
    }

    #[test]
    fn test_skip_mismatch_detected() {
        let bytes = encode(&sample_i8());
        let err = Tensor::read_from(&mut Cursor::new(&bytes), bytes.len() as u64 + 4, &CodecConfig::default());
        assert!(matches!(err, Err(Qg8Error::CorruptChunk(_))));

        let lenient = CodecConfig::new().verify_payload_len(false);
        assert!(Tensor::read_from(&mut Cursor::new(&bytes), bytes.len() as u64 + 4, &lenient).is_ok());
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = encode(&sample_i8());
        let cut = &bytes[..bytes.len() - 3];
        let lenient = CodecConfig::new().verify_payload_len(false);
        let err = Tensor::read_from(&mut Cursor::new(cut), cut.len() as u64, &lenient);
        assert!(matches!(err, Err(Qg8Error::UnexpectedEof(_))));
    }

    #[test]
    fn test_reserved_bytes() {
        let mut bytes = encode(&sample_i8());
        bytes[6] = 0xff;
        assert!(decode(&bytes).is_ok());

        let strict = CodecConfig::new().strict_reserved(true);
        let err = Tensor::read_from(&mut Cursor::new(&bytes), bytes.len() as u64, &strict);
        assert!(matches!(err, Err(Qg8Error::CorruptChunk(_))));
    }
}
