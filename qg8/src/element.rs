//! Scalar element I/O.
//!
//! Every storable value type and every index width goes through [`Element`].
//! All multi-byte values use the host's native byte order: QG8 carries no
//! endianness tag, so files are only portable between hosts of equal byte order.

use std::fmt::Debug;
use std::io::{self, Read, Write};

use crate::tensor::Values;
use crate::types::DType;

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width scalar that can be stored in a QG8 value or index array.
pub trait Element: Copy + PartialEq + Debug + Default + sealed::Sealed {
    /// Dtype of a real-valued array of this element type
    const DTYPE: DType;
    /// Encoded byte width
    const WIDTH: usize;

    /// Decode one element from exactly `WIDTH` native-endian bytes
    fn from_ne_slice(bytes: &[u8]) -> Self;

    /// Append the native-endian encoding to `out`
    fn extend_ne(&self, out: &mut Vec<u8>);

    /// Write a single element
    fn write_ne<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(Self::WIDTH);
        self.extend_ne(&mut buf);
        w.write_all(&buf)
    }

    /// Read a single element
    fn read_ne<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; 8];
        r.read_exact(&mut buf[..Self::WIDTH])?;
        Ok(Self::from_ne_slice(&buf[..Self::WIDTH]))
    }

    /// Real component view if `values` stores this element type
    fn real(values: &Values) -> Option<&[Self]>;

    /// Imaginary component view if `values` is complex over this element type
    fn imag(_values: &Values) -> Option<&[Self]> {
        None
    }
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident, $variant:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            const WIDTH: usize = std::mem::size_of::<$t>();

            fn from_ne_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_ne_bytes(buf)
            }

            fn extend_ne(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_ne_bytes());
            }

            fn real(values: &Values) -> Option<&[Self]> {
                match values {
                    Values::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, UInt8, UInt8);
impl_element!(u16, UInt16, UInt16);
impl_element!(u32, UInt32, UInt32);
impl_element!(u64, UInt64, UInt64);
impl_element!(i8, Int8, Int8);
impl_element!(i16, Int16, Int16);
impl_element!(i32, Int32, Int32);
impl_element!(i64, Int64, Int64);

macro_rules! impl_float_element {
    ($t:ty, $dtype:ident, $real:ident, $complex:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            const WIDTH: usize = std::mem::size_of::<$t>();

            fn from_ne_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_ne_bytes(buf)
            }

            fn extend_ne(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_ne_bytes());
            }

            fn real(values: &Values) -> Option<&[Self]> {
                match values {
                    Values::$real(v) => Some(v),
                    Values::$complex { re, .. } => Some(re),
                    _ => None,
                }
            }

            fn imag(values: &Values) -> Option<&[Self]> {
                match values {
                    Values::$complex { im, .. } => Some(im),
                    _ => None,
                }
            }
        }
    };
}

impl_float_element!(f32, Float32, Float32, Complex64);
impl_float_element!(f64, Float64, Float64, Complex128);

/// Write a whole array in one `write_all`.
pub(crate) fn write_slice<T: Element, W: Write>(w: &mut W, values: &[T]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(values.len() * T::WIDTH);
    for v in values {
        v.extend_ne(&mut buf);
    }
    w.write_all(&buf)
}

/// Read exactly `count` elements.
///
/// Bytes are pulled through `take` so a corrupt count cannot force a huge
/// up-front allocation; a short stream fails with `UnexpectedEof`.
pub(crate) fn read_vec<T: Element, R: Read>(r: &mut R, count: u64) -> io::Result<Vec<T>> {
    let byte_len = count.checked_mul(T::WIDTH as u64).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("array of {count} {}-byte elements overflows", T::WIDTH),
        )
    })?;

    let mut bytes = Vec::new();
    r.take(byte_len).read_to_end(&mut bytes)?;
    if (bytes.len() as u64) != byte_len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {byte_len} bytes, got {}", bytes.len()),
        ));
    }

    Ok(bytes.chunks_exact(T::WIDTH).map(T::from_ne_slice).collect())
}
