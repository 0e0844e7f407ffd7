//! File header of the QG8 container.
//!
//! Every QG8 file starts with a fixed 16-byte header followed by zero or more
//! chunk frames up to end-of-file.

use std::io::{Read, Write};

use crate::error::{Qg8Error, Result};
use crate::element::Element;

/// QG8 format magic bytes
pub const QG8_MAGIC: [u8; 8] = *b"QG8ustra";

/// Current (and newest readable) QG8 format version
pub const QG8_VERSION: u16 = 1;

/// QG8 file header.
///
/// Format (16 bytes):
/// - magic: 8 bytes (b"QG8ustra")
/// - version: 2 bytes (u16, native byte order)
/// - reserved: 6 zero bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u16,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHeader {
    /// Header size in bytes
    pub const SIZE: u64 = 16;

    /// Create a header for the current format version
    pub fn new() -> Self {
        Self { version: QG8_VERSION }
    }

    /// Write header to writer
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&QG8_MAGIC)?;
        self.version.write_ne(w)?;
        w.write_all(&[0u8; 6])?;
        Ok(())
    }

    /// Read and validate a header.
    ///
    /// # Errors
    /// `CorruptHeader` for a wrong magic, a version outside `1..=QG8_VERSION`
    /// or non-zero reserved bytes; `UnexpectedEof` if the file is shorter than
    /// the header.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)?;
        if magic != QG8_MAGIC {
            return Err(Qg8Error::CorruptHeader(format!(
                "invalid QG8 magic: expected {:?}, got {:?}",
                String::from_utf8_lossy(&QG8_MAGIC),
                String::from_utf8_lossy(&magic)
            )));
        }

        let version = u16::read_ne(r)?;
        if !(1..=QG8_VERSION).contains(&version) {
            return Err(Qg8Error::CorruptHeader(format!(
                "unsupported QG8 version: {version} (expected 1..={QG8_VERSION})"
            )));
        }

        let mut reserved = [0u8; 6];
        r.read_exact(&mut reserved)?;
        if reserved != [0u8; 6] {
            return Err(Qg8Error::CorruptHeader(format!(
                "reserved header bytes are not zero: {reserved:?}"
            )));
        }

        Ok(Self { version })
    }
}
