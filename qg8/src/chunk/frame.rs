//! Chunk frame header.
//!
//! Layout (native byte order):
//! - type: 2 bytes
//! - flags: 1 byte, bit 0 set when a label follows
//! - label: 16 bytes, only when flagged
//! - reserved: 5 zero bytes
//! - skip: 8 bytes, byte length of the tensor payload that follows (0 = none)

use std::io::{Read, Write};

use super::{ChunkType, Label, FLAG_LABEL, LABEL_LEN};
use crate::config::CodecConfig;
use crate::element::Element;
use crate::error::{Qg8Error, Result};

/// Size of an unlabeled frame header
pub const FRAME_HEADER_LEN: u64 = 16;

/// Bytes a frame header occupies on disk.
///
/// Shared by the writer (which lays frames out) and the reader (which skips
/// over them), so both always agree on frame boundaries.
pub fn frame_header_len(has_label: bool) -> u64 {
    if has_label {
        FRAME_HEADER_LEN + LABEL_LEN as u64
    } else {
        FRAME_HEADER_LEN
    }
}

/// Decoded chunk frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub chunk_type: ChunkType,
    pub flags: u8,
    /// Present exactly when `flags` has the label bit set
    pub label: Option<Label>,
    pub skip: u64,
}

impl FrameHeader {
    /// Encoded size of this header
    pub fn header_len(&self) -> u64 {
        frame_header_len(self.label.is_some())
    }

    /// Whether a tensor payload follows
    pub fn has_payload(&self) -> bool {
        self.skip != 0
    }

    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        self.chunk_type.0.write_ne(w)?;
        w.write_all(&[self.flags])?;
        if let Some(label) = &self.label {
            w.write_all(label.as_bytes())?;
        }
        w.write_all(&[0u8; 5])?;
        self.skip.write_ne(w)?;
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(r: &mut R, config: &CodecConfig) -> Result<Self> {
        let chunk_type = ChunkType(u16::read_ne(r)?);
        let flags = u8::read_ne(r)?;

        let label = if flags & FLAG_LABEL != 0 {
            let mut bytes = [0u8; LABEL_LEN];
            r.read_exact(&mut bytes)?;
            Some(Label::from_bytes(&bytes))
        } else {
            None
        };

        let mut reserved = [0u8; 5];
        r.read_exact(&mut reserved)?;
        if config.is_strict_reserved() && reserved != [0u8; 5] {
            return Err(Qg8Error::CorruptChunk(format!(
                "chunk frame reserved bytes are not zero: {reserved:?}"
            )));
        }

        let skip = u64::read_ne(r)?;
        Ok(Self {
            chunk_type,
            flags,
            label,
            skip,
        })
    }
}

/// A frame header together with the file offset it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub offset: u64,
    pub header: FrameHeader,
}

impl FrameInfo {
    /// Offset of the first payload byte
    pub fn payload_offset(&self) -> u64 {
        self.offset + self.header.header_len()
    }

    /// Offset of the next frame, `None` if the skip value overflows
    pub fn end(&self) -> Option<u64> {
        self.payload_offset().checked_add(self.header.skip)
    }
}
