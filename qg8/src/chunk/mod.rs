//! Chunks: typed, optionally labeled records wrapping at most one tensor.

use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};

use log::debug;

use crate::config::CodecConfig;
use crate::error::Result;
use crate::tensor::Tensor;

pub mod frame;

pub use frame::{frame_header_len, FrameHeader, FrameInfo, FRAME_HEADER_LEN};

/// Flag bit marking a labeled chunk
pub const FLAG_LABEL: u8 = 0x01;

/// Fixed on-disk label size
pub const LABEL_LEN: usize = 16;

/// Chunk type tag.
///
/// Tags outside the named catalog are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkType(pub u16);

impl ChunkType {
    pub const ADJACENCY: Self = Self(1);
    pub const INPUT: Self = Self(2);
    pub const CONSTANT: Self = Self(3);
    pub const KET: Self = Self(4);
    pub const OPERATOR: Self = Self(5);
    pub const OBSERVABLE: Self = Self(6);
    pub const TIME: Self = Self(7);
    pub const TRACK: Self = Self(8);
    pub const NOISESPEC: Self = Self(9);
    pub const ADD: Self = Self(10);
    pub const SUBTRACT: Self = Self(11);
    pub const MATMUL: Self = Self(12);
    pub const JOIN: Self = Self(13);
    pub const SOLVE: Self = Self(14);
    pub const EXPECTATIONVALUE: Self = Self(15);
    pub const SAMPLE: Self = Self(16);

    /// Catalog name, `None` for tags outside it
    pub fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            1 => "adjacency",
            2 => "input",
            3 => "constant",
            4 => "ket",
            5 => "operator",
            6 => "observable",
            7 => "time",
            8 => "track",
            9 => "noisespec",
            10 => "add",
            11 => "subtract",
            12 => "matmul",
            13 => "join",
            14 => "solve",
            15 => "expectationvalue",
            16 => "sample",
            _ => return None,
        })
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

impl From<u16> for ChunkType {
    fn from(tag: u16) -> Self {
        Self(tag)
    }
}

/// 16-byte chunk label, zero padded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Label([u8; LABEL_LEN]);

impl Label {
    /// Label from text, truncated to 16 bytes
    pub fn new(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Label from raw bytes: the first 16 are kept, shorter input is zero padded
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = [0u8; LABEL_LEN];
        let n = bytes.len().min(LABEL_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }

    /// Text view with trailing zero padding removed
    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        let end = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.0[..end])
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:?})", self.as_str_lossy())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str_lossy())
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// One record of a QG8 file.
///
/// A chunk owns its tensor. The label flag bit and the label are kept in
/// agreement: a chunk has a label exactly when `flags & FLAG_LABEL` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    chunk_type: ChunkType,
    flags: u8,
    label: Option<Label>,
    tensor: Option<Tensor>,
}

impl Chunk {
    /// Create a chunk.
    ///
    /// Giving a label sets the label flag. A `flags` value that already has the
    /// label bit but no label yields an all-zero label.
    pub fn new(chunk_type: ChunkType, flags: u8, label: Option<&str>, tensor: Option<Tensor>) -> Self {
        let label = match label {
            Some(text) => Some(Label::new(text)),
            None if flags & FLAG_LABEL != 0 => Some(Label::default()),
            None => None,
        };
        Self::with_label(chunk_type, flags, label, tensor)
    }

    /// Create a chunk from a raw label.
    pub fn with_label(chunk_type: ChunkType, flags: u8, label: Option<Label>, tensor: Option<Tensor>) -> Self {
        let flags = if label.is_some() {
            flags | FLAG_LABEL
        } else {
            flags & !FLAG_LABEL
        };
        Self {
            chunk_type,
            flags,
            label,
            tensor,
        }
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn tensor(&self) -> Option<&Tensor> {
        self.tensor.as_ref()
    }

    pub fn tensor_mut(&mut self) -> Option<&mut Tensor> {
        self.tensor.as_mut()
    }

    /// Move the tensor out, leaving the chunk without one
    pub fn take_tensor(&mut self) -> Option<Tensor> {
        self.tensor.take()
    }

    pub fn into_tensor(self) -> Option<Tensor> {
        self.tensor
    }

    /// Frame header this chunk is written with
    pub fn frame_header(&self) -> Result<FrameHeader> {
        let skip = match &self.tensor {
            Some(tensor) => tensor.encoded_len()?,
            None => 0,
        };
        Ok(FrameHeader {
            chunk_type: self.chunk_type,
            flags: self.flags,
            label: self.label,
            skip,
        })
    }

    /// Total bytes of frame header plus payload
    pub fn encoded_len(&self) -> Result<u64> {
        let header = self.frame_header()?;
        Ok(header.header_len() + header.skip)
    }

    /// Write the frame header followed by the tensor payload, if any.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        let header = self.frame_header()?;
        header.write_to(w)?;
        if let Some(tensor) = &self.tensor {
            tensor.write_to(w)?;
        }
        Ok(())
    }

    /// Read one chunk: frame header, then the tensor payload when `skip > 0`.
    pub fn read_from<R: Read>(r: &mut R, config: &CodecConfig) -> Result<Self> {
        let header = FrameHeader::read_from(r, config)?;
        Self::read_payload(r, header, config)
    }

    /// Decode the payload that follows an already-read frame header.
    pub(crate) fn read_payload<R: Read>(r: &mut R, header: FrameHeader, config: &CodecConfig) -> Result<Self> {
        let tensor = if header.has_payload() {
            Some(Tensor::read_from(r, header.skip, config)?)
        } else {
            None
        };
        debug!(
            "decoded chunk type={} label={:?} skip={}",
            header.chunk_type,
            header.label.map(|l| l.as_str_lossy().into_owned()),
            header.skip
        );
        Ok(Self {
            chunk_type: header.chunk_type,
            flags: header.flags,
            label: header.label,
            tensor,
        })
    }
}
