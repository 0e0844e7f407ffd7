//! Error types for QG8 encoding and decoding.

use std::io;
use thiserror::Error;

use crate::types::DType;

/// Result type alias for QG8 operations
pub type Result<T> = std::result::Result<T, Qg8Error>;

/// Errors surfaced by the codec, the file reader/writer and the graph.
#[derive(Error, Debug)]
pub enum Qg8Error {
    /// Absent or malformed caller input (zero rank, zero extent, length mismatch)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Bad magic, unsupported version or non-zero reserved bytes in the file header
    #[error("Corrupt file header: {0}")]
    CorruptHeader(String),

    /// Fewer bytes available than the format demands
    #[error("Unexpected end of file: {0}")]
    UnexpectedEof(String),

    /// Type code outside the 14 defined dtype codes
    #[error("Unknown type id: {0}")]
    UnknownType(u8),

    /// Known dtype that has no value storage, or a non-index type used as itype
    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(DType),

    /// Packing code outside full / sparse-COO / half-Hermitian
    #[error("Unknown packing id: {0}")]
    UnknownPacking(u8),

    /// Chunk frame or tensor payload that contradicts itself
    #[error("Corrupt chunk: {0}")]
    CorruptChunk(String),

    /// Graph chunk lookup past the end
    #[error("Chunk index {index} out of range for graph with {len} chunks")]
    ChunkIndexOutOfRange { index: usize, len: usize },

    /// Flush on a writer whose earlier flush failed partway through
    #[error("Writer for {0} is unusable after a failed flush")]
    WriterPoisoned(String),

    /// Underlying stream open/read/write/seek failure
    #[error("I/O failure: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Qg8Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof(e.to_string())
        } else {
            Self::Io(e)
        }
    }
}
