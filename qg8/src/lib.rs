//! QG8 - binary container format for labeled sparse tensors.
//!
//! A QG8 file is a 16-byte header followed by a sequence of chunk frames. Each
//! chunk carries a type tag, an optional 16-byte label and at most one tensor
//! stored as per-axis index arrays plus a value array. Every frame records its
//! payload length, so readers can walk a file without decoding tensors.
//!
//! # Byte order
//! The format has no endianness marker: every integer and float is stored in
//! the host's native byte order, so files only move between hosts of equal
//! byte order.
//!
//! # Usage
//! ```no_run
//! use qg8::{Chunk, ChunkType, Graph, Packing, Tensor};
//!
//! # fn main() -> qg8::Result<()> {
//! let indices: Vec<Vec<u64>> = (0..3).map(|_| (0..8).collect()).collect();
//! let values: Vec<i8> = (0..8).map(|i| (i * i) as i8).collect();
//! let tensor = Tensor::from_i8(indices, values, vec![2, 2, 2], Packing::Full)?;
//!
//! let mut graph = Graph::new();
//! graph.add_chunk(Chunk::new(ChunkType::KET, 0, Some("chunk1"), Some(tensor)));
//! graph.write("state.qg8")?;
//!
//! let loaded = Graph::load("state.qg8")?;
//! assert_eq!(loaded.count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod config;
pub mod element;
pub mod error;
pub mod fatal;
pub mod file;
pub mod formats;
pub mod graph;
pub mod tensor;
pub mod types;


// Re-exports
pub use chunk::{frame_header_len, Chunk, ChunkType, FrameHeader, FrameInfo, Label, FLAG_LABEL, LABEL_LEN};
pub use config::CodecConfig;
pub use element::Element;
pub use error::{Qg8Error, Result};
pub use file::{ChunkCursor, Qg8Reader, Qg8Writer};
pub use formats::{FileHeader, QG8_MAGIC, QG8_VERSION};
pub use graph::Graph;
pub use tensor::{payload_len, Tensor, TensorParts, Values};
pub use types::{width_of, DType, IndexType, Packing};
