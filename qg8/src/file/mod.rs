//! QG8 file handles.
//!
//! Reading and writing are separate types, so an append on a read handle or a
//! cursor over a write handle cannot be expressed.

mod reader;
mod writer;

pub use reader::{ChunkCursor, Qg8Reader};
pub use writer::Qg8Writer;
