//! Graph: the ordered chunk collection making up a QG8 file.

use std::path::Path;

use log::info;

use crate::chunk::Chunk;
use crate::config::CodecConfig;
use crate::error::{Qg8Error, Result};
use crate::file::{Qg8Reader, Qg8Writer};

/// Ordered collection of chunks.
///
/// Chunks keep insertion order, both when added and when loaded from a file,
/// so `Graph::load` followed by `Graph::write` reproduces the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    chunks: Vec<Chunk>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every chunk of a file with the default [`CodecConfig`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, CodecConfig::default())
    }

    /// Read every chunk of a file.
    ///
    /// Any decoding error aborts the load; chunks read before it are dropped.
    pub fn load_with(path: impl AsRef<Path>, config: CodecConfig) -> Result<Self> {
        let mut reader = Qg8Reader::open_with(path, config)?;
        let chunks = reader.chunks().collect::<Result<Vec<_>>>()?;
        info!("loaded {} chunk(s) from {}", chunks.len(), reader.path().display());
        Ok(Self { chunks })
    }

    /// Write every chunk, in order, to a new file at `path`.
    ///
    /// The graph keeps its chunks.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = Qg8Writer::create(path)?;
        for chunk in &self.chunks {
            writer.append(chunk);
        }
        writer.flush()?;
        writer.close()
    }

    /// Append a chunk; returns its index
    pub fn add_chunk(&mut self, chunk: Chunk) -> usize {
        self.chunks.push(chunk);
        self.chunks.len() - 1
    }

    /// Remove and return the chunk at `index`, shifting later chunks down.
    pub fn remove_chunk(&mut self, index: usize) -> Result<Chunk> {
        self.check_index(index)?;
        Ok(self.chunks.remove(index))
    }

    pub fn get_chunk(&self, index: usize) -> Result<&Chunk> {
        let len = self.chunks.len();
        self.chunks
            .get(index)
            .ok_or(Qg8Error::ChunkIndexOutOfRange { index, len })
    }

    pub fn get_chunk_mut(&mut self, index: usize) -> Result<&mut Chunk> {
        let len = self.chunks.len();
        self.chunks
            .get_mut(index)
            .ok_or(Qg8Error::ChunkIndexOutOfRange { index, len })
    }

    pub fn count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.chunks.len() {
            Ok(())
        } else {
            Err(Qg8Error::ChunkIndexOutOfRange {
                index,
                len: self.chunks.len(),
            })
        }
    }
}

impl From<Vec<Chunk>> for Graph {
    fn from(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }
}

impl FromIterator<Chunk> for Graph {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Graph {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
