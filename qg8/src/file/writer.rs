//! Write-mode file handle.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::chunk::Chunk;
use crate::error::{Qg8Error, Result};
use crate::formats::FileHeader;

/// QG8 file opened for writing.
///
/// Chunks are borrowed, not owned: the caller (usually a [`Graph`]) keeps
/// ownership and must outlive the writer. Nothing reaches the file until
/// [`flush`](Self::flush).
///
/// [`Graph`]: crate::graph::Graph
pub struct Qg8Writer<'a> {
    path: PathBuf,
    stream: BufWriter<File>,
    pending: Vec<&'a Chunk>,
    header_written: bool,
    chunks_written: usize,
    poisoned: bool,
}

impl<'a> Qg8Writer<'a> {
    /// Create or truncate `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!("opened {} for writing", path.display());
        Ok(Self {
            path,
            stream: BufWriter::new(file),
            pending: Vec::new(),
            header_written: false,
            chunks_written: 0,
            poisoned: false,
        })
    }

    /// Queue a chunk; it is written on the next flush, after every chunk
    /// appended before it.
    pub fn append(&mut self, chunk: &'a Chunk) {
        self.pending.push(chunk);
    }

    /// Number of chunks appended since the last flush
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of chunks written by previous flushes
    pub fn chunks_written(&self) -> usize {
        self.chunks_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the file header (first flush only), then every pending chunk in
    /// append order, then flush the byte stream.
    ///
    /// The pending list is emptied, so a later flush only writes chunks
    /// appended after this one.
    ///
    /// # Errors
    /// A failed flush may leave part of the pending chunks on disk. The writer
    /// is poisoned from then on and every later flush returns `WriterPoisoned`.
    pub fn flush(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(Qg8Error::WriterPoisoned(self.path.display().to_string()));
        }
        if let Err(e) = self.write_pending() {
            warn!("flush of {} failed, writer poisoned: {e}", self.path.display());
            self.poisoned = true;
            return Err(e);
        }

        info!("wrote {} chunk(s) to {}", self.pending.len(), self.path.display());
        self.chunks_written += self.pending.len();
        self.pending.clear();
        Ok(())
    }

    /// Whether an earlier flush failed
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn write_pending(&mut self) -> Result<()> {
        if !self.header_written {
            FileHeader::new().write_to(&mut self.stream)?;
            self.header_written = true;
        }
        for chunk in &self.pending {
            chunk.write_to(&mut self.stream)?;
        }
        self.stream.flush()?;
        Ok(())
    }

    /// Flush buffered bytes and close the file.
    ///
    /// Chunks appended after the last [`flush`](Self::flush) are discarded.
    pub fn close(mut self) -> Result<()> {
        if !self.pending.is_empty() {
            warn!(
                "closing {} with {} unflushed chunk(s); they are discarded",
                self.path.display(),
                self.pending.len()
            );
        }
        self.stream.flush()?;
        Ok(())
    }
}
