//! Read-mode file handle and the chunk cursor.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::chunk::{Chunk, FrameHeader, FrameInfo};
use crate::config::CodecConfig;
use crate::error::{Qg8Error, Result};
use crate::formats::FileHeader;

/// QG8 file opened for reading, with a validated header.
pub struct Qg8Reader {
    path: PathBuf,
    stream: BufReader<File>,
    header: FileHeader,
    config: CodecConfig,
}

impl Qg8Reader {
    /// Open `path` and validate its header with the default [`CodecConfig`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, CodecConfig::default())
    }

    /// Open `path` and validate its header.
    ///
    /// # Errors
    /// `CorruptHeader` for a bad magic, version or reserved bytes;
    /// `UnexpectedEof` for a file shorter than the header. No handle is
    /// returned on failure.
    pub fn open_with(path: impl AsRef<Path>, config: CodecConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut stream = BufReader::new(File::open(&path)?);
        let header = FileHeader::read_from(&mut stream)?;
        info!("opened {} (QG8 version {})", path.display(), header.version);
        Ok(Self {
            path,
            stream,
            header,
            config,
        })
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Current file length, re-read on every call
    pub fn file_len(&self) -> Result<u64> {
        Ok(self.stream.get_ref().metadata()?.len())
    }

    /// Cursor positioned at the first chunk.
    ///
    /// Every call starts over from the beginning of the file.
    pub fn chunks(&mut self) -> ChunkCursor<'_> {
        ChunkCursor {
            reader: self,
            offset: FileHeader::SIZE,
            failed: false,
        }
    }

    /// Read the frame header at `offset` and check that its payload ends
    /// within the file. Returns the frame and the offset of the next one.
    fn read_frame_at(&mut self, offset: u64) -> Result<(FrameInfo, u64)> {
        let file_len = self.file_len()?;
        if offset >= file_len {
            return Err(Qg8Error::UnexpectedEof(format!(
                "no chunk at offset {offset}, file is {file_len} bytes"
            )));
        }

        self.stream.seek(SeekFrom::Start(offset))?;
        let header = FrameHeader::read_from(&mut self.stream, &self.config)?;
        let info = FrameInfo { offset, header };

        let end = info.end().ok_or_else(|| {
            Qg8Error::CorruptChunk(format!("skip value {} at offset {offset} overflows", header.skip))
        })?;
        if end > file_len {
            return Err(Qg8Error::UnexpectedEof(format!(
                "chunk at offset {offset} skips {} bytes past a {file_len}-byte file",
                header.skip
            )));
        }
        Ok((info, end))
    }
}

/// Forward-only cursor over the chunks of a [`Qg8Reader`].
///
/// `advance` walks frame headers without decoding payloads; `extract` decodes
/// one chunk fully. Both leave the cursor at the same place: the byte after the
/// frame header plus `skip`. As an iterator it yields chunks in file order and
/// stops after the first error.
pub struct ChunkCursor<'r> {
    reader: &'r mut Qg8Reader,
    offset: u64,
    failed: bool,
}

impl ChunkCursor<'_> {
    /// Whether another chunk starts at the current offset.
    pub fn has_next(&self) -> Result<bool> {
        Ok(self.offset < self.reader.file_len()?)
    }

    /// Byte offset of the next frame
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Skip over the next chunk without decoding its payload.
    ///
    /// Returns `false` at end of file.
    pub fn advance(&mut self) -> Result<bool> {
        Ok(self.advance_frame()?.is_some())
    }

    /// Skip over the next chunk and return its frame header.
    pub fn advance_frame(&mut self) -> Result<Option<FrameInfo>> {
        if !self.has_next()? {
            return Ok(None);
        }
        let (info, end) = self.reader.read_frame_at(self.offset)?;
        debug!(
            "skipping {} chunk at offset {} ({} payload bytes)",
            info.header.chunk_type, info.offset, info.header.skip
        );
        self.offset = end;
        Ok(Some(info))
    }

    /// Read the next frame header without moving the cursor.
    pub fn peek_frame(&mut self) -> Result<Option<FrameInfo>> {
        if !self.has_next()? {
            return Ok(None);
        }
        let (info, _) = self.reader.read_frame_at(self.offset)?;
        Ok(Some(info))
    }

    /// Decode the next chunk and move past it.
    ///
    /// # Errors
    /// `UnexpectedEof` when called at or past end of file; guard with
    /// [`has_next`](Self::has_next). Decoding errors leave the cursor where it was.
    pub fn extract(&mut self) -> Result<Chunk> {
        let (info, end) = self.reader.read_frame_at(self.offset)?;
        let chunk = Chunk::read_payload(&mut self.reader.stream, info.header, &self.reader.config)?;
        self.offset = end;
        Ok(chunk)
    }
}

impl Iterator for ChunkCursor<'_> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = match self.has_next() {
            Ok(false) => return None,
            Ok(true) => self.extract(),
            Err(e) => Err(e),
        };
        self.failed = result.is_err();
        Some(result)
    }
}
