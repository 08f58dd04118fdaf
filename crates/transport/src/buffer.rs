//! Rewindable byte buffer used for request and response payloads.
//!
//! A [`StreamBuffer`] starts in memory and moves its content to an anonymous
//! temporary file once it grows past the spill threshold, so large uploads and
//! downloads never have to live in memory as a whole. The temporary file is
//! removed by the OS as soon as the buffer is dropped.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use tracing::trace;

/// Default number of bytes kept in memory before spilling to disk.
pub const DEFAULT_SPILL_THRESHOLD: usize = 2 * 1024 * 1024;

#[derive(Debug)]
pub struct StreamBuffer {
    storage: Storage,
    spill_threshold: usize,
}

#[derive(Debug)]
enum Storage {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::with_spill_threshold(DEFAULT_SPILL_THRESHOLD)
    }

    pub fn with_spill_threshold(spill_threshold: usize) -> Self {
        Self { storage: Storage::Memory(Cursor::new(Vec::new())), spill_threshold }
    }

    /// Writes `bytes` into a fresh buffer and rewinds it, ready to be read back.
    ///
    /// # Errors
    ///
    /// Returns an error if the content had to spill and the temporary file can't be written.
    pub fn from_bytes(bytes: &[u8], spill_threshold: usize) -> io::Result<Self> {
        let mut buffer = Self::with_spill_threshold(spill_threshold);
        buffer.write_all(bytes)?;
        buffer.rewind()?;
        Ok(buffer)
    }

    /// Returns true if the content has been moved to a temporary file.
    pub fn is_spilled(&self) -> bool {
        matches!(self.storage, Storage::File(_))
    }

    /// Total number of bytes stored, regardless of the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata of the temporary file can't be read.
    pub fn len(&self) -> io::Result<u64> {
        match &self.storage {
            Storage::Memory(cursor) => Ok(cursor.get_ref().len() as u64),
            Storage::File(file) => Ok(file.metadata()?.len()),
        }
    }

    /// # Errors
    ///
    /// See [`StreamBuffer::len`].
    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    fn spill(&mut self) -> io::Result<()> {
        let Storage::Memory(cursor) = &self.storage else {
            return Ok(());
        };

        let position = cursor.position();
        let size = cursor.get_ref().len();
        let mut file = tempfile::tempfile()?;
        file.write_all(cursor.get_ref())?;
        file.seek(SeekFrom::Start(position))?;
        trace!(size, "stream buffer spilled to temporary file");

        self.storage = Storage::File(file);
        Ok(())
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for StreamBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.storage {
            Storage::Memory(cursor) => cursor.read(buf),
            Storage::File(file) => file.read(buf),
        }
    }
}

impl Write for StreamBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let overflow = match &self.storage {
            Storage::Memory(cursor) => cursor.position() as usize + buf.len() > self.spill_threshold,
            Storage::File(_) => false,
        };
        if overflow {
            self.spill()?;
        }

        match &mut self.storage {
            Storage::Memory(cursor) => cursor.write(buf),
            Storage::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.storage {
            Storage::Memory(_) => Ok(()),
            Storage::File(file) => file.flush(),
        }
    }
}

impl Seek for StreamBuffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.storage {
            Storage::Memory(cursor) => cursor.seek(pos),
            Storage::File(file) => file.seek(pos),
        }
    }
}
