//! Chunk-granular I/O over a seekable backing store.
//!
//! The container's chunk space starts at byte [`DATA_START`]; chunk `c`
//! occupies bytes `c * chunk_size + DATA_START ..` for one chunk. Index 0
//! is never addressable - the prologue and reserved area live below the
//! first valid chunk.
//!
//! [`BlockDevice`] keeps no cache and no state beyond the store itself:
//! every access is a fresh seek plus one read or write. Callers wanting
//! to share a device must serialize externally; the seek position is
//! clobbered by every call.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::{Error, Result};

/// Byte offset where chunk space begins.
pub const DATA_START: u64 = 280;

/// Backing stores whose total length can be changed.
///
/// `Seek + Write` alone cannot shorten a store, so truncation gets its
/// own seam. Implementations exist for the two stores the library is
/// used with: real files and in-memory buffers.
pub trait SetLen {
    /// Set the store's total length to `len` bytes.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl SetLen for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

impl SetLen for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

/// Fixed-size chunk access over any seekable store.
#[derive(Debug)]
pub struct BlockDevice<S> {
    store: S,
    chunk_size: usize,
}

impl<S> BlockDevice<S> {
    /// Wrap `store`; `chunk_size` comes from the container prologue.
    pub fn new(store: S, chunk_size: usize) -> Self {
        Self { store, chunk_size }
    }

    /// The fixed chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Consume the device, returning the backing store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn offset_of(&self, c: i32) -> Result<u64> {
        if c <= 0 {
            return Err(Error::InvalidChunk(c));
        }
        Ok(c as u64 * self.chunk_size as u64 + DATA_START)
    }
}

impl<S: Seek> BlockDevice<S> {
    /// One past the last addressable chunk index.
    ///
    /// The store length must be `DATA_START` plus a whole number of
    /// chunks; anything else means the file was cut mid-chunk.
    pub fn end_chunk(&mut self) -> Result<i32> {
        let len = self.store.seek(SeekFrom::End(0))?;
        if len < DATA_START || (len - DATA_START) % self.chunk_size as u64 != 0 {
            return Err(Error::CorruptContainer("store length not chunk-aligned"));
        }
        Ok(((len - DATA_START) / self.chunk_size as u64) as i32)
    }
}

impl<S: Read + Seek> BlockDevice<S> {
    /// Read chunk `c` in full.
    ///
    /// Fails with [`Error::InvalidChunk`] when `c <= 0` or the store ends
    /// before the chunk does.
    pub fn get_chunk(&mut self, c: i32) -> Result<Vec<u8>> {
        let pos = self.offset_of(c)?;
        self.store.seek(SeekFrom::Start(pos))?;
        let mut buf = vec![0u8; self.chunk_size];
        self.store.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::InvalidChunk(c),
            _ => Error::Io(e),
        })?;
        Ok(buf)
    }
}

impl<S: Write + Seek> BlockDevice<S> {
    /// Write chunk `c` in full.
    ///
    /// `buf` must be exactly one chunk; anything else is
    /// [`Error::SizeMismatch`].
    pub fn put_chunk(&mut self, c: i32, buf: &[u8]) -> Result<()> {
        if buf.len() != self.chunk_size {
            return Err(Error::SizeMismatch {
                expected: self.chunk_size,
                got: buf.len(),
            });
        }
        let pos = self.offset_of(c)?;
        self.store.seek(SeekFrom::Start(pos))?;
        self.store.write_all(buf)?;
        Ok(())
    }
}

impl<S: SetLen> BlockDevice<S> {
    /// Resize the store so `c` becomes its one-past-the-end chunk.
    pub fn truncate_to(&mut self, c: i32) -> Result<()> {
        if c <= 0 {
            return Err(Error::InvalidChunk(c));
        }
        self.store
            .set_len(c as u64 * self.chunk_size as u64 + DATA_START)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(chunks: i32) -> BlockDevice<Cursor<Vec<u8>>> {
        let len = DATA_START as usize + chunks as usize * 4096;
        BlockDevice::new(Cursor::new(vec![0u8; len]), 4096)
    }

    #[test]
    fn chunk_roundtrip() {
        let mut dev = device(4);
        let chunk = vec![0xA5u8; 4096];
        dev.put_chunk(2, &chunk).unwrap();
        assert_eq!(dev.get_chunk(2).unwrap(), chunk);
        // Neighbours stay untouched.
        assert_eq!(dev.get_chunk(1).unwrap(), vec![0u8; 4096]);
        assert_eq!(dev.get_chunk(3).unwrap(), vec![0u8; 4096]);
    }

    #[test]
    fn nonpositive_indices_are_invalid() {
        let mut dev = device(4);
        assert!(matches!(dev.get_chunk(0), Err(Error::InvalidChunk(0))));
        assert!(matches!(dev.get_chunk(-1), Err(Error::InvalidChunk(-1))));
        assert!(matches!(
            dev.put_chunk(0, &[0; 4096]),
            Err(Error::InvalidChunk(0))
        ));
    }

    #[test]
    fn reads_past_the_end_are_invalid() {
        let mut dev = device(4);
        assert!(matches!(dev.get_chunk(4), Err(Error::InvalidChunk(4))));
        assert!(dev.get_chunk(3).is_ok());
    }

    #[test]
    fn short_buffers_are_rejected() {
        let mut dev = device(4);
        assert!(matches!(
            dev.put_chunk(1, &[0; 100]),
            Err(Error::SizeMismatch {
                expected: 4096,
                got: 100
            })
        ));
    }

    #[test]
    fn end_chunk_counts_whole_chunks() {
        let mut dev = device(4);
        assert_eq!(dev.end_chunk().unwrap(), 4);
    }

    #[test]
    fn misaligned_store_is_corrupt() {
        let mut dev = BlockDevice::new(
            Cursor::new(vec![0u8; DATA_START as usize + 4096 + 1]),
            4096,
        );
        assert!(matches!(
            dev.end_chunk(),
            Err(Error::CorruptContainer("store length not chunk-aligned"))
        ));
    }

    #[test]
    fn truncate_drops_tail_chunks() {
        let mut dev = device(6);
        dev.truncate_to(4).unwrap();
        assert_eq!(dev.end_chunk().unwrap(), 4);
        assert!(matches!(dev.get_chunk(4), Err(Error::InvalidChunk(4))));
    }
}
