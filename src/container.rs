//! The container object tying the layers together.
//!
//! [`SfsContainer`] binds a parsed [`Header`] to a [`BlockDevice`] over
//! the caller's backing store and exposes the format's operations:
//! directory iteration, file-chunk enumeration, whole-file reads,
//! in-place replacement, and tail truncation.
//!
//! The object is strictly single-threaded and synchronous. It owns no
//! cache - every operation re-reads the chunks it touches - and it never
//! closes the backing store; lifetime management stays with the caller.
//!
//! ## On-disk walk
//! ```text
//! Header.tree_offset ──> DirectoryTree ──next_chunk──> DirectoryTree ...
//!                          │ FileHeader.offset
//!                          v
//!                        FileChunk ──next_chunk──> FileChunk ...
//!                          │ dchunks[i]
//!                          v
//!                        FileDataChunk (payload)
//! ```

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, warn};

use crate::checksum::xor32;
use crate::compression::aacs;
use crate::crypto::aes::SfsAes;
use crate::crypto::chain;
use crate::device::{BlockDevice, SetLen};
use crate::structs::{
    CHUNK_HEADER_LEN, DirectoryTree, FLAG_BASE, FLAG_ENCRYPTED, FileChunk, FileDataChunk,
    FileHeader, HEADER_LEN, Header,
};
use crate::utils::{bytesa, expect_zero};
use crate::{Error, Result};

/// An open SFS container bound to a seekable backing store.
pub struct SfsContainer<S> {
    device: BlockDevice<S>,
    header: Header,
}

impl<S: Read + Seek> SfsContainer<S> {
    /// Parse the prologue of `store` and bind to it.
    ///
    /// Fails with [`Error::UnsupportedFormat`] on bad magics or a chunk
    /// size other than 4096.
    pub fn open(mut store: S) -> Result<Self> {
        store.seek(SeekFrom::Start(0))?;
        let prologue = bytesa::<HEADER_LEN>(&mut store)?;
        let header = Header::parse(&prologue)?;
        if header.chunk_size != 4096 {
            return Err(Error::UnsupportedFormat("chunk size"));
        }
        Ok(Self {
            device: BlockDevice::new(store, header.chunk_size as usize),
            header,
        })
    }

    /// The parsed container prologue.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Consume the container, returning the backing store.
    pub fn into_inner(self) -> S {
        self.device.into_inner()
    }

    fn chunk_size(&self) -> usize {
        self.device.chunk_size()
    }

    /// Walk the directory chain, yielding each chunk index with its
    /// parsed [`DirectoryTree`].
    ///
    /// The chain ends when all `n_entr` entries have been seen or the
    /// link field stops progressing; a shortfall of entries or a cycle is
    /// [`Error::CorruptContainer`].
    pub fn tree(&mut self) -> Result<Vec<(i32, DirectoryTree)>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut rem = self.header.n_entr as usize;
        let mut next = self.header.tree_offset;
        loop {
            if !seen.insert(next) {
                return Err(Error::CorruptContainer("directory chain cycle"));
            }
            let bytes = self.device.get_chunk(next)?;
            let dt = DirectoryTree::parse(&bytes, rem)?;
            rem -= dt.files.len();
            let link = dt.next_chunk;
            out.push((next, dt));
            if rem == 0 || link <= 0 || link == next {
                break;
            }
            next = link;
        }
        if rem != 0 {
            return Err(Error::CorruptContainer("directory entry count"));
        }
        Ok(out)
    }

    /// All directory entries in chain order.
    pub fn files(&mut self) -> Result<Vec<FileHeader>> {
        Ok(self
            .tree()?
            .into_iter()
            .flat_map(|(_, dt)| dt.files)
            .collect())
    }

    /// Follow `file`'s index-block chain, yielding each chunk index with
    /// its parsed [`FileChunk`]. Entries without data yield nothing.
    pub fn file_chunks(&mut self, file: &FileHeader) -> Result<Vec<(i32, FileChunk)>> {
        let mut out = Vec::new();
        if file.offset == -1 {
            return Ok(out);
        }
        let mut seen = HashSet::new();
        let mut next = file.offset;
        loop {
            if !seen.insert(next) {
                return Err(Error::CorruptContainer("index chunk cycle"));
            }
            let bytes = self.device.get_chunk(next)?;
            let fc = FileChunk::parse(&bytes)?;
            let link = fc.next_chunk;
            out.push((next, fc));
            if link <= 0 || link == next {
                break;
            }
            next = link;
        }
        Ok(out)
    }

    /// Read and reassemble `file`'s payload.
    ///
    /// Chunks flagged as encrypted are decrypted with the key derived
    /// from `password`. A payload opening with the `"AACS"` magic is
    /// unwrapped transparently; otherwise the declared size bounds the
    /// result and the chunk padding beyond it must be zero.
    ///
    /// When decryption was applied, any failure in those final checks
    /// surfaces as [`Error::AuthenticationMismatch`]: the format has no
    /// MAC, so a wrong password is indistinguishable from corruption.
    pub fn read_file(&mut self, file: &FileHeader, password: Option<&[u8]>) -> Result<Vec<u8>> {
        if file.offset == -1 {
            return Ok(Vec::new());
        }
        let cipher = match password {
            Some(pw) => Some(SfsAes::new(&file.decrypt_key(pw)?)?),
            None => None,
        };

        let mut data = Vec::new();
        let mut decrypted = false;
        for (_, fc) in self.file_chunks(file)? {
            for &idx in &fc.dchunks {
                let bytes = self.device.get_chunk(idx)?;
                let dc = FileDataChunk::parse(&bytes)?;
                match &cipher {
                    Some(cipher) => {
                        decrypted |= dc.is_encrypted();
                        data.extend_from_slice(&dc.plaintext(cipher));
                    }
                    None => data.extend_from_slice(&dc.data),
                }
            }
        }

        let garbled = |e| if decrypted { Error::AuthenticationMismatch } else { e };

        if data.len() >= 4 && &data[..4] == aacs::MAGIC {
            return aacs::unwrap(&data).map_err(garbled);
        }
        if (data.len() as u64) < file.size {
            return Err(garbled(Error::CorruptContainer(
                "payload shorter than declared size",
            )));
        }
        let size = file.size as usize;
        expect_zero(&data[size..], "payload padding").map_err(garbled)?;
        data.truncate(size);
        Ok(data)
    }
}

impl<S: Read + Write + Seek> SfsContainer<S> {
    /// Replace `file`'s payload in place.
    ///
    /// The payload is wrapped per `compression` (only level 1 is
    /// supported; `None` stores it raw), encrypted when a `password` is
    /// given, and written over the file's existing data chunks. The
    /// owning directory chunk is rewritten with the entry's new size.
    ///
    /// A payload needing more data chunks than the file currently owns
    /// fails with [`Error::GrowthNotSupported`]; there is no free-chunk
    /// allocator. Needing fewer rewrites the index block with the spare
    /// slots zeroed, leaving the freed chunks for [`SfsContainer::truncate`].
    pub fn write_file(
        &mut self,
        file: &FileHeader,
        data: &[u8],
        password: Option<&[u8]>,
        compression: Option<u32>,
    ) -> Result<()> {
        let payload = match compression {
            Some(level) => aacs::wrap(data, level)?,
            None => data.to_vec(),
        };
        let cipher = match password {
            Some(pw) => Some(SfsAes::new(&file.decrypt_key(pw)?)?),
            None => None,
        };

        // Rewrite the directory chunk owning this entry with the new size.
        let mut updated = false;
        for (idx, mut dt) in self.tree()? {
            if let Some(entry) = dt.files.iter_mut().find(|e| **e == *file) {
                entry.size = payload.len() as u64;
                let bytes = dt.serialize(self.chunk_size());
                self.device.put_chunk(idx, &bytes)?;
                updated = true;
                break;
            }
        }
        if !updated {
            return Err(Error::CorruptContainer("entry not in directory tree"));
        }

        let chunks = assemble_data_chunks(&payload, self.chunk_size(), cipher.as_ref());

        let bytes = self.device.get_chunk(file.offset)?;
        let mut fc = FileChunk::parse(&bytes)?;
        if fc.next_chunk != -1 {
            return Err(Error::NotImplemented("chained index blocks on write"));
        }
        if chunks.len() > fc.dchunks.len() {
            return Err(Error::GrowthNotSupported {
                needed: chunks.len(),
                available: fc.dchunks.len(),
            });
        }
        if chunks.len() < fc.dchunks.len() {
            let orphaned = fc.dchunks.split_off(chunks.len());
            warn!(
                "replacing {:?} leaves chunks {orphaned:?} unreferenced",
                file.filename
            );
            let bytes = fc.serialize(self.chunk_size());
            self.device.put_chunk(file.offset, &bytes)?;
        }

        for (chunk, &idx) in chunks.iter().zip(&fc.dchunks) {
            self.device.put_chunk(idx, chunk)?;
        }
        Ok(())
    }
}

impl<S: Read + Seek + SetLen> SfsContainer<S> {
    /// Drop every unreferenced chunk at the tail of the store.
    ///
    /// Walks the full reachable set - the reserved chunks 0-3, the
    /// directory chain, every index block and every data chunk - then
    /// shrinks the store past the trailing unreachable chunks. Seeing
    /// any chunk referenced twice is [`Error::CorruptContainer`].
    ///
    /// Idempotent: a second call finds nothing left to drop.
    pub fn truncate(&mut self) -> Result<()> {
        let mut reachable: HashSet<i32> = HashSet::from([0, 1, 2, 3]);
        let mut claim = |set: &mut HashSet<i32>, idx: i32| {
            if set.insert(idx) {
                Ok(())
            } else {
                Err(Error::CorruptContainer("duplicate chunk reference"))
            }
        };

        let tree = self.tree()?;
        for (idx, _) in &tree {
            claim(&mut reachable, *idx)?;
        }
        for (_, dt) in &tree {
            for file in &dt.files {
                for (idx, fc) in self.file_chunks(file)? {
                    claim(&mut reachable, idx)?;
                    for d in fc.dchunks {
                        claim(&mut reachable, d)?;
                    }
                }
            }
        }

        let mut last = self.device.end_chunk()?;
        while last > 0 && !reachable.contains(&(last - 1)) {
            last -= 1;
        }
        debug!("truncating container to {last} chunks");
        self.device.truncate_to(last)
    }
}

/// Split `payload` into framed data chunks: zero-padded to the chunk's
/// payload capacity, encrypted when a cipher is given (the chain restarts
/// per chunk), and prefixed with the 32-byte header carrying the XOR
/// checksum and flags.
fn assemble_data_chunks(payload: &[u8], chunk_size: usize, cipher: Option<&SfsAes>) -> Vec<Vec<u8>> {
    let capacity = chunk_size - CHUNK_HEADER_LEN;
    let mut chunks = Vec::with_capacity(payload.len().div_ceil(capacity));
    for piece in payload.chunks(capacity) {
        let mut body = piece.to_vec();
        body.resize(capacity, 0);
        let flags = match cipher {
            Some(cipher) => {
                chain::encrypt(cipher, &mut body);
                FLAG_BASE | FLAG_ENCRYPTED
            }
            None => FLAG_BASE,
        };
        let mut chunk = Vec::with_capacity(chunk_size);
        chunk.extend_from_slice(&(-1i32).to_le_bytes());
        chunk.extend_from_slice(&xor32(&body).to_le_bytes());
        chunk.extend_from_slice(&flags.to_le_bytes());
        chunk.extend_from_slice(&[0u8; 20]);
        chunk.extend_from_slice(&body);
        chunks.push(chunk);
    }
    chunks
}
