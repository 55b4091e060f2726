//! Fixed-layout codecs for the on-disk records of an SFS container.
//!
//! All integers are little-endian; signed 32-bit chunk indices use `-1`
//! as the "none" sentinel. Parsed structs are transient views - the
//! backing store owns every chunk, and the linked structures reference
//! each other by chunk index, never by pointer.
//!
//! ## Records
//! | Record | Size | Purpose |
//! |--------|------|---------|
//! | [`Header`]        | 364 B       | Container prologue at offset 0 |
//! | [`DirectoryTree`] | one chunk   | A run of [`FileHeader`] records plus a chain link |
//! | [`FileHeader`]    | 512 B       | One named file entry |
//! | [`FileChunk`]     | one chunk   | Index block listing a file's data chunks |
//! | [`FileDataChunk`] | one chunk   | 32-byte header plus payload |

use std::io::Cursor;

use crate::checksum::xor32;
use crate::crypto::aes::SfsAes;
use crate::crypto::{chain, keys};
use crate::utils::{all_zero, bytesa, expect_zero, le_i32, le_i64, le_u32, le_u64, magic, padded_ascii};
use crate::{Error, Result};

/// Size of the container prologue read at offset 0.
pub const HEADER_LEN: usize = 364;

/// Size of one directory entry record.
pub const ENTRY_LEN: usize = 512;

/// Size of the fixed header at the start of every typed chunk.
pub const CHUNK_HEADER_LEN: usize = 32;

/// The container prologue.
///
/// ```text
/// [0x000] Magic "AAMVHFSS"        (8 bytes)
/// [0x008] Opaque                  (272 bytes)
/// [0x118] Magic "AASFSSGN"        (8 bytes)
/// [0x120] csc, oof, chunk_size    (u32 LE each)
/// [0x12C] Five opaque u32
/// [0x140] tree_offset             (i32 LE, first directory chunk)
/// [0x144] n_entr                  (u32 LE, total entry count)
/// [0x148] n_chunks                (u32 LE)
/// [0x14C] Opaque key field        (32 bytes)
/// ```
///
/// Only `chunk_size`, `tree_offset` and `n_entr` drive this library; the
/// opaque fields are preserved verbatim because the write path never
/// rewrites the prologue.
#[derive(Debug, Clone)]
pub struct Header {
    pub unknown: [u8; 272],
    pub csc: u32,
    pub oof: u32,
    pub chunk_size: u32,
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub e: u32,
    /// Chunk index of the first directory-tree chunk.
    pub tree_offset: i32,
    /// Total number of [`FileHeader`] records across the directory chain.
    pub n_entr: u32,
    pub n_chunks: u32,
    pub key: [u8; 32],
}

impl Header {
    /// Parse the 364-byte prologue.
    pub fn parse(data: &[u8; HEADER_LEN]) -> Result<Self> {
        let mut r = Cursor::new(&data[..]);
        magic(&mut r, b"AAMVHFSS", "container magic")?;
        let unknown = bytesa::<272>(&mut r)?;
        magic(&mut r, b"AASFSSGN", "container signature")?;
        let csc = le_u32(&mut r)?;
        let oof = le_u32(&mut r)?;
        let chunk_size = le_u32(&mut r)?;
        let a = le_u32(&mut r)?;
        let b = le_u32(&mut r)?;
        let c = le_u32(&mut r)?;
        let d = le_u32(&mut r)?;
        let e = le_u32(&mut r)?;
        let tree_offset = le_i32(&mut r)?;
        let n_entr = le_u32(&mut r)?;
        let n_chunks = le_u32(&mut r)?;
        let key = bytesa::<32>(&mut r)?;
        Ok(Self {
            unknown,
            csc,
            oof,
            chunk_size,
            a,
            b,
            c,
            d,
            e,
            tree_offset,
            n_entr,
            n_chunks,
            key,
        })
    }
}

/// One chunk of the directory chain.
///
/// A 32-byte header (`next_chunk`, payload checksum, six opaque words)
/// followed by a dense run of [`FileHeader`] records and zero padding.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    /// Next chunk in the chain, `-1` if terminal.
    pub next_chunk: i32,
    /// XOR-of-words checksum over everything after the 32-byte header.
    pub xor: u32,
    pub reserved: [u32; 6],
    /// Entries stored in this chunk, in on-disk order.
    pub files: Vec<FileHeader>,
}

impl DirectoryTree {
    /// Parse one directory chunk.
    ///
    /// `rem_entries` is how many records the chain still owes; at most
    /// that many (and at most what fits) are parsed. An all-zero record
    /// ends the run early, and everything after the parsed records must
    /// be zero.
    pub fn parse(data: &[u8], rem_entries: usize) -> Result<Self> {
        if data.len() < CHUNK_HEADER_LEN || data.len() % 4 != 0 {
            return Err(Error::CorruptContainer("directory chunk size"));
        }
        let mut r = Cursor::new(data);
        let next_chunk = le_i32(&mut r)?;
        let xor = le_u32(&mut r)?;
        let mut reserved = [0u32; 6];
        for w in reserved.iter_mut() {
            *w = le_u32(&mut r)?;
        }

        let payload = &data[CHUNK_HEADER_LEN..];
        if xor32(payload) != xor {
            return Err(Error::CorruptContainer("directory chunk checksum"));
        }

        let capacity = payload.len() / ENTRY_LEN;
        let mut files = Vec::new();
        let mut off = 0;
        for _ in 0..rem_entries.min(capacity) {
            let record = &payload[off..off + ENTRY_LEN];
            if all_zero(record) {
                break;
            }
            files.push(FileHeader::parse(record.try_into().unwrap())?);
            off += ENTRY_LEN;
        }
        expect_zero(&payload[off..], "directory chunk padding")?;

        Ok(Self {
            next_chunk,
            xor,
            reserved,
            files,
        })
    }

    /// Serialize back into a whole chunk, recomputing [`DirectoryTree::xor`]
    /// over the re-encoded entries.
    ///
    /// # Panics
    /// Panics if the entries do not fit the chunk; parsing never yields
    /// more than fit.
    pub fn serialize(&mut self, chunk_size: usize) -> Vec<u8> {
        let mut payload = Vec::with_capacity(chunk_size - CHUNK_HEADER_LEN);
        for file in &self.files {
            payload.extend_from_slice(&file.serialize());
        }
        assert!(
            payload.len() <= chunk_size - CHUNK_HEADER_LEN,
            "directory entries exceed chunk capacity"
        );
        payload.resize(chunk_size - CHUNK_HEADER_LEN, 0);
        self.xor = xor32(&payload);

        let mut out = Vec::with_capacity(chunk_size);
        out.extend_from_slice(&self.next_chunk.to_le_bytes());
        out.extend_from_slice(&self.xor.to_le_bytes());
        for w in self.reserved {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.extend_from_slice(&payload);
        out
    }
}

/// One 512-byte directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// First [`FileChunk`] index; `-1` for entries with no data
    /// (directories).
    pub offset: i32,
    /// Logical payload size in bytes.
    pub size: u64,
    /// Three timestamps in nanoseconds, kept raw to round-trip exactly.
    pub times: [i64; 3],
    pub ftype: u32,
    /// Directory index of the parent entry.
    pub parent: i32,
    /// Always zero in valid containers.
    pub zero: u32,
    /// Encrypted per-file key blob; see [`FileHeader::decrypt_key`].
    pub key: [u8; 32],
    pub unknown: [u8; 140],
    pub etype: u32,
    /// ASCII name, NUL-padded on disk to 288 bytes.
    pub filename: String,
}

impl FileHeader {
    /// Parse one entry record.
    pub fn parse(data: &[u8; ENTRY_LEN]) -> Result<Self> {
        let mut r = Cursor::new(&data[..]);
        let offset = le_i32(&mut r)?;
        let size = le_u64(&mut r)?;
        let times = [le_i64(&mut r)?, le_i64(&mut r)?, le_i64(&mut r)?];
        let ftype = le_u32(&mut r)?;
        let parent = le_i32(&mut r)?;
        let zero = le_u32(&mut r)?;
        if zero != 0 {
            return Err(Error::CorruptContainer("directory entry zero field"));
        }
        let key = bytesa::<32>(&mut r)?;
        let unknown = bytesa::<140>(&mut r)?;
        let etype = le_u32(&mut r)?;
        let name = bytesa::<288>(&mut r)?;
        let filename = padded_ascii(&name, "directory entry name")?;
        Ok(Self {
            offset,
            size,
            times,
            ftype,
            parent,
            zero,
            key,
            unknown,
            etype,
            filename,
        })
    }

    /// Serialize back into a 512-byte record.
    ///
    /// # Panics
    /// Panics if the filename is not ASCII or longer than 288 bytes;
    /// parsed entries always satisfy both.
    pub fn serialize(&self) -> [u8; ENTRY_LEN] {
        assert!(
            self.filename.is_ascii() && self.filename.len() <= 288,
            "entry name must be ASCII and fit 288 bytes"
        );
        let mut out = [0u8; ENTRY_LEN];
        let mut at = 0;
        let mut put = |bytes: &[u8]| {
            out[at..at + bytes.len()].copy_from_slice(bytes);
            at += bytes.len();
        };
        put(&self.offset.to_le_bytes());
        put(&self.size.to_le_bytes());
        for t in self.times {
            put(&t.to_le_bytes());
        }
        put(&self.ftype.to_le_bytes());
        put(&self.parent.to_le_bytes());
        put(&self.zero.to_le_bytes());
        put(&self.key);
        put(&self.unknown);
        put(&self.etype.to_le_bytes());
        put(self.filename.as_bytes());
        out
    }

    /// Recover this file's data key from the container password.
    ///
    /// The password is exploded into a key, that key unwraps the 32-byte
    /// blob stored in this entry, and the unwrapped blob plus a trailing
    /// zero byte is exploded again. The result keys the data chunks.
    pub fn decrypt_key(&self, password: &[u8]) -> Result<[u8; 32]> {
        let cipher = SfsAes::new(&keys::derive_key(password))?;
        let mut blob = self.key;
        chain::decrypt(&cipher, &mut blob);
        let mut seed = [0u8; 33];
        seed[..32].copy_from_slice(&blob);
        Ok(keys::derive_key(&seed))
    }
}

/// A file's index block: the chunk indices holding its data.
///
/// A 32-byte header (`next_chunk` plus seven opaque words) followed by
/// packed `i32` slots. Values `<= 0` are empty slots; the positive
/// subsequence, in order, is the file's data chunk list.
#[derive(Debug, Clone)]
pub struct FileChunk {
    /// Next index block, `-1` if this is the only one.
    pub next_chunk: i32,
    pub reserved: [u32; 7],
    /// Data chunk indices (the positive slots, in on-disk order).
    pub dchunks: Vec<i32>,
}

impl FileChunk {
    /// Parse one index block.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < CHUNK_HEADER_LEN + 4 || data.len() % 4 != 0 {
            return Err(Error::CorruptContainer("index chunk size"));
        }
        let mut r = Cursor::new(data);
        let next_chunk = le_i32(&mut r)?;
        let mut reserved = [0u32; 7];
        for w in reserved.iter_mut() {
            *w = le_u32(&mut r)?;
        }
        let mut dchunks = Vec::new();
        for slot in data[CHUNK_HEADER_LEN..].chunks_exact(4) {
            let idx = i32::from_le_bytes(slot.try_into().unwrap());
            if idx > 0 {
                dchunks.push(idx);
            }
        }
        Ok(Self {
            next_chunk,
            reserved,
            dchunks,
        })
    }

    /// Serialize back into a whole chunk, zeroing every unused slot.
    ///
    /// # Panics
    /// Panics if the slot list does not fit the chunk; parsing never
    /// yields more slots than fit.
    pub fn serialize(&self, chunk_size: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(chunk_size);
        out.extend_from_slice(&self.next_chunk.to_le_bytes());
        for w in self.reserved {
            out.extend_from_slice(&w.to_le_bytes());
        }
        for idx in &self.dchunks {
            out.extend_from_slice(&idx.to_le_bytes());
        }
        assert!(out.len() <= chunk_size, "slot list exceeds chunk capacity");
        out.resize(chunk_size, 0);
        out
    }
}

/// A data-carrying chunk: 32-byte header plus payload.
#[derive(Debug, Clone)]
pub struct FileDataChunk {
    /// `-1` on freshly written chunks; meaning otherwise unknown.
    pub q: i32,
    /// XOR-of-words checksum of the payload.
    pub xor: u32,
    /// Bit `0x100` marks an encrypted payload; base flags observed in the
    /// wild are `6`.
    pub flags: u32,
    pub unknown: [u8; 20],
    /// The raw (possibly encrypted) payload, `chunk_size - 32` bytes.
    pub data: Vec<u8>,
}

/// Flag bit marking an encrypted payload.
pub const FLAG_ENCRYPTED: u32 = 0x100;

/// Base flags of every data chunk this library writes.
pub const FLAG_BASE: u32 = 6;

impl FileDataChunk {
    /// Parse one data chunk, verifying its payload checksum.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() <= CHUNK_HEADER_LEN || data.len() % 4 != 0 {
            return Err(Error::CorruptContainer("data chunk size"));
        }
        let mut r = Cursor::new(data);
        let q = le_i32(&mut r)?;
        let xor = le_u32(&mut r)?;
        let flags = le_u32(&mut r)?;
        let unknown = bytesa::<20>(&mut r)?;
        let payload = data[CHUNK_HEADER_LEN..].to_vec();
        if xor32(&payload) != xor {
            return Err(Error::CorruptContainer("data chunk checksum"));
        }
        Ok(Self {
            q,
            xor,
            flags,
            unknown,
            data: payload,
        })
    }

    /// Whether the payload is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// The plaintext payload: decrypted when the flag says so, the raw
    /// bytes otherwise.
    pub fn plaintext(&self, cipher: &SfsAes) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.is_encrypted() {
            chain::decrypt(cipher, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> FileHeader {
        FileHeader {
            offset: 5,
            size: 1234,
            times: [1_600_000_000_000_000_000, 0, -1],
            ftype: 1,
            parent: -1,
            zero: 0,
            key: [0xAB; 32],
            unknown: [0xCD; 140],
            etype: 2,
            filename: "notes.txt".into(),
        }
    }

    #[test]
    fn entry_roundtrip() {
        let entry = sample_entry();
        let bytes = entry.serialize();
        assert_eq!(FileHeader::parse(&bytes).unwrap(), entry);
    }

    #[test]
    fn entry_rejects_nonzero_zero_field() {
        let mut bytes = sample_entry().serialize();
        bytes[44] = 1;
        assert!(matches!(
            FileHeader::parse(&bytes),
            Err(Error::CorruptContainer("directory entry zero field"))
        ));
    }

    #[test]
    fn directory_chunk_roundtrip() {
        let mut dt = DirectoryTree {
            next_chunk: -1,
            xor: 0,
            reserved: [9, 8, 7, 6, 5, 4],
            files: vec![sample_entry(), sample_entry()],
        };
        let bytes = dt.serialize(4096);
        assert_eq!(bytes.len(), 4096);
        let parsed = DirectoryTree::parse(&bytes, 2).unwrap();
        assert_eq!(parsed.files, dt.files);
        assert_eq!(parsed.xor, dt.xor);
        assert_eq!(parsed.reserved, dt.reserved);
    }

    #[test]
    fn directory_chunk_stops_at_zero_record() {
        let mut dt = DirectoryTree {
            next_chunk: -1,
            xor: 0,
            reserved: [0; 6],
            files: vec![sample_entry()],
        };
        let bytes = dt.serialize(4096);
        // Ask for more entries than stored; the zero record ends the run.
        let parsed = DirectoryTree::parse(&bytes, 7).unwrap();
        assert_eq!(parsed.files.len(), 1);
    }

    #[test]
    fn directory_chunk_checksum_is_verified() {
        let mut dt = DirectoryTree {
            next_chunk: -1,
            xor: 0,
            reserved: [0; 6],
            files: vec![sample_entry()],
        };
        let mut bytes = dt.serialize(4096);
        bytes[100] ^= 1;
        assert!(matches!(
            DirectoryTree::parse(&bytes, 1),
            Err(Error::CorruptContainer("directory chunk checksum"))
        ));
    }

    #[test]
    fn index_chunk_collects_positive_slots() {
        let mut fc = FileChunk {
            next_chunk: -1,
            reserved: [0; 7],
            dchunks: vec![6, 7, 9],
        };
        let bytes = fc.serialize(4096);
        let parsed = FileChunk::parse(&bytes).unwrap();
        assert_eq!(parsed.dchunks, vec![6, 7, 9]);
        assert_eq!(parsed.next_chunk, -1);

        // Negative and zero slots are skipped wherever they appear.
        fc.dchunks = vec![6];
        let mut bytes = fc.serialize(4096);
        bytes[CHUNK_HEADER_LEN + 4..CHUNK_HEADER_LEN + 8]
            .copy_from_slice(&(-1i32).to_le_bytes());
        bytes[CHUNK_HEADER_LEN + 8..CHUNK_HEADER_LEN + 12]
            .copy_from_slice(&8i32.to_le_bytes());
        let parsed = FileChunk::parse(&bytes).unwrap();
        assert_eq!(parsed.dchunks, vec![6, 8]);
    }

    #[test]
    fn data_chunk_checksum_is_verified() {
        let payload = vec![3u8; 4096 - CHUNK_HEADER_LEN];
        let mut chunk = Vec::new();
        chunk.extend_from_slice(&(-1i32).to_le_bytes());
        chunk.extend_from_slice(&xor32(&payload).to_le_bytes());
        chunk.extend_from_slice(&FLAG_BASE.to_le_bytes());
        chunk.extend_from_slice(&[0; 20]);
        chunk.extend_from_slice(&payload);

        let parsed = FileDataChunk::parse(&chunk).unwrap();
        assert!(!parsed.is_encrypted());
        assert_eq!(parsed.data, payload);

        chunk[CHUNK_HEADER_LEN] ^= 0xFF;
        assert!(matches!(
            FileDataChunk::parse(&chunk),
            Err(Error::CorruptContainer("data chunk checksum"))
        ));
    }
}
