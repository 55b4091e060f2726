//! The `"AACS"` deflate envelope.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "AACS"                       (4 bytes)
//! [0x04] Five u32 LE: 0x80000, 0, 1,
//!        0x40000000, compression_level      (20 bytes)
//! [0x18] Zero padding                       (0x68 bytes)
//! [0x80] avail_in  - compressed size        (u32 LE)
//! [0x84] inflated_size - uncompressed size  (u32 LE)
//! [0x88] crc - CRC-16/ARC of inflated data  (u32 LE)
//! [0x8C] p3 - must equal avail_in + 16      (u32 LE)
//! [0x90] zlib deflate stream                (avail_in bytes)
//! [....] Zero padding to the caller's buffer end
//! ```
//!
//! Compression levels 1 and 2 are inflated on read; level 0 is stored
//! uncompressed. Only level 1 is produced on write.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::checksum::crc16;
use crate::utils::expect_zero;
use crate::{Error, Result};

/// Envelope magic at the start of a wrapped payload.
pub const MAGIC: &[u8; 4] = b"AACS";

/// Total header size; the deflate stream starts here.
const HEADER_LEN: usize = 0x90;

fn le32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes(data[off..off + 4].try_into().unwrap())
}

/// Unwrap an `"AACS"` envelope, returning the inflated payload.
///
/// `data` is the whole reassembled file payload; bytes after the deflate
/// stream must be zero (they are chunk padding).
pub fn unwrap(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_LEN {
        return Err(Error::CorruptContainer("AACS envelope too short"));
    }
    if &data[..4] != MAGIC {
        return Err(Error::UnsupportedFormat("AACS magic"));
    }
    let level = le32(data, 0x14);
    let avail_in = le32(data, 0x80) as usize;
    let inflated_size = le32(data, 0x84) as usize;
    let crc = le32(data, 0x88);
    let p3 = le32(data, 0x8C);

    if inflated_size == 0 {
        return Ok(Vec::new());
    }
    if p3 as u64 != avail_in as u64 + 16 {
        return Err(Error::CorruptContainer("AACS size fields disagree"));
    }
    let end = HEADER_LEN
        .checked_add(avail_in)
        .filter(|&e| e <= data.len())
        .ok_or(Error::CorruptContainer("AACS deflate stream truncated"))?;
    let deflated = &data[HEADER_LEN..end];
    expect_zero(&data[end..], "AACS trailing bytes")?;

    let inflated = match level {
        0 => deflated.to_vec(),
        1 | 2 => {
            let mut out = Vec::with_capacity(inflated_size);
            ZlibDecoder::new(deflated)
                .read_to_end(&mut out)
                .map_err(|_| Error::CorruptContainer("AACS deflate stream"))?;
            out
        }
        _ => return Err(Error::UnsupportedFormat("AACS compression level")),
    };

    if inflated.len() != inflated_size {
        return Err(Error::CorruptContainer("AACS inflated size"));
    }
    if crc != crc16(&inflated, 0) as u32 {
        return Err(Error::CorruptContainer("AACS payload CRC"));
    }
    Ok(inflated)
}

/// Wrap `data` in an `"AACS"` envelope.
///
/// Only level 1 can be produced; any other level returns
/// [`Error::NotImplemented`].
pub fn wrap(data: &[u8], level: u32) -> Result<Vec<u8>> {
    if level != 1 {
        return Err(Error::NotImplemented("compression level"));
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    let deflated = encoder.finish()?;

    let mut out = Vec::with_capacity(HEADER_LEN + deflated.len());
    out.extend_from_slice(MAGIC);
    for v in [0x80000u32, 0, 1, 0x40000000, level] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.resize(0x80, 0);
    for v in [
        deflated.len() as u32,
        data.len() as u32,
        crc16(data, 0) as u32,
        deflated.len() as u32 + 16,
    ] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&deflated);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(40);
        let wrapped = wrap(&data, 1).unwrap();
        assert_eq!(&wrapped[..4], MAGIC);
        assert_eq!(unwrap(&wrapped).unwrap(), data);
    }

    #[test]
    fn unwrap_tolerates_chunk_padding() {
        let data = vec![7u8; 300];
        let mut wrapped = wrap(&data, 1).unwrap();
        wrapped.resize(wrapped.len() + 512, 0);
        assert_eq!(unwrap(&wrapped).unwrap(), data);
    }

    #[test]
    fn nonzero_trailing_bytes_are_rejected() {
        let mut wrapped = wrap(b"payload", 1).unwrap();
        wrapped.push(1);
        assert!(matches!(
            unwrap(&wrapped),
            Err(Error::CorruptContainer("AACS trailing bytes"))
        ));
    }

    #[test]
    fn level_zero_is_identity() {
        let data = b"stored uncompressed";
        let mut env = Vec::new();
        env.extend_from_slice(MAGIC);
        for v in [0x80000u32, 0, 1, 0x40000000, 0] {
            env.extend_from_slice(&v.to_le_bytes());
        }
        env.resize(0x80, 0);
        for v in [
            data.len() as u32,
            data.len() as u32,
            crc16(data, 0) as u32,
            data.len() as u32 + 16,
        ] {
            env.extend_from_slice(&v.to_le_bytes());
        }
        env.extend_from_slice(data);
        assert_eq!(unwrap(&env).unwrap(), data);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut wrapped = wrap(b"x", 1).unwrap();
        wrapped[0x14] = 9;
        assert!(matches!(
            unwrap(&wrapped),
            Err(Error::UnsupportedFormat("AACS compression level"))
        ));
    }

    #[test]
    fn crc_mismatch_is_rejected() {
        let mut wrapped = wrap(b"checksummed", 1).unwrap();
        wrapped[0x88] ^= 0xFF;
        assert!(matches!(
            unwrap(&wrapped),
            Err(Error::CorruptContainer("AACS payload CRC"))
        ));
    }

    #[test]
    fn empty_payload_short_circuits() {
        let wrapped = wrap(&[], 1).unwrap();
        assert_eq!(unwrap(&wrapped).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn only_level_one_wraps() {
        assert!(matches!(wrap(b"x", 0), Err(Error::NotImplemented(_))));
        assert!(matches!(wrap(b"x", 2), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut wrapped = wrap(b"x", 1).unwrap();
        wrapped[0] = b'B';
        assert!(matches!(
            unwrap(&wrapped),
            Err(Error::UnsupportedFormat("AACS magic"))
        ));
    }
}
