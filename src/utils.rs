//! Low-level parsing primitives shared by the struct codecs.
//!
//! All on-disk integers in an SFS container are little-endian. Each function
//! reads exactly the bytes it promises or returns an error - there is no
//! partial-read ambiguity.

use std::io::Read;

use crate::{Error, Result};

/// Read a little-endian `u32`.
#[inline]
pub(crate) fn le_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

/// Read a little-endian `i32`.
#[inline]
pub(crate) fn le_i32<R: Read>(r: &mut R) -> Result<i32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(i32::from_le_bytes(b))
}

/// Read a little-endian `u64`.
#[inline]
pub(crate) fn le_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b)?;
    Ok(u64::from_le_bytes(b))
}

/// Read a little-endian `i64`.
#[inline]
pub(crate) fn le_i64<R: Read>(r: &mut R) -> Result<i64> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b)?;
    Ok(i64::from_le_bytes(b))
}

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Verify that the next `N` bytes in the stream match `expected`.
///
/// Returns [`Error::UnsupportedFormat`] naming `what` on mismatch.
#[inline]
pub(crate) fn magic<R: Read, const N: usize>(
    r: &mut R,
    expected: &[u8; N],
    what: &'static str,
) -> Result<()> {
    let got = bytesa::<N>(r)?;
    if &got != expected {
        return Err(Error::UnsupportedFormat(what));
    }
    Ok(())
}

/// `true` if every byte of `buf` is zero.
#[inline]
pub(crate) fn all_zero(buf: &[u8]) -> bool {
    buf.iter().all(|&b| b == 0)
}

/// Require every byte of `buf` to be zero.
///
/// Returns [`Error::CorruptContainer`] naming `what` otherwise.
#[inline]
pub(crate) fn expect_zero(buf: &[u8], what: &'static str) -> Result<()> {
    if all_zero(buf) {
        Ok(())
    } else {
        Err(Error::CorruptContainer(what))
    }
}

/// Decode a NUL-padded ASCII name field.
///
/// Trailing NUL bytes are stripped; any non-ASCII byte before the padding
/// makes the record invalid.
pub(crate) fn padded_ascii(buf: &[u8], what: &'static str) -> Result<String> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(buf.len());
    if !buf[..end].is_ascii() || !all_zero(&buf[end..]) {
        return Err(Error::CorruptContainer(what));
    }
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}
