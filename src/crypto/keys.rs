//! Password to key derivation.
//!
//! A container password never keys the cipher directly. It is padded into a
//! single 512-bit block ([`length_pad`]) and run through one RIPEMD-256
//! compression over the reference initial state; the eight output words,
//! serialized little-endian, are the 32-byte key ([`derive_key`]).
//!
//! This is *not* RIPEMD-256 the hash function - there is no streaming, no
//! multi-block input, and the length pad deviates from the MD convention
//! (the bit length lands at byte `0x38` as a 16-bit field). It is a fixed
//! one-shot mixing primitive and is implemented as one.
//!
//! The same primitive runs twice per encrypted file: once over the
//! password to unwrap the key blob in the directory entry, and once over
//! the unwrapped blob plus a trailing zero byte to produce the data key.

/// The RIPEMD-256 initial state, as eight little-endian words.
const INIT: [u32; 8] = [
    0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476,
    0x76543210, 0xFEDCBA98, 0x89ABCDEF, 0x01234567,
];

/// Left-line round constants, one per group of 16 steps.
const K: [u32; 4] = [0x00000000, 0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC];

/// Right-line round constants.
const KP: [u32; 4] = [0x50A28BE6, 0x5C4DD124, 0x6D703EF3, 0x00000000];

/// Left-line message word selection.
const R: [usize; 64] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
    7, 4, 13, 1, 10, 6, 15, 3, 12, 0, 9, 5, 2, 14, 11, 8,
    3, 10, 14, 4, 9, 15, 8, 1, 2, 7, 0, 6, 13, 11, 5, 12,
    1, 9, 11, 10, 0, 8, 12, 4, 13, 3, 7, 15, 14, 5, 6, 2,
];

/// Right-line message word selection.
const RP: [usize; 64] = [
    5, 14, 7, 0, 9, 2, 11, 4, 13, 6, 15, 8, 1, 10, 3, 12,
    6, 11, 3, 7, 0, 13, 5, 10, 14, 15, 8, 12, 4, 9, 1, 2,
    15, 5, 1, 3, 7, 14, 6, 9, 11, 8, 12, 2, 10, 0, 4, 13,
    8, 6, 4, 1, 3, 11, 15, 0, 5, 12, 2, 13, 9, 7, 10, 14,
];

/// Left-line per-step rotation amounts.
const J: [u32; 64] = [
    11, 14, 15, 12, 5, 8, 7, 9, 11, 13, 14, 15, 6, 7, 9, 8,
    7, 6, 8, 13, 11, 9, 7, 15, 7, 12, 15, 9, 11, 7, 13, 12,
    11, 13, 6, 7, 14, 9, 13, 15, 14, 8, 13, 6, 5, 12, 7, 5,
    11, 12, 14, 15, 14, 15, 9, 8, 9, 14, 5, 6, 8, 6, 5, 12,
];

/// Right-line per-step rotation amounts.
const JP: [u32; 64] = [
    8, 9, 9, 11, 13, 15, 15, 5, 7, 7, 8, 11, 14, 14, 12, 6,
    9, 13, 15, 7, 12, 8, 9, 11, 7, 7, 12, 7, 6, 15, 13, 11,
    9, 7, 15, 11, 8, 6, 6, 14, 12, 13, 5, 14, 13, 13, 7, 5,
    15, 5, 8, 11, 14, 14, 6, 14, 6, 9, 12, 9, 12, 5, 15, 8,
];

/// The four RIPEMD round functions.
fn f(group: usize, x: u32, y: u32, z: u32) -> u32 {
    match group {
        0 => x ^ y ^ z,
        1 => (x & y) | (!x & z),
        2 => (x | !y) ^ z,
        _ => (x & z) | (y & !z),
    }
}

/// Pad `msg` into the single 512-bit block the derivation hashes.
///
/// The message is truncated or zero-padded to 64 bytes, a `0x80` marker is
/// written at `msg.len()` (when it fits), and the bit length is stored as
/// a little-endian `u16` at offset `0x38`. Messages of 64 bytes or more
/// keep no marker - only the truncated bytes and the length field.
pub fn length_pad(msg: &[u8]) -> [u8; 64] {
    let mut block = [0u8; 64];
    let n = msg.len().min(64);
    block[..n].copy_from_slice(&msg[..n]);
    if msg.len() < 64 {
        block[msg.len()] = 0x80;
    }
    block[0x38..0x3A].copy_from_slice(&((msg.len() * 8) as u16).to_le_bytes());
    block
}

/// One RIPEMD-256 compression of `block` into `state`.
///
/// Two lines of four registers run 64 steps each, swapping one register
/// pair after every 16 steps; the post-round registers are added into the
/// state modulo 2^32.
fn ripemd256_compress(state: &mut [u32; 8], block: &[u8; 64]) {
    let mut q = [0u32; 16];
    for (i, w) in q.iter_mut().enumerate() {
        *w = u32::from_le_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
    }

    let [mut a, mut b, mut c, mut d, mut ap, mut bp, mut cp, mut dp] = *state;
    for i in 0..64 {
        let g = i / 16;
        let t = a
            .wrapping_add(q[R[i]])
            .wrapping_add(K[g])
            .wrapping_add(f(g, b, c, d))
            .rotate_left(J[i]);
        let tp = ap
            .wrapping_add(q[RP[i]])
            .wrapping_add(KP[g])
            .wrapping_add(f((63 - i) / 16, bp, cp, dp))
            .rotate_left(JP[i]);
        (a, b, c, d) = (d, t, b, c);
        (ap, bp, cp, dp) = (dp, tp, bp, cp);
        match i {
            15 => (a, ap) = (ap, a),
            31 => (b, bp) = (bp, b),
            47 => (c, cp) = (cp, c),
            63 => (d, dp) = (dp, d),
            _ => {}
        }
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, ap, bp, cp, dp]) {
        *s = s.wrapping_add(v);
    }
}

/// Derive a 32-byte cipher key from an arbitrary byte string.
///
/// Deterministic; depends only on `input`.
pub fn derive_key(input: &[u8]) -> [u8; 32] {
    let mut state = INIT;
    ripemd256_compress(&mut state, &length_pad(input));
    let mut out = [0u8; 32];
    for (chunk, w) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}
