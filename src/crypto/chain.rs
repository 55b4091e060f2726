//! The chained block mode used for file data and key blobs.
//!
//! Superficially CBC, with two twists that must be reproduced exactly:
//!
//! * The IV is not stored anywhere; it is the encryption of `FF..FF`
//!   under the current key, recomputed at the start of every run (each
//!   data chunk restarts the chain).
//! * The IV for block `i+1` is `C_i XOR iv_i` - a running XOR of all
//!   ciphertexts - rather than `C_i` itself.
//!
//! Both functions work in place on whole 16-byte blocks; the container
//! only ever feeds them 32-byte key blobs and `chunk_size - 32` payloads,
//! which are multiples of 16.

use crate::crypto::aes::SfsAes;

/// Encrypt `data` in place.
///
/// # Panics
/// Panics if `data.len()` is not a multiple of 16.
pub fn encrypt(cipher: &SfsAes, data: &mut [u8]) {
    assert!(data.len() % 16 == 0, "chain input must be block-aligned");
    let mut iv = cipher.encrypt_block(&[0xFF; 16]);
    for block in data.chunks_exact_mut(16) {
        let mut p: [u8; 16] = block.try_into().unwrap();
        for (b, v) in p.iter_mut().zip(iv) {
            *b ^= v;
        }
        let c = cipher.encrypt_block(&p);
        for (v, b) in iv.iter_mut().zip(c) {
            *v ^= b;
        }
        block.copy_from_slice(&c);
    }
}

/// Decrypt `data` in place.
///
/// # Panics
/// Panics if `data.len()` is not a multiple of 16.
pub fn decrypt(cipher: &SfsAes, data: &mut [u8]) {
    assert!(data.len() % 16 == 0, "chain input must be block-aligned");
    let mut iv = cipher.encrypt_block(&[0xFF; 16]);
    for block in data.chunks_exact_mut(16) {
        let c: [u8; 16] = block.try_into().unwrap();
        let mut next_iv = iv;
        for (v, b) in next_iv.iter_mut().zip(c) {
            *v ^= b;
        }
        let mut p = cipher.decrypt_block(&c);
        for (b, v) in p.iter_mut().zip(iv) {
            *b ^= v;
        }
        block.copy_from_slice(&p);
        iv = next_iv;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::derive_key;

    fn cipher() -> SfsAes {
        SfsAes::new(&derive_key(b"45654hKL5-GFD1326lvmaQQ")).unwrap()
    }

    #[test]
    fn roundtrip() {
        let cipher = cipher();
        let plain: Vec<u8> = (0u8..=255).chain(0u8..=255).take(256).collect();
        let mut data = plain.clone();
        encrypt(&cipher, &mut data);
        assert_ne!(data, plain);
        decrypt(&cipher, &mut data);
        assert_eq!(data, plain);
    }

    #[test]
    fn identical_blocks_chain_differently() {
        let cipher = cipher();
        let mut data = [0x5A; 48];
        encrypt(&cipher, &mut data);
        assert_ne!(data[0..16], data[16..32]);
        assert_ne!(data[16..32], data[32..48]);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let cipher = cipher();
        let mut data = [0u8; 0];
        encrypt(&cipher, &mut data);
        decrypt(&cipher, &mut data);
    }

    #[test]
    fn each_run_restarts_the_chain() {
        let cipher = cipher();
        let mut a = [0x11; 16];
        let mut b = [0x11; 16];
        encrypt(&cipher, &mut a);
        encrypt(&cipher, &mut b);
        assert_eq!(a, b);
    }
}
