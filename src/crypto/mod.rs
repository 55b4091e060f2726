//! Cryptographic primitives of the SFS container format.
//!
//! Nothing here is sound cryptography by modern standards; the point is to
//! reproduce the format's behavior bit-exactly so existing containers stay
//! readable and rewritten ones stay openable by the original tooling.
//!
//! * [`aes`] - a table-driven AES block cipher plus [`aes::SfsAes`], the
//!   variant whose 256-bit key schedule deviates from the standard.
//! * [`keys`] - password to 32-byte key derivation: an MD-style length pad
//!   followed by a single RIPEMD-256 compression over a fixed IV.
//! * [`chain`] - the chained block mode used for directory-entry keys and
//!   file data, where the IV stream is a running XOR of ciphertexts.
//!
//! A per-file data key is recovered in two derivation passes: the password
//! is exploded into a key, that key unwraps the 32-byte blob stored in the
//! file's directory entry, and the unwrapped blob (plus a trailing zero
//! byte) is exploded again. See
//! [`structs::FileHeader::decrypt_key`](crate::structs::FileHeader::decrypt_key).

pub mod aes;
pub mod chain;
pub mod keys;
