//! Compression envelope handling.
//!
//! File payloads inside an SFS container are optionally wrapped in the
//! `"AACS"` envelope - a fixed 144-byte header followed by a zlib deflate
//! stream - before being chunked (and, when a password is set, encrypted).
//! The envelope is self-describing: the read path detects it by magic on
//! the reassembled payload and unwraps transparently.
//!
//! See [`aacs`] for the wire layout.

pub mod aacs;
