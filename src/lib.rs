//! **sfskit** - a Rust library for reading and rewriting SFS chunked file
//! containers.
//!
//! An SFS container stores a directory tree of named files inside a single
//! host file, carved into fixed 4096-byte chunks. File payloads may be
//! deflate-compressed (the `"AACS"` envelope) and encrypted with a
//! password-derived key using the format's own AES-256 variant in a chained
//! block mode. Every payload chunk carries a 32-bit XOR checksum.
//!
//! # Modules
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`device`]      | Fixed-size chunk I/O over a seekable backing store |
//! | [`checksum`]    | XOR-of-u32 chunk checksum; CRC-16/ARC |
//! | [`crypto`]      | AES core, the vendor key schedule, chained mode, key derivation |
//! | [`compression`] | `"AACS"` deflate envelope |
//! | [`structs`]     | Fixed-layout codecs for the on-disk records |
//! | [`container`]   | [`container::SfsContainer`] - the public entry point |
//!
//! # Example
//! ```no_run
//! use std::fs::OpenOptions;
//! use sfskit::container::SfsContainer;
//!
//! # fn main() -> sfskit::Result<()> {
//! let file = OpenOptions::new().read(true).open("label.stc")?;
//! let password: &[u8] = b"password";
//! let mut sfs = SfsContainer::open(file)?;
//! for entry in sfs.files()? {
//!     let data = sfs.read_file(&entry, Some(password))?;
//!     println!("{}: {} bytes", entry.filename, data.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod compression;
pub mod container;
pub mod crypto;
pub mod device;
pub mod error;
pub mod structs;
pub mod utils;

pub use error::{Error, Result};
