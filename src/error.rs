//! Library-wide error and result types.

use std::fmt;
use std::io;

/// Result alias used throughout sfskit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type. Every failure is
/// fail-fast - the library never retries or repairs a container.
#[derive(Debug)]
pub enum Error {
    /// A magic field, the chunk size, or a compression level is not one
    /// this library understands (message names the offending field).
    UnsupportedFormat(&'static str),
    /// A chunk index was zero, negative, or past the end of the store.
    InvalidChunk(i32),
    /// A buffer had the wrong length for a whole-chunk write.
    SizeMismatch { expected: usize, got: usize },
    /// A structural check failed: checksum mismatch, duplicate chunk
    /// reference, non-zero padding, or a bad CRC on decompressed data.
    CorruptContainer(&'static str),
    /// Decryption produced a payload that does not parse. The format has
    /// no MAC, so a wrong password surfaces this way.
    AuthenticationMismatch,
    /// A replacement payload needs more data chunks than the file's index
    /// currently holds; the format core has no chunk allocator.
    GrowthNotSupported { needed: usize, available: usize },
    /// The container uses a feature the write path does not support
    /// (message describes which one).
    NotImplemented(&'static str),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFormat(s) => write!(f, "unsupported format: {s}"),
            Error::InvalidChunk(c) => write!(f, "invalid chunk index {c}"),
            Error::SizeMismatch { expected, got } => {
                write!(f, "buffer has size {got}, expected {expected}")
            }
            Error::CorruptContainer(s) => write!(f, "corrupt container: {s}"),
            Error::AuthenticationMismatch => write!(f, "decrypted data is not recognizable"),
            Error::GrowthNotSupported { needed, available } => {
                write!(f, "payload needs {needed} chunks, file has {available}")
            }
            Error::NotImplemented(s) => write!(f, "not implemented: {s}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
