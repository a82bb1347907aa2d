//! Unified error types for the rumor mill firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! web façade's status mapping and the dispatch worker's handling uniform.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible registry or façade operation funnels into this type.
///
/// `Busy` is deliberately distinct from `NotFound`/`InvalidInput`: it is the
/// one retryable condition, and callers decide whether to retry. The core
/// never retries a lock acquisition on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The referenced rumor id does not exist.
    NotFound,
    /// The registry lock could not be acquired within the bounded wait.
    Busy,
    /// Required fields missing on creation, or malformed encoded input.
    InvalidInput(&'static str),
    /// Durable storage could not be read or initialised.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Busy => write!(f, "busy"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The storage backend could not be mounted or initialised.
    Unavailable,
    /// The snapshot document could not be read or written.
    Io,
    /// The snapshot document exists but could not be decoded.
    Corrupted,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Io => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "snapshot corrupted"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
