//! Port traits — the hexagonal boundary between domain logic and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RumorRegistry / task loops (domain)
//! ```
//!
//! Driven adapters (snapshot storage, printer, reed input, NVS config)
//! implement these traits. The domain core consumes them via generics, so it
//! never touches hardware directly and every rule is testable with mocks.

use crate::config::SystemConfig;
use crate::error::StorageError;

use super::rumor::Rumor;

// ───────────────────────────────────────────────────────────────
// Snapshot store port (domain ↔ durable storage)
// ───────────────────────────────────────────────────────────────

/// Whole-document persistence for the rumor collection.
///
/// `save` overwrites the previous document; there is no incremental format.
/// Implementations must make one `save` call atomic at document granularity —
/// a reader never observes half of two snapshots.
pub trait SnapshotStore {
    /// Write the entire collection as one document.
    fn save(&self, rumors: &[Rumor]) -> Result<(), StorageError>;

    /// Read and decode the document. Missing optional fields default rather
    /// than fail; a missing document on first boot yields an empty
    /// collection after creating one.
    fn load(&self) -> Result<Vec<Rumor>, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Printer port (domain → thermal printer)
// ───────────────────────────────────────────────────────────────

/// Opaque render capability. Fire-and-forget: nothing is read back from the
/// device, and no call can fail from the domain's point of view.
pub trait PrinterPort {
    /// Switch to bold type for subsequent lines.
    fn bold_on(&mut self);

    /// Print one line of text.
    fn write_line(&mut self, line: &str);

    /// Advance the paper by `lines` blank lines.
    fn feed(&mut self, lines: u8);

    /// Put the print head to sleep and wake it again — conserves power
    /// between jobs on the QR204.
    fn rest(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Reed input port (hardware → trigger loop)
// ───────────────────────────────────────────────────────────────

/// One binary sample of the reed sensor.
pub trait ReedPort {
    /// `true` while the magnet holds the circuit closed (door shut pulls the
    /// pull-up line low on this board's wiring; adapters normalise polarity).
    fn is_active(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
