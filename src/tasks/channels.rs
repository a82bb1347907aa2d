//! Inter-task trigger channel.
//!
//! One bounded `embassy-sync` channel decouples the reed poll loop from the
//! print worker. The producer never blocks (`try_send`, drop on full); the
//! consumer parks on `receive().await` for the life of the process.
//!
//! ```text
//! ┌──────────────┐  TriggerSignal  ┌────────────────┐
//! │  Reed poll   │────────────────▶│  Print worker  │
//! │  (50ms tick) │   cap 4, drop   │  (blocking)    │
//! └──────────────┘                 └────────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// One debounced reed edge requesting one print cycle. Carries no payload —
/// the worker selects the rumor itself at service time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSignal;

/// Queue depth. Small on purpose: if the worker is still busy printing,
/// a backlog of stale door-open events is worthless.
pub const TRIGGER_QUEUE_DEPTH: usize = 4;

pub type TriggerQueue = Channel<CriticalSectionRawMutex, TriggerSignal, TRIGGER_QUEUE_DEPTH>;

/// The trigger queue shared by the poll loop and the print worker.
pub static TRIGGER_QUEUE: TriggerQueue = Channel::new();
