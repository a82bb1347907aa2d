//! Reed sensor edge gate: falling-edge detection with a time-domain cooldown.
//!
//! The poll loop feeds raw samples in at a fixed cadence; the gate reports an
//! edge when the input transitions inactive → active AND the cooldown since
//! the last *accepted* trigger has elapsed. Debounce lives purely in the time
//! domain (the cooldown dwarfs any contact bounce) rather than in
//! consecutive-sample filtering.
//!
//! Acceptance is split from detection: the caller marks the gate only after
//! the signal actually landed in the trigger queue, so a dropped signal does
//! not burn the cooldown window.

/// Edge/cooldown state for one reed input. All timestamps are monotonic
/// milliseconds; arithmetic wraps, so u32 rollover (~49 days) is harmless.
pub struct ReedGate {
    cooldown_ms: u32,
    last_active: bool,
    /// `None` until the first accepted trigger — the first edge after boot
    /// fires immediately.
    last_accept_ms: Option<u32>,
}

impl ReedGate {
    /// `initial_active` is the level sampled at startup, so a door already
    /// open at boot does not register as an edge.
    pub fn new(cooldown_ms: u32, initial_active: bool) -> Self {
        Self {
            cooldown_ms,
            last_active: initial_active,
            last_accept_ms: None,
        }
    }

    /// Feed one sample. Returns `true` when this sample is a firing edge:
    /// a fresh inactive → active transition outside the cooldown window.
    pub fn sample(&mut self, active: bool, now_ms: u32) -> bool {
        let edge = active && !self.last_active;
        self.last_active = active;
        if !edge {
            return false;
        }
        match self.last_accept_ms {
            None => true,
            Some(at) => now_ms.wrapping_sub(at) >= self.cooldown_ms,
        }
    }

    /// Record a trigger as accepted. Call only after the signal was
    /// successfully enqueued.
    pub fn mark_accepted(&mut self, now_ms: u32) {
        self.last_accept_ms = Some(now_ms);
    }
}
