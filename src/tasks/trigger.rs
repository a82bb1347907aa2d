//! Reed poll task — the trigger source.
//!
//! A single perpetual loop samples the reed input at a fixed cadence via a
//! reactor timer (wake-based, no busy spin), runs the edge/cooldown gate,
//! and hands accepted edges to the trigger queue with a non-blocking send.
//! The cooldown is marked only when the send lands; a full queue drops the
//! edge without burning the window.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::app::ports::ReedPort;
use crate::drivers::reed::ReedGate;

use super::channels::{TriggerQueue, TriggerSignal};

/// One poll iteration: sample, gate, enqueue. Split from the loop so the
/// full accept/drop behavior can be driven step by step.
pub fn poll_once(
    gate: &mut ReedGate,
    reed: &mut impl ReedPort,
    queue: &TriggerQueue,
    now_ms: u32,
) {
    let active = reed.is_active();
    if !gate.sample(active, now_ms) {
        return;
    }
    match queue.try_send(TriggerSignal) {
        Ok(()) => {
            gate.mark_accepted(now_ms);
            info!("trigger: edge accepted, signal queued");
        }
        Err(_) => warn!("trigger: queue full, edge dropped"),
    }
}

/// Perpetual poll loop. Never returns; runs for the process lifetime on its
/// own thread.
pub async fn run(
    mut reed: impl ReedPort,
    queue: &'static TriggerQueue,
    poll_ms: u32,
    cooldown_ms: u32,
) {
    let started = Instant::now();
    let mut gate = ReedGate::new(cooldown_ms, reed.is_active());
    info!("trigger: polling every {poll_ms}ms, cooldown {cooldown_ms}ms");

    loop {
        async_io_mini::Timer::after(Duration::from_millis(u64::from(poll_ms))).await;
        let now_ms = started.elapsed().as_millis() as u32;
        poll_once(&mut gate, &mut reed, queue, now_ms);
    }
}

/// Spawn the poll loop on its own thread.
pub fn spawn(
    reed: impl ReedPort + Send + 'static,
    queue: &'static TriggerQueue,
    poll_ms: u32,
    cooldown_ms: u32,
) -> std::thread::JoinHandle<()> {
    super::spawn_task("reed-poll\0", 4, move || {
        futures_lite::future::block_on(run(reed, queue, poll_ms, cooldown_ms));
    })
}
