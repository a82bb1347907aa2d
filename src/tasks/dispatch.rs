//! Print worker — consumes trigger signals and renders one rumor per signal.
//!
//! The worker parks on the trigger queue (the one unbounded wait in the
//! system), selects an eligible rumor, and drives the printer. Selection
//! charges the rumor's quota and persists *before* rendering starts: a
//! printer fault after that point consumes the print without producing
//! paper. That asymmetry is deliberate — the printer is fire-and-forget and
//! has no feedback channel to roll anything back through.

use log::{info, warn};

use crate::app::RumorRegistry;
use crate::app::ports::{PrinterPort, SnapshotStore};
use crate::app::rumor::Rumor;

use super::channels::TriggerQueue;

/// Trailing feed after a rumor slip, so it can be torn off cleanly.
const RUMOR_TRAILER_FEED: u8 = 10;

/// Trailing feed after the fallback slip.
const FALLBACK_TRAILER_FEED: u8 = 6;

/// Service one trigger: select, then render the rumor or the fallback slip.
pub fn service_trigger<S: SnapshotStore>(
    registry: &RumorRegistry<S>,
    printer: &mut impl PrinterPort,
) {
    match registry.select_eligible() {
        Ok(Some(rumor)) => {
            info!(
                "dispatch: printing rumor id={} title={:?} ({}/{})",
                rumor.id, rumor.title, rumor.printed_count, rumor.max_prints
            );
            render_rumor(printer, &rumor);
        }
        Ok(None) => {
            info!("dispatch: no eligible rumors");
            render_fallback(printer);
        }
        Err(e) => {
            warn!("dispatch: selection failed ({e})");
            render_fallback(printer);
        }
    }
}

/// Both language payloads in bold, then trailer feed and a head rest.
pub fn render_rumor(printer: &mut impl PrinterPort, rumor: &Rumor) {
    printer.bold_on();
    printer.feed(2);
    printer.write_line(&rumor.text_nl);
    printer.write_line(&rumor.text_en);
    printer.feed(RUMOR_TRAILER_FEED);
    printer.rest();
}

/// Fixed slip for when nothing qualifies.
pub fn render_fallback(printer: &mut impl PrinterPort) {
    printer.bold_on();
    printer.feed(2);
    printer.write_line("No active rumors");
    printer.write_line("or max prints reached");
    printer.feed(FALLBACK_TRAILER_FEED);
    printer.rest();
}

/// Banner slip printed once at boot, telling the user where to connect.
pub fn render_startup_slip(printer: &mut impl PrinterPort, ssid: &str, ip: &str) {
    printer.bold_on();
    printer.feed(2);
    printer.write_line("Rumour Mill");
    printer.write_line("Connect to:");
    printer.write_line(ssid);
    printer.write_line("Open:");
    printer.write_line(ip);
    printer.feed(4);
    printer.rest();
}

/// Perpetual worker loop. Blocks on the queue; one service cycle per signal.
pub async fn run<S: SnapshotStore>(
    registry: &RumorRegistry<S>,
    printer: &mut impl PrinterPort,
    queue: &'static TriggerQueue,
) {
    info!("dispatch: waiting for triggers");
    loop {
        let _signal = queue.receive().await;
        info!("dispatch: trigger received");
        service_trigger(registry, printer);
    }
}
