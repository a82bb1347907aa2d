//! Dispatch worker rendering: one service cycle per trigger, fallback when
//! nothing qualifies, and the count-before-paper asymmetry.

use std::time::Duration;

use rumormill::app::RumorRegistry;
use rumormill::tasks::dispatch::{render_startup_slip, service_trigger};
use rumormill::tasks::{TriggerQueue, TriggerSignal};

use crate::mock_hw::{MemStore, MockPrinter, PrinterCall, draft};

const TIMEOUT: Duration = Duration::from_millis(200);

fn registry() -> RumorRegistry<MemStore> {
    RumorRegistry::new(MemStore::new(), Vec::new(), TIMEOUT, 5)
}

#[test]
fn eligible_rumor_prints_both_payloads_and_rests() {
    let reg = registry();
    reg.create(draft("A", true, None)).unwrap();
    let mut printer = MockPrinter::new();

    service_trigger(&reg, &mut printer);

    assert_eq!(printer.lines(), vec!["A (nl)", "A (en)"]);
    assert_eq!(printer.calls[0], PrinterCall::BoldOn);
    assert!(printer.rested());
}

#[test]
fn empty_registry_prints_the_fallback_slip() {
    let reg = registry();
    let mut printer = MockPrinter::new();

    service_trigger(&reg, &mut printer);

    assert_eq!(
        printer.lines(),
        vec!["No active rumors", "or max prints reached"]
    );
    assert!(printer.rested());
}

#[test]
fn quota_exhaustion_switches_to_the_fallback_slip() {
    let reg = registry();
    reg.create(draft("A", true, Some(1))).unwrap();
    let mut printer = MockPrinter::new();

    service_trigger(&reg, &mut printer);
    assert_eq!(printer.lines(), vec!["A (nl)", "A (en)"]);

    printer.clear();
    service_trigger(&reg, &mut printer);
    assert_eq!(
        printer.lines(),
        vec!["No active rumors", "or max prints reached"]
    );
}

#[test]
fn count_is_durable_before_any_paper_moves() {
    let reg = registry();
    reg.create(draft("A", true, None)).unwrap();

    // A printer that panics if asked to do anything: the quota charge and
    // its snapshot must already be on "flash" when rendering begins.
    struct DeadPrinter;
    impl rumormill::app::ports::PrinterPort for DeadPrinter {
        fn bold_on(&mut self) {
            panic!("printer exploded");
        }
        fn write_line(&mut self, _line: &str) {
            panic!("printer exploded");
        }
        fn feed(&mut self, _lines: u8) {
            panic!("printer exploded");
        }
        fn rest(&mut self) {
            panic!("printer exploded");
        }
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        service_trigger(&reg, &mut DeadPrinter);
    }));
    assert!(result.is_err(), "DeadPrinter must have been driven");

    // The print was consumed even though no paper came out.
    assert_eq!(reg.store().snapshot()[0].printed_count, 1);
}

#[test]
fn one_signal_one_print() {
    let queue: TriggerQueue = TriggerQueue::new();
    let reg = registry();
    reg.create(draft("A", true, Some(10))).unwrap();
    let mut printer = MockPrinter::new();

    queue.try_send(TriggerSignal).unwrap();
    queue.try_send(TriggerSignal).unwrap();

    // Drain the queue the way the worker loop does: one cycle per signal.
    while queue.try_receive().is_ok() {
        service_trigger(&reg, &mut printer);
    }

    assert_eq!(printer.lines().len(), 4, "two signals, two slips");
    let rumors = reg.list(None).unwrap();
    assert_eq!(rumors[0].printed_count, 2);
}

#[test]
fn startup_slip_names_the_ap_and_address() {
    let mut printer = MockPrinter::new();
    render_startup_slip(&mut printer, "RumourMill", "192.168.4.1");
    let lines = printer.lines();
    assert!(lines.contains(&"RumourMill"));
    assert!(lines.contains(&"192.168.4.1"));
    assert!(printer.rested());
}
