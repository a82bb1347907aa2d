//! QR204 thermal panel printer over UART1.
//!
//! Implements [`PrinterPort`] with the small ESC/POS subset the QR204
//! understands. Strictly fire-and-forget: nothing is read back, a UART
//! write failure is logged and swallowed, and the caller never learns —
//! the port contract has no feedback channel.
//!
//! The pauses between commands match the original appliance's pacing; the
//! QR204 has a shallow input buffer and no flow control.

use std::thread::sleep;
use std::time::Duration;

use crate::app::ports::PrinterPort;

#[cfg(target_os = "espidf")]
use esp_idf_hal::uart::UartDriver;

const ESC: u8 = 0x1B;

/// Pause after each command so the head keeps up.
const CMD_PAUSE: Duration = Duration::from_millis(10);

/// Dwell in low-power mode during a rest cycle.
const REST_PAUSE: Duration = Duration::from_millis(1000);

/// Settle time after the wake byte before the controller accepts commands.
const WAKE_PAUSE: Duration = Duration::from_millis(50);

pub struct ThermalPrinter {
    #[cfg(target_os = "espidf")]
    uart: UartDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl ThermalPrinter {
    /// Wrap an already-configured 9600-8N1 UART (see `pins`).
    pub fn new(uart: UartDriver<'static>) -> Self {
        Self { uart }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if let Err(e) = self.uart.write(bytes) {
            log::warn!("printer: UART write failed ({e})");
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ThermalPrinter {
    pub fn new() -> Self {
        Self {}
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        log::debug!("printer(sim): {} bytes", bytes.len());
    }
}

impl PrinterPort for ThermalPrinter {
    fn bold_on(&mut self) {
        self.write_bytes(&[ESC, b'E', 1]);
        sleep(CMD_PAUSE);
    }

    fn write_line(&mut self, line: &str) {
        self.write_bytes(line.as_bytes());
        self.write_bytes(b"\n");
        sleep(CMD_PAUSE);
    }

    fn feed(&mut self, lines: u8) {
        self.write_bytes(&[ESC, b'd', lines]);
        sleep(CMD_PAUSE);
    }

    fn rest(&mut self) {
        // Sleep after one second of idle...
        self.write_bytes(&[ESC, b'8', 1, 0]);
        sleep(REST_PAUSE);
        // ...then wake: dummy byte, settle, sleep-off.
        self.write_bytes(&[0xFF]);
        sleep(WAKE_PAUSE);
        self.write_bytes(&[ESC, b'8', 0, 0]);
    }
}
