//! Pin assignments for the rumor mill board.
//!
//! One ESP32 devkit, one QR204 58mm thermal panel printer on UART1, one
//! reed sensor on a pull-up input, and the on-board LED as a ready light.

/// On-board status LED, switched on once AP + web server are up.
pub const LED_GPIO: i32 = 2;

/// Reed sensor input. Internal pull-up; the magnet closing the circuit
/// pulls the line LOW, so a falling edge means "door opened".
pub const REED_GPIO: i32 = 4;

/// UART1 RX — wired to the printer's TX.
pub const PRINTER_RX_GPIO: i32 = 16;

/// UART1 TX — wired to the printer's RX.
pub const PRINTER_TX_GPIO: i32 = 17;

/// The QR204 ships locked to 9600 baud.
pub const PRINTER_BAUD: u32 = 9600;
