//! Pure-logic drivers: edge gating and the ready light. Hardware register
//! access is cfg-gated inside each driver.

pub mod reed;
pub mod status_led;
