//! Ready-light driver for the on-board LED.
//!
//! The LED goes on once the access point, web server, and worker tasks are
//! all up — a user at the device can tell at a glance whether it is serving.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::pins;

static SIM_LED_ON: AtomicBool = AtomicBool::new(false);

/// Current simulated LED level (host targets only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_is_on() -> bool {
    SIM_LED_ON.load(Ordering::Relaxed)
}

pub struct StatusLed {
    gpio: i32,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            gpio: pins::LED_GPIO,
        }
    }

    pub fn set(&mut self, on: bool) {
        self.write_level(on);
        SIM_LED_ON.store(on, Ordering::Relaxed);
    }

    #[cfg(target_os = "espidf")]
    fn write_level(&mut self, on: bool) {
        use esp_idf_sys::{gpio_set_direction, gpio_set_level, gpio_mode_t_GPIO_MODE_OUTPUT};
        // SAFETY: plain register writes on a pin this driver owns exclusively.
        unsafe {
            gpio_set_direction(self.gpio, gpio_mode_t_GPIO_MODE_OUTPUT);
            gpio_set_level(self.gpio, u32::from(on));
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_level(&mut self, _on: bool) {}
}
