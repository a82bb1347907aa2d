//! Reed sensor input over any `embedded-hal` digital input pin.
//!
//! The switch sits between the GPIO and ground with the internal pull-up
//! enabled: magnet present (door closed) leaves the line high, opening the
//! door closes the reed and pulls it low. [`ReedPort::is_active`] is the
//! normalised "door open" view of that wiring.

use embedded_hal::digital::InputPin;

use crate::app::ports::ReedPort;

pub struct ReedInput<P: InputPin> {
    pin: P,
}

impl<P: InputPin> ReedInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ReedPort for ReedInput<P> {
    fn is_active(&mut self) -> bool {
        // A read failure counts as inactive — a glitching pin must not
        // stream phantom triggers into the queue.
        self.pin.is_low().unwrap_or(false)
    }
}
