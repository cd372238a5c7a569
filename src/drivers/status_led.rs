//! Status LED driver.
//!
//! Wraps any `embedded-hal` output line.  The driver remembers the last
//! commanded state so the blink engine can toggle without reading the line
//! back.  That state follows the command even when the write fails, so a
//! glitching line cannot desynchronise the blink phase.

use embedded_hal::digital::{OutputPin, PinState};

pub struct StatusLed<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap `pin`.  The LED is assumed off until the first command.
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        self.on = on;
        self.pin.set_state(PinState::from(on))
    }

    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    /// Last commanded state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
