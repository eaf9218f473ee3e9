//! "Light on" indicator output.
//!
//! A single digital pin mirroring whether the commanded brightness is
//! nonzero. Idempotent; never read back by hardware.

use crate::drivers::hw_init;
use crate::pins;

pub struct DigitalIndicator {
    active_high: bool,
    on: bool,
}

impl DigitalIndicator {
    pub fn new(active_high: bool) -> Self {
        Self {
            active_high,
            on: false,
        }
    }

    pub fn set_on(&mut self, on: bool) {
        hw_init::gpio_write(pins::INDICATOR_GPIO, self.pin_level(on));
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Electrical level for a logical state under the configured polarity.
    fn pin_level(&self, on: bool) -> bool {
        on == self.active_high
    }
}
