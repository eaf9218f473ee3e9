//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the actuator drivers and exposes them through [`ActuatorPort`].
//! This is the only module in the system handing domain calls to actual
//! hardware. On non-espidf targets the underlying drivers use cfg-gated
//! simulation stubs.

use crate::app::ports::ActuatorPort;
use crate::control::mixer::DutyPair;
use crate::drivers::indicator::DigitalIndicator;
use crate::drivers::pwm::PwmOutputDriver;

/// Concrete adapter combining all light hardware behind the port trait.
pub struct HardwareAdapter {
    pwm: PwmOutputDriver,
    indicator: DigitalIndicator,
}

impl HardwareAdapter {
    pub fn new(pwm: PwmOutputDriver, indicator: DigitalIndicator) -> Self {
        Self { pwm, indicator }
    }

    /// Last duty pair written to the timer (for diagnostics).
    pub fn applied_duties(&self) -> DutyPair {
        self.pwm.applied()
    }
}

impl ActuatorPort for HardwareAdapter {
    fn set_indicator(&mut self, on: bool) {
        self.indicator.set_on(on);
    }

    fn apply_duties(&mut self, period: u16, duties: DutyPair) {
        self.pwm.apply(period, duties);
    }

    fn all_off(&mut self) {
        self.pwm.off();
        self.indicator.set_on(false);
    }
}
