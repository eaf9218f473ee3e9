//! Two-channel PWM output driver.
//!
//! Owns the "apply a period + duty pair to the shared timer" operation and
//! remembers what was last written, so telemetry never has to read the
//! peripheral back. The channels share one timer but carry fully
//! independent compare values — nothing requires them to sum to the period.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reprograms the real MCPWM timer via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::control::mixer::DutyPair;
use crate::drivers::hw_init;

pub struct PwmOutputDriver {
    applied: DutyPair,
    period: u16,
}

impl PwmOutputDriver {
    pub fn new(period: u16) -> Self {
        Self {
            applied: DutyPair::OFF,
            period,
        }
    }

    /// Atomically reprogram the timer with `period` and both compare
    /// values. Infallible once the peripheral is initialised — duty
    /// ranges are guaranteed upstream by the mixer's invariant.
    pub fn apply(&mut self, period: u16, duties: DutyPair) {
        hw_init::mcpwm_apply(period, duties.cool, duties.warm);
        self.period = period;
        self.applied = duties;
    }

    /// Drive both channels fully off.
    pub fn off(&mut self) {
        self.apply(self.period, DutyPair::OFF);
    }

    /// Last duty pair written to the hardware.
    pub fn applied(&self) -> DutyPair {
        self.applied
    }

    /// Whether either channel currently emits light.
    pub fn is_emitting(&self) -> bool {
        self.applied.cool > 0 || self.applied.warm > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_applied_state_through_apply_and_off() {
        let mut pwm = PwmOutputDriver::new(3374);
        assert!(!pwm.is_emitting());

        let duties = DutyPair { cool: 840, warm: 960 };
        pwm.apply(3374, duties);
        assert_eq!(pwm.applied(), duties);
        assert!(pwm.is_emitting());

        pwm.off();
        assert_eq!(pwm.applied(), DutyPair::OFF);
        assert!(!pwm.is_emitting());
    }
}
