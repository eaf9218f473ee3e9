//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use cctlume::app::events::AppEvent;
use cctlume::app::ports::{ActuatorPort, EventSink};
use cctlume::control::mixer::DutyPair;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetIndicator { on: bool },
    ApplyDuties { period: u16, duties: DutyPair },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Indicator level implied by the call history.
    pub fn indicator_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetIndicator { on } => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Duty pair implied by the call history.
    pub fn applied_duties(&self) -> DutyPair {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::ApplyDuties { duties, .. } => Some(*duties),
                ActuatorCall::AllOff => Some(DutyPair::OFF),
                _ => None,
            })
            .unwrap_or(DutyPair::OFF)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_indicator(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetIndicator { on });
    }

    fn apply_duties(&mut self, period: u16, duties: DutyPair) {
        self.calls.push(ActuatorCall::ApplyDuties { period, duties });
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn last_event(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
