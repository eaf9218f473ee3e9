//! Light controller — the hexagonal core.
//!
//! [`LightController`] owns the decode → duty computation → hardware-apply
//! pipeline. All I/O flows through port traits injected at call sites,
//! making the whole sequence testable with mock adapters.
//!
//! ```text
//!  serial mailbox ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                     │   LightController     │
//!    ActuatorPort ◀── │  decode · mix · apply │
//!                     └──────────────────────┘
//! ```
//!
//! The controller is a two-state machine in the trivial sense: it is either
//! idle or mid-`on_control_byte`, and the whole pipeline runs to completion
//! before the next byte is taken from the mailbox. Combined with the
//! mailbox's overwrite semantics this gives the update-ordering contract:
//! at most one byte is being converted to hardware state at any instant,
//! and the most recently received byte eventually wins.

use log::info;

use crate::control::mixer::{compute_duties, ControlByte, DutyPair};
use crate::fault;

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink};

/// Orchestrates the control pipeline over injected ports.
pub struct LightController {
    /// PWM timer reload value, fixed for the life of the process.
    period: u16,
    last_byte: ControlByte,
    last_duties: DutyPair,
    updates: u64,
}

impl LightController {
    pub fn new(period: u16) -> Self {
        Self {
            period,
            last_byte: ControlByte::new(0),
            last_duties: DutyPair::OFF,
            updates: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the configured startup state so the hardware is defined
    /// before the first byte arrives on the link.
    pub fn start(
        &mut self,
        startup: ControlByte,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.on_control_byte(startup, hw, sink);
        sink.emit(&AppEvent::Started { startup });
        info!("LightController started (startup byte {:#04x})", startup.raw());
    }

    // ── Per-byte pipeline ─────────────────────────────────────

    /// Convert one control byte to hardware state.
    ///
    /// The indicator is driven *before* the PWM timer so it reflects the
    /// commanded intent even during the sub-cycle blanking window of the
    /// timer rewrite. Callers must preserve this order.
    pub fn on_control_byte(
        &mut self,
        byte: ControlByte,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let duties = compute_duties(byte, self.period);

        // The formula bounds both duties by period + 1; anything larger
        // means the formula or the period constant was edited out of sync,
        // and undefined compare values must not reach the timer.
        let full_scale = u32::from(self.period) + 1;
        if u32::from(duties.cool) > full_scale || u32::from(duties.warm) > full_scale {
            // Drive the lamp dark through the port before parking, so the
            // hardware is left in its safe state whatever the logger does.
            hw.all_off();
            fault::fail_stop("duty exceeds PWM period");
        }

        let indicator_on = byte.is_on();
        hw.set_indicator(indicator_on);
        hw.apply_duties(self.period, duties);

        self.last_byte = byte;
        self.last_duties = duties;
        self.updates += 1;

        sink.emit(&AppEvent::LightApplied {
            byte,
            duties,
            indicator_on,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the last applied state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            last_byte: self.last_byte.raw(),
            cool_duty: self.last_duties.cool,
            warm_duty: self.last_duties.warm,
            indicator_on: self.last_byte.is_on(),
            updates: self.updates,
        }
    }

    /// Most recently applied duty pair.
    pub fn last_duties(&self) -> DutyPair {
        self.last_duties
    }

    /// Control bytes applied since boot.
    pub fn update_count(&self) -> u64 {
        self.updates
    }
}
