//! Outbound application events.
//!
//! The [`LightController`](super::service::LightController) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them — log to serial today.

use crate::control::mixer::{ControlByte, DutyPair};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    /// The controller has started and applied its startup state.
    Started { startup: ControlByte },

    /// A control byte was converted to hardware state.
    LightApplied {
        byte: ControlByte,
        duties: DutyPair,
        indicator_on: bool,
    },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    /// Raw value of the most recently applied control byte.
    pub last_byte: u8,
    pub cool_duty: u16,
    pub warm_duty: u16,
    pub indicator_on: bool,
    /// Control bytes applied since boot (startup state included).
    pub updates: u64,
}
