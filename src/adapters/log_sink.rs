//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (which goes to the console UART / USB-CDC in production).
//! A future network telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LightApplied {
                byte,
                duties,
                indicator_on,
            } => {
                info!(
                    "LIGHT | byte={:#04x} (code={} brightness={}) | cool={} warm={} | indicator={}",
                    byte.raw(),
                    byte.color_code(),
                    byte.brightness(),
                    duties.cool,
                    duties.warm,
                    if *indicator_on { "on" } else { "off" },
                );
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | last={:#04x} | cool={} warm={} | indicator={} | updates={}",
                    t.last_byte,
                    t.cool_duty,
                    t.warm_duty,
                    if t.indicator_on { "on" } else { "off" },
                    t.updates,
                );
            }
            AppEvent::Started { startup } => {
                info!("START | startup_byte={:#04x}", startup.raw());
            }
        }
    }
}
