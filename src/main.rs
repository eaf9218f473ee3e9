//! Cctlume Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter       LogEventSink     NvsConfigStore   │
//! │  (PWM + indicator)     (EventSink)      (ConfigPort)     │
//! │                                                          │
//! │  ──────────── Port Trait Boundary ────────────────       │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │        LightController (pure logic)            │      │
//! │  │  decode · fixed-point mix · duty bound check   │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  UART driver (ISR) ─▶ byte mailbox ─▶ event queue        │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use cctlume::adapters::hardware::HardwareAdapter;
use cctlume::adapters::log_sink::LogEventSink;
use cctlume::adapters::nvs::NvsConfigStore;
use cctlume::app::events::AppEvent;
use cctlume::app::ports::{ConfigError, ConfigPort, EventSink};
use cctlume::app::service::LightController;
use cctlume::config::SystemConfig;
use cctlume::control::mixer::ControlByte;
use cctlume::drivers::indicator::DigitalIndicator;
use cctlume::drivers::pwm::PwmOutputDriver;
use cctlume::drivers::{hw_init, serial};
use cctlume::events::{self, push_event, Event};
use cctlume::pins;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Cctlume v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsConfigStore::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS. On next reboot it should self-heal.
            None
        }
    };
    let config = match nvs.as_ref().map(ConfigPort::load) {
        Some(Ok(cfg)) => {
            info!("Config loaded from NVS");
            cfg
        }
        Some(Err(ConfigError::NotFound)) => {
            info!("First boot: seeding default config into NVS");
            let cfg = SystemConfig::default();
            if let Some(n) = nvs.as_ref() {
                if let Err(e) = n.save(&cfg) {
                    warn!("Config seed failed ({}), continuing unseeded", e);
                }
            }
            cfg
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
        None => SystemConfig::default(),
    };

    // ── 4. Bring up the control link ──────────────────────────
    if let Err(e) = serial::init(config.uart_baud) {
        // Without the link there is no control input at all; a silent
        // half-alive luminaire is worse than a visibly dead one.
        log::error!("UART init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 5. Construct adapters + controller ────────────────────
    let mut hw = HardwareAdapter::new(
        PwmOutputDriver::new(pins::PWM_PERIOD_TICKS),
        DigitalIndicator::new(config.indicator_active_high),
    );
    let mut log_sink = LogEventSink::new();

    let mut controller = LightController::new(pins::PWM_PERIOD_TICKS);
    controller.start(
        ControlByte::new(config.startup_control_byte),
        &mut hw,
        &mut log_sink,
    );

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let poll = std::time::Duration::from_millis(u64::from(config.poll_interval_ms));
    let ticks_per_telemetry =
        u64::from(config.telemetry_interval_secs) * 1000 / u64::from(config.poll_interval_ms);
    let mut telemetry_counter: u64 = 0;

    loop {
        std::thread::sleep(poll);

        // Drain the UART driver's RX buffer into the byte mailbox; this
        // raises ControlByteReceived when anything arrived.
        serial::service_rx();

        telemetry_counter += 1;
        if telemetry_counter >= ticks_per_telemetry {
            let _ = push_event(Event::TelemetryTick);
            telemetry_counter = 0;
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ControlByteReceived => {
                if let Some(byte) = events::take_control_byte() {
                    controller.on_control_byte(ControlByte::new(byte), &mut hw, &mut log_sink);
                    if let Err(e) = serial::write_ack(byte) {
                        warn!("Ack transmit failed: {}", e);
                    }
                }
            }

            Event::TelemetryTick => {
                let t = controller.build_telemetry();
                log_sink.emit(&AppEvent::Telemetry(t));
            }
        });
    }
}
