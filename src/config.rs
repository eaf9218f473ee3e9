//! System configuration parameters
//!
//! All tunable parameters for the luminaire. Values are persisted in NVS
//! (non-volatile storage) and loaded once at boot; the defaults below match
//! the shipped board.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control link ---
    /// UART baud for the one-byte control link (8 data bits, 1 stop, no parity).
    pub uart_baud: u32,

    // --- Startup ---
    /// Control byte applied at boot, before the first byte arrives on the
    /// link. High nibble = colour-temperature code, low nibble = brightness.
    /// `0x00` powers the luminaire up dark.
    pub startup_control_byte: u8,

    // --- Indicator ---
    /// `true` when the indicator pin is driven HIGH for "light on".
    pub indicator_active_high: bool,

    // --- Timing ---
    /// Main-loop service interval (milliseconds).
    pub poll_interval_ms: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            uart_baud: 9600,
            startup_control_byte: 0x00,
            indicator_active_high: true,
            poll_interval_ms: 10,
            telemetry_interval_secs: 60,
        }
    }
}
