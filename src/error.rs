//! Error types for the control link.
//!
//! Peripheral init keeps its error enum next to the driver
//! (`drivers::hw_init::HwInitError`); this module carries the UART-side
//! errors. All variants are `Copy` so they can be passed around without
//! allocation.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// UART driver install or parameter configuration failed.
    UartInitFailed(i32),
    /// A transmit did not complete.
    TxFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={rc})"),
            Self::TxFailed => write!(f, "UART transmit failed"),
        }
    }
}

impl std::error::Error for CommsError {}
