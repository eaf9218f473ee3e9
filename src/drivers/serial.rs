//! Serial control link (UART1).
//!
//! The link carries exactly one control byte per light update — no
//! framing, no checksum. The ESP-IDF UART driver's ISR moves received
//! bytes into its ring buffer; [`service_rx`] drains that buffer from the
//! main loop, keeps only the newest byte (stale unprocessed commands are
//! superseded, not queued), deposits it in the control-byte mailbox and
//! raises [`Event::ControlByteReceived`].
//!
//! The transmit side echoes each applied byte back as a one-byte
//! acknowledgement.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real UART driver install + ring-buffer drain.
//! On host/test: no-ops; tests feed the mailbox directly.

use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use crate::events::{self, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Install and configure the UART driver: 8 data bits, 1 stop bit, no
/// parity, RX interrupt-driven into the driver ring buffer.
#[cfg(target_os = "espidf")]
pub fn init(baud: u32) -> Result<(), CommsError> {
    let port = pins::UART_PORT as uart_port_t;

    // SAFETY: called once from main() before the event loop; the UART
    // driver is not touched from any other context until install returns.
    unsafe {
        let ret = uart_driver_install(port, pins::UART_RX_BUF_BYTES, 0, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK as i32 {
            return Err(CommsError::UartInitFailed(ret));
        }

        let cfg = uart_config_t {
            baud_rate: baud as i32,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        let ret = uart_param_config(port, &cfg);
        if ret != ESP_OK as i32 {
            return Err(CommsError::UartInitFailed(ret));
        }

        // -1 = leave RTS/CTS unrouted (no flow control).
        let ret = uart_set_pin(port, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1);
        if ret != ESP_OK as i32 {
            return Err(CommsError::UartInitFailed(ret));
        }
    }

    log::info!("serial: UART{} up at {} baud (8N1)", pins::UART_PORT, baud);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init(baud: u32) -> Result<(), CommsError> {
    log::info!("serial(sim): UART init skipped ({} baud)", baud);
    Ok(())
}

/// Drain every byte the ISR has buffered since the last call. The newest
/// byte wins the mailbox; one event is raised however many arrived.
/// Returns `true` when a byte was posted.
#[cfg(target_os = "espidf")]
pub fn service_rx() -> bool {
    let port = pins::UART_PORT as uart_port_t;
    let mut latest: Option<u8> = None;
    let mut chunk = [0u8; 16];

    loop {
        // SAFETY: reads from the driver's own ring buffer with a zero
        // timeout; never blocks, never touches unowned memory.
        let n = unsafe {
            uart_read_bytes(
                port,
                chunk.as_mut_ptr().cast(),
                chunk.len() as u32,
                0,
            )
        };
        if n <= 0 {
            break;
        }
        latest = Some(chunk[(n - 1) as usize]);
    }

    match latest {
        Some(byte) => {
            events::post_control_byte(byte);
            events::push_event(Event::ControlByteReceived);
            true
        }
        None => false,
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn service_rx() -> bool {
    false
}

/// Echo one applied control byte back over the link.
#[cfg(target_os = "espidf")]
pub fn write_ack(byte: u8) -> Result<(), CommsError> {
    let port = pins::UART_PORT as uart_port_t;
    let buf = [byte];
    // SAFETY: copies one byte into the driver's TX ring buffer.
    let n = unsafe { uart_write_bytes(port, buf.as_ptr().cast(), 1) };
    if n == 1 {
        Ok(())
    } else {
        Err(CommsError::TxFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn write_ack(_byte: u8) -> Result<(), CommsError> {
    Ok(())
}
