//! Fail-stop path for invariant violations.
//!
//! A violated invariant (a duty value past the timer's full-scale compare,
//! for instance) must never turn into undefined hardware output. On target
//! the firmware logs the reason and parks the CPU until the watchdog or a
//! power cycle resets it. On the host build it panics instead, so tests
//! can observe the stop.

/// Log `reason` at error level and halt. Never returns.
pub fn fail_stop(reason: &str) -> ! {
    log::error!("FATAL: {reason} — halting");

    #[cfg(target_os = "espidf")]
    loop {
        // Parked on purpose; only a reset leaves this loop.
    }

    #[cfg(not(target_os = "espidf"))]
    panic!("fail-stop: {reason}");
}
