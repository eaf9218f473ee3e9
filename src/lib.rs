//! Cctlume firmware library.
//!
//! Control firmware for a two-channel (warm/cool white) dimmable LED
//! luminaire: one control byte arrives over UART, a fixed-point mixer
//! turns it into a pair of PWM duties, and the hardware layer reprograms
//! the PWM timer and indicator GPIO atomically.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod events;
pub mod fault;

pub mod error;
pub mod pins;

// The ESP-IDF-only paths in these modules are guarded by cfg attributes
// inside; on other targets they compile to simulation stubs.
pub mod adapters;
pub mod drivers;
