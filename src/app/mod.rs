//! Application layer: the hexagonal core and its port boundary.

pub mod events;
pub mod ports;
pub mod service;
