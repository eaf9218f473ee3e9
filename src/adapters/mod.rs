//! Adapters implementing the app-layer port traits over real resources.

pub mod hardware;
pub mod log_sink;
pub mod nvs;
