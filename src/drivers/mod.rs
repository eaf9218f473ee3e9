//! Hardware drivers (actuators + raw peripheral access).

pub mod hw_init;
pub mod indicator;
pub mod pwm;
pub mod serial;
