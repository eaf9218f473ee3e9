//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightController (domain)
//! ```
//!
//! Driven adapters (actuators, event sinks, config storage) implement these
//! traits. The [`LightController`](super::service::LightController) consumes
//! them via generics, so the domain core never touches hardware directly —
//! which is also what makes the whole pipeline testable on the host.

use crate::config::SystemConfig;
use crate::control::mixer::DutyPair;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the light hardware.
pub trait ActuatorPort {
    /// Drive the "light on" indicator output.
    fn set_indicator(&mut self, on: bool);

    /// Atomically reprogram the shared PWM timer: both channels pick up
    /// `period` and their respective compare values in one stop/rewrite/
    /// restart bracket.
    fn apply_duties(&mut self, period: u16, duties: DutyPair);

    /// Kill both channels and the indicator — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// a future network transport would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting —
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed the deserialization check.
    Corrupted,
    /// A config field failed range validation; the payload names it.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
