//! GPIO / peripheral pin assignments for the cctlume luminaire board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// LED channels (dual-MOSFET constant-voltage driver, active HIGH gates)
// ---------------------------------------------------------------------------

/// MCPWM generator output: cool-white channel (channel A).
pub const COOL_PWM_GPIO: i32 = 4;
/// MCPWM generator output: warm-white channel (channel B).
pub const WARM_PWM_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Digital output: "light on" indicator. Polarity is configurable
/// (`SystemConfig::indicator_active_high`); the board default is HIGH = on.
pub const INDICATOR_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Control UART
// ---------------------------------------------------------------------------

/// UART port carrying the one-byte light commands.
pub const UART_PORT: u32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
/// Driver-side RX ring buffer, filled from the UART ISR. Plenty for a
/// protocol of single-byte updates.
pub const UART_RX_BUF_BYTES: i32 = 256;

// ---------------------------------------------------------------------------
// PWM timing
// ---------------------------------------------------------------------------

/// MCPWM group hosting the shared timer.
pub const MCPWM_GROUP: i32 = 0;

/// PWM timer reload value in ticks. Must keep the 15·N − 1 form: the duty
/// formula divides (period + 1) by 15 and by 225, and a full-brightness
/// command only lands exactly on the full-scale compare value when both
/// divisions are exact.
pub const PWM_PERIOD_TICKS: u16 = 3374;

/// MCPWM timer resolution. 1 MHz over a 3375-tick cycle ≈ 296 Hz PWM,
/// matching the shipped luminaire's timer setup (16 MHz clock, prescaler 16).
pub const PWM_TICK_HZ: u32 = 1_000_000;
