//! One-shot hardware peripheral initialization.
//!
//! Configures the indicator GPIO and the MCPWM timer/operator/comparator/
//! generator chain using raw ESP-IDF sys calls. Called once from `main()`
//! before the event loop starts.
//!
//! MCPWM (not LEDC) drives the LED channels: the duty formula works in
//! ticks of an arbitrary 15·N − 1 period, and LEDC periods are locked to
//! powers of two.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    McpwmInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::McpwmInitFailed(rc) => write!(f, "MCPWM init failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_mcpwm()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::INDICATOR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::INDICATOR_GPIO, 0) };

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── MCPWM ─────────────────────────────────────────────────────
//
// One timer, one operator, two comparator/generator pairs. Each output is
// HIGH while the up-counter is below its compare value: compare 0 is fully
// off (the generator stays force-held low), compare period + 1 is fully on
// (the counter wraps at period, so the match never fires).

#[cfg(target_os = "espidf")]
static mut PWM_TIMER: mcpwm_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut PWM_OPER: mcpwm_oper_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut CMP_COOL: mcpwm_cmpr_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut CMP_WARM: mcpwm_cmpr_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut GEN_COOL: mcpwm_gen_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut GEN_WARM: mcpwm_gen_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_mcpwm() -> Result<(), HwInitError> {
    // SAFETY: the handle statics are written only here, once at boot,
    // before any mcpwm_apply() call.
    unsafe {
        let timer_cfg = mcpwm_timer_config_t {
            group_id: pins::MCPWM_GROUP,
            clk_src: soc_periph_mcpwm_clk_src_t_MCPWM_CLK_SRC_DEFAULT,
            resolution_hz: pins::PWM_TICK_HZ,
            count_mode: mcpwm_timer_count_mode_t_MCPWM_TIMER_COUNT_MODE_UP,
            period_ticks: u32::from(pins::PWM_PERIOD_TICKS) + 1,
            ..Default::default()
        };
        let ret = mcpwm_new_timer(&timer_cfg, &raw mut PWM_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }

        let oper_cfg = mcpwm_operator_config_t {
            group_id: pins::MCPWM_GROUP,
            ..Default::default()
        };
        let ret = mcpwm_new_operator(&oper_cfg, &raw mut PWM_OPER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }
        let ret = mcpwm_operator_connect_timer(PWM_OPER, PWM_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }

        init_channel(pins::COOL_PWM_GPIO, &raw mut CMP_COOL, &raw mut GEN_COOL)?;
        init_channel(pins::WARM_PWM_GPIO, &raw mut CMP_WARM, &raw mut GEN_WARM)?;

        // Park both outputs low until the controller applies its startup
        // state, then let the timer run.
        mcpwm_generator_set_force_level(GEN_COOL, 0, true);
        mcpwm_generator_set_force_level(GEN_WARM, 0, true);

        let ret = mcpwm_timer_enable(PWM_TIMER);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }
        let ret = mcpwm_timer_start_stop(
            PWM_TIMER,
            mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP,
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }
    }

    info!(
        "hw_init: MCPWM configured (period={} ticks, cool=GPIO{}, warm=GPIO{})",
        u32::from(pins::PWM_PERIOD_TICKS) + 1,
        pins::COOL_PWM_GPIO,
        pins::WARM_PWM_GPIO,
    );
    Ok(())
}

/// Set up one comparator + generator pair: HIGH at counter wrap, LOW on
/// compare match.
#[cfg(target_os = "espidf")]
unsafe fn init_channel(
    gpio: i32,
    cmp: *mut mcpwm_cmpr_handle_t,
    r#gen: *mut mcpwm_gen_handle_t,
) -> Result<(), HwInitError> {
    // SAFETY: caller holds the single-threaded boot context; the handles
    // written here are the statics owned by this module.
    unsafe {
        let mut cmp_cfg = mcpwm_comparator_config_t::default();
        // Compare rewrites latch at the counter wrap, so a half-updated
        // pair can never straddle one PWM cycle.
        cmp_cfg.flags.set_update_cmp_on_tez(1);
        let ret = mcpwm_new_comparator(PWM_OPER, &cmp_cfg, cmp);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }

        let gen_cfg = mcpwm_generator_config_t {
            gen_gpio_num: gpio,
            ..Default::default()
        };
        let ret = mcpwm_new_generator(PWM_OPER, &gen_cfg, r#gen);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }

        let ret = mcpwm_generator_set_action_on_timer_event(
            *r#gen,
            mcpwm_gen_timer_event_action_t {
                direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                event: mcpwm_timer_event_t_MCPWM_TIMER_EVENT_EMPTY,
                action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
            },
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }
        let ret = mcpwm_generator_set_action_on_compare_event(
            *r#gen,
            mcpwm_gen_compare_event_action_t {
                direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                comparator: *cmp,
                action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
            },
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }

        let ret = mcpwm_comparator_set_compare_value(*cmp, 0);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::McpwmInitFailed(ret));
        }
    }
    Ok(())
}

/// Reprogram the shared PWM timer: stop, rewrite period and both compare
/// values, restart. The outputs are force-held at the safe (off) level
/// for the duration — the only visible artifact is a sub-cycle blanking
/// interval, acceptable because updates are rare next to the PWM rate.
#[cfg(target_os = "espidf")]
pub fn mcpwm_apply(period: u16, cool: u16, warm: u16) {
    // SAFETY: handles were created in init_mcpwm() before this is
    // reachable; only the main loop calls this function.
    unsafe {
        mcpwm_generator_set_force_level(GEN_COOL, 0, true);
        mcpwm_generator_set_force_level(GEN_WARM, 0, true);
        mcpwm_timer_start_stop(PWM_TIMER, mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_STOP_FULL);

        mcpwm_timer_set_period(PWM_TIMER, u32::from(period) + 1);
        mcpwm_comparator_set_compare_value(CMP_COOL, u32::from(cool));
        mcpwm_comparator_set_compare_value(CMP_WARM, u32::from(warm));

        mcpwm_timer_start_stop(
            PWM_TIMER,
            mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP,
        );

        // Release the force on any channel with a nonzero duty; a duty of
        // 0 stays parked low so no single-tick sliver can escape.
        mcpwm_generator_set_force_level(GEN_COOL, if cool == 0 { 0 } else { -1 }, true);
        mcpwm_generator_set_force_level(GEN_WARM, if warm == 0 { 0 } else { -1 }, true);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn mcpwm_apply(_period: u16, _cool: u16, _warm: u16) {}
