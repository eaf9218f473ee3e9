//! Integration tests for the LightController → actuator pipeline.
//!
//! These run on the host (x86_64) and verify that the full chain from an
//! incoming control byte down to the actuator calls works correctly,
//! including call ordering, without any real hardware.

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware};

use cctlume::app::events::AppEvent;
use cctlume::app::service::LightController;
use cctlume::control::mixer::{ControlByte, DutyPair};
use cctlume::pins::PWM_PERIOD_TICKS;

fn make_controller() -> (LightController, MockHardware, LogSink) {
    (
        LightController::new(PWM_PERIOD_TICKS),
        MockHardware::new(),
        LogSink::new(),
    )
}

// ── Startup state ─────────────────────────────────────────────

#[test]
fn startup_byte_reaches_hardware_before_any_rx() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    ctl.start(ControlByte::new(0x00), &mut hw, &mut sink);

    // Startup must leave the hardware in a defined state: indicator off,
    // both channels at zero duty.
    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::SetIndicator { on: false },
            ActuatorCall::ApplyDuties {
                period: PWM_PERIOD_TICKS,
                duties: DutyPair::OFF,
            },
        ]
    );

    // LightApplied first, then Started.
    assert!(matches!(sink.events[0], AppEvent::LightApplied { .. }));
    assert!(matches!(
        sink.events[1],
        AppEvent::Started { startup } if startup.raw() == 0x00
    ));
}

#[test]
fn nonzero_startup_byte_lights_the_lamp() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    ctl.start(ControlByte::new(0x78), &mut hw, &mut sink);

    assert!(hw.indicator_on());
    assert_eq!(hw.applied_duties(), DutyPair { cool: 840, warm: 960 });
}

// ── Per-byte pipeline ─────────────────────────────────────────

#[test]
fn indicator_is_driven_before_the_pwm_rewrite() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    ctl.on_control_byte(ControlByte::new(0x3F), &mut hw, &mut sink);

    // During the blanking window of the timer rewrite the indicator must
    // already reflect the commanded intent, so it is written first.
    let indicator_idx = hw
        .calls
        .iter()
        .position(|c| matches!(c, ActuatorCall::SetIndicator { .. }))
        .unwrap();
    let pwm_idx = hw
        .calls
        .iter()
        .position(|c| matches!(c, ActuatorCall::ApplyDuties { .. }))
        .unwrap();
    assert!(indicator_idx < pwm_idx);
}

#[test]
fn zero_brightness_forces_everything_off_regardless_of_colour() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    // Light it first so "off" is an actual transition.
    ctl.on_control_byte(ControlByte::new(0xFF), &mut hw, &mut sink);
    assert!(hw.indicator_on());

    // Any byte with a zero brightness nibble is a full-off command.
    ctl.on_control_byte(ControlByte::new(0xF0), &mut hw, &mut sink);

    assert!(!hw.indicator_on());
    assert_eq!(hw.applied_duties(), DutyPair::OFF);
}

#[test]
fn repeated_byte_reapplies_identical_duties() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    ctl.on_control_byte(ControlByte::new(0x78), &mut hw, &mut sink);
    let first = hw.applied_duties();

    ctl.on_control_byte(ControlByte::new(0x78), &mut hw, &mut sink);
    let second = hw.applied_duties();

    assert_eq!(first, second);
    assert_eq!(ctl.update_count(), 2);
}

#[test]
fn extreme_colour_codes_land_on_a_single_channel() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    // Colour code 0 puts the whole output on the warm channel.
    ctl.on_control_byte(ControlByte::new(0x0F), &mut hw, &mut sink);
    let warm_only = hw.applied_duties();
    assert_eq!(warm_only.cool, 0);
    assert!(warm_only.warm > 0);

    // Colour code 15 cancels the warm channel entirely.
    ctl.on_control_byte(ControlByte::new(0xFF), &mut hw, &mut sink);
    let cool_only = hw.applied_duties();
    assert_eq!(cool_only.warm, 0);
    assert!(cool_only.cool > 0);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_snapshot_matches_last_hardware_state() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    ctl.on_control_byte(ControlByte::new(0x78), &mut hw, &mut sink);
    ctl.on_control_byte(ControlByte::new(0x0F), &mut hw, &mut sink);

    let t = ctl.build_telemetry();
    assert_eq!(t.last_byte, 0x0F);
    assert_eq!(
        DutyPair { cool: t.cool_duty, warm: t.warm_duty },
        hw.applied_duties()
    );
    assert!(t.indicator_on);
    assert_eq!(t.updates, 2);
}

#[test]
fn every_applied_byte_emits_a_light_applied_event() {
    let (mut ctl, mut hw, mut sink) = make_controller();

    for byte in [0x11u8, 0x22, 0x00, 0xFF] {
        ctl.on_control_byte(ControlByte::new(byte), &mut hw, &mut sink);
    }

    let applied: Vec<u8> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::LightApplied { byte, .. } => Some(byte.raw()),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![0x11, 0x22, 0x00, 0xFF]);
}
