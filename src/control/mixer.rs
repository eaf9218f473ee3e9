//! Control-byte decoding and warm/cool duty-cycle computation.
//!
//! One byte encodes the whole light state: the high nibble is a relative
//! warm/cool mix index (0–15), the low nibble the brightness (0–15, 0 =
//! off). `compute_duties` maps that to two compare values for the shared
//! PWM timer, in integer arithmetic with truncating division throughout —
//! the results must match the shipped luminaire's brightness curves
//! bit-for-bit, so every intermediate truncation here is load-bearing.
//!
//! The mix term shifts energy between the channels without changing their
//! sum: `cool + warm == unit * brightness` for every mix code, so total
//! light output stays (approximately) constant while the colour moves.
//!
//! Note: the blend coefficient `(period + 1) / 225` cancels the warm
//! channel entirely at mix code 15 × brightness 15 (225 = 15 × 15). That
//! reads backwards for a "warm" index, but it is what the shipped boards
//! do, and the curve is kept for compatibility.

/// One received control value, immutable once constructed.
///
/// Both fields are in `[0, 15]` by construction — they are a shift and a
/// mask of an 8-bit value, so no out-of-range state is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlByte(u8);

impl ControlByte {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Warm/cool mix index: high nibble, 0–15.
    pub const fn color_code(self) -> u8 {
        self.0 >> 4
    }

    /// Brightness level: low nibble, 0–15. 0 = light off.
    pub const fn brightness(self) -> u8 {
        self.0 & 0x0F
    }

    /// Whether this byte commands any light at all.
    pub const fn is_on(self) -> bool {
        self.brightness() != 0
    }
}

/// Compare values for the two PWM channels, fresh on every control byte.
///
/// Each value is a tick count in `[0, period + 1]`; `0` is fully off and
/// `period + 1` (a compare the up-counter never reaches) is fully on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyPair {
    pub cool: u16,
    pub warm: u16,
}

impl DutyPair {
    pub const OFF: Self = Self { cool: 0, warm: 0 };
}

/// Map a control byte to the two channel duties for the given timer period
/// (the reload value, 15·N − 1).
///
/// ```
/// use cctlume::control::mixer::{compute_duties, ControlByte};
///
/// // Mix code 7, brightness 8 on the stock 3374-tick period.
/// let d = compute_duties(ControlByte::new(0x78), 3374);
/// assert_eq!((d.cool, d.warm), (840, 960));
/// ```
pub const fn compute_duties(byte: ControlByte, period: u16) -> DutyPair {
    let cycle = period as u32 + 1;
    let unit = cycle / 15; // duty per brightness step at mix code 0
    let blend = cycle / 225; // duty shifted per (code × brightness) step

    let brightness = byte.brightness() as u32;
    let code = byte.color_code() as u32;

    // blend * 15 <= unit for every period, so the subtraction cannot
    // underflow even at code 15.
    let total = unit * brightness;
    let warm = total - blend * code * brightness;
    let cool = total - warm;

    DutyPair {
        cool: cool as u16,
        warm: warm as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: u16 = 3374;

    #[test]
    fn nibble_decode() {
        let b = ControlByte::new(0xA5);
        assert_eq!(b.color_code(), 0x0A);
        assert_eq!(b.brightness(), 0x05);
        assert!(b.is_on());
        assert!(!ControlByte::new(0xF0).is_on());
    }

    // Regression baselines for the stock period, checked against the
    // shipped firmware's arithmetic.
    #[test]
    fn baseline_all_zero() {
        assert_eq!(compute_duties(ControlByte::new(0x00), PERIOD), DutyPair::OFF);
    }

    #[test]
    fn baseline_code_zero_single_channel() {
        // Code 0, brightness 15: all energy on the warm channel, fully on
        // (3375 = period + 1, a compare the counter never reaches).
        let d = compute_duties(ControlByte::new(0x0F), PERIOD);
        assert_eq!(d.warm, 3375);
        assert_eq!(d.cool, 0);
    }

    #[test]
    fn baseline_brightness_zero_dominates() {
        // Any mix code with brightness 0 is dark.
        let d = compute_duties(ControlByte::new(0xF0), PERIOD);
        assert_eq!(d, DutyPair::OFF);
    }

    #[test]
    fn baseline_max_code_cancels_warm() {
        // 225 = 15 × 15 cancels exactly at code 15 × brightness 15.
        let d = compute_duties(ControlByte::new(0xFF), PERIOD);
        assert_eq!(d.warm, 0);
        assert_eq!(d.cool, 3375);
    }

    #[test]
    fn baseline_mid_mix() {
        // unit = 225, blend = 15; warm = 225·8 − 15·7·8 = 960, cool = 840.
        let d = compute_duties(ControlByte::new(0x78), PERIOD);
        assert_eq!(d.warm, 960);
        assert_eq!(d.cool, 840);
    }

    #[test]
    fn conservation_is_exact() {
        // cool + warm == unit · brightness for every byte, exactly.
        let unit = (u32::from(PERIOD) + 1) / 15;
        for raw in 0..=255u8 {
            let b = ControlByte::new(raw);
            let d = compute_duties(b, PERIOD);
            assert_eq!(
                u32::from(d.cool) + u32::from(d.warm),
                unit * u32::from(b.brightness()),
                "byte {raw:#04x}"
            );
        }
    }
}
