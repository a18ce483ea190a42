//! # Axis Normalization Module
//!
//! Maps raw hardware axis values to calibrated floating-point ranges.
//!
//! ## Hardware Deadzone
//!
//! Sticks report signed 16-bit values and triggers unsigned 8-bit values.
//! Values inside the hardware deadzone map to exactly 0.0, and the remaining
//! range is rescaled so the deadzone edge maps to 0.0 and the extreme raw
//! value maps to ±1.0 (sticks) or 1.0 (triggers).
//!
//! ## Axis Deadzone
//!
//! A second, tunable deadzone is applied to each already-normalized stick
//! coordinate independently. The two stages are layered: the hardware stage
//! removes sensor noise, the axis stage sets the feel and can be changed at
//! runtime without touching the hardware constants.
//!
//! ## Usage
//!
//! ```
//! use padframe::controller::normalize::{apply_deadzone, normalize_stick_axis};
//!
//! // Inside the hardware deadzone
//! assert_eq!(normalize_stick_axis(1000, 7849), 0.0);
//!
//! // Full deflection survives both stages
//! let value = normalize_stick_axis(i16::MAX, 7849);
//! assert_eq!(apply_deadzone(value, 0.15), 1.0);
//! ```

/// Left stick hardware deadzone (XInput default).
pub const LEFT_STICK_DEADZONE: i16 = 7849;

/// Right stick hardware deadzone (XInput default).
pub const RIGHT_STICK_DEADZONE: i16 = 8689;

/// Analog trigger threshold below which the trigger reads 0.0.
pub const TRIGGER_THRESHOLD: u8 = 30;

/// Raw trigger value above which the trigger counts as a pressed button (50%).
///
/// Independent of [`TRIGGER_THRESHOLD`]: one governs the continuous axis, the
/// other the digital L2/R2 flags.
pub const TRIGGER_BUTTON_THRESHOLD: u8 = 128;

/// Default secondary deadzone applied to normalized stick coordinates.
pub const DEFAULT_AXIS_DEADZONE: f32 = 0.15;

/// Largest raw stick magnitude.
const STICK_MAX: f32 = i16::MAX as f32;

/// Largest raw trigger value.
const TRIGGER_MAX: f32 = u8::MAX as f32;

/// Converts a raw stick value to a normalized value (-1.0 to 1.0).
///
/// # Arguments
///
/// * `raw` - Raw axis value from the driver
/// * `deadzone` - Hardware deadzone magnitude (negative values act as 0)
///
/// # Returns
///
/// 0.0 inside the deadzone. Outside it, positive and negative branches are
/// scaled separately so `deadzone` maps to 0.0 and `i16::MAX` maps to 1.0.
/// `i16::MIN` lands one step past -1.0 and is clamped.
///
/// # Examples
///
/// ```
/// use padframe::controller::normalize::normalize_stick_axis;
///
/// assert_eq!(normalize_stick_axis(7849, 7849), 0.0);
/// assert_eq!(normalize_stick_axis(i16::MAX, 7849), 1.0);
/// assert_eq!(normalize_stick_axis(i16::MIN, 7849), -1.0);
/// ```
#[must_use]
pub fn normalize_stick_axis(raw: i16, deadzone: i16) -> f32 {
    // i32 so that i16::MIN and negative deadzones never overflow
    let raw = i32::from(raw);
    let deadzone = i32::from(deadzone.max(0));

    if raw.abs() < deadzone {
        return 0.0;
    }

    let span = STICK_MAX - deadzone as f32;
    if span <= 0.0 {
        return if raw > 0 { 1.0 } else if raw < 0 { -1.0 } else { 0.0 };
    }

    let normalized = if raw > 0 {
        (raw - deadzone) as f32 / span
    } else {
        (raw + deadzone) as f32 / span
    };

    normalized.clamp(-1.0, 1.0)
}

/// Converts a raw trigger value to a normalized value (0.0 to 1.0).
///
/// # Arguments
///
/// * `raw` - Raw trigger value from the driver
/// * `threshold` - Values below this read as released
///
/// # Examples
///
/// ```
/// use padframe::controller::normalize::normalize_trigger_axis;
///
/// assert_eq!(normalize_trigger_axis(10, 30), 0.0);
/// assert_eq!(normalize_trigger_axis(30, 30), 0.0);
/// assert_eq!(normalize_trigger_axis(255, 30), 1.0);
/// ```
#[must_use]
pub fn normalize_trigger_axis(raw: u8, threshold: u8) -> f32 {
    if raw < threshold {
        return 0.0;
    }
    if threshold == u8::MAX {
        return 1.0;
    }

    let normalized = f32::from(raw - threshold) / (TRIGGER_MAX - f32::from(threshold));
    normalized.min(1.0)
}

/// Applies the secondary deadzone to a normalized stick coordinate.
///
/// Values with magnitude below `deadzone` become 0.0; the remaining range
/// `[deadzone, 1.0]` is rescaled to `[0.0, 1.0]`, keeping the sign. This is a
/// single-pass transform: applying it twice narrows the output again.
///
/// # Arguments
///
/// * `value` - Normalized coordinate (-1.0 to 1.0)
/// * `deadzone` - Deadzone fraction, see [`DEFAULT_AXIS_DEADZONE`]
///
/// # Examples
///
/// ```
/// use padframe::controller::normalize::apply_deadzone;
///
/// assert_eq!(apply_deadzone(0.0, 0.15), 0.0);
/// assert_eq!(apply_deadzone(-0.1, 0.15), 0.0);
/// assert_eq!(apply_deadzone(-1.0, 0.15), -1.0);
/// ```
#[must_use]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }

    let deadzone = if deadzone.is_nan() { 0.0 } else { deadzone.max(0.0) };
    let magnitude = value.abs();
    if magnitude < deadzone {
        return 0.0;
    }

    let span = 1.0 - deadzone;
    if span <= f32::EPSILON {
        return value.signum();
    }

    let scaled = value.signum() * (magnitude - deadzone) / span;
    scaled.clamp(-1.0, 1.0)
}

/// Whether a raw trigger value counts as a pressed button.
///
/// Strictly greater than `threshold`, so a half-pulled trigger at exactly
/// the threshold still reads as released.
#[inline]
#[must_use]
pub fn trigger_pressed(raw: u8, threshold: u8) -> bool {
    raw > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Stick Tests ====================

    #[test]
    fn test_stick_inside_deadzone_is_zero() {
        for raw in [-7848, -4000, -1, 0, 1, 4000, 7848] {
            assert_eq!(
                normalize_stick_axis(raw, LEFT_STICK_DEADZONE),
                0.0,
                "raw {} should be inside the deadzone",
                raw
            );
        }
    }

    #[test]
    fn test_stick_at_deadzone_boundary_is_exactly_zero() {
        assert_eq!(normalize_stick_axis(7849, 7849), 0.0);
        assert_eq!(normalize_stick_axis(-7849, 7849), 0.0);
        assert_eq!(normalize_stick_axis(8689, RIGHT_STICK_DEADZONE), 0.0);
    }

    #[test]
    fn test_stick_extremes() {
        assert_eq!(normalize_stick_axis(32767, LEFT_STICK_DEADZONE), 1.0);
        assert_eq!(normalize_stick_axis(-32768, LEFT_STICK_DEADZONE), -1.0);
        assert_eq!(normalize_stick_axis(-32767, LEFT_STICK_DEADZONE), -1.0);
        assert_eq!(normalize_stick_axis(32767, RIGHT_STICK_DEADZONE), 1.0);
    }

    #[test]
    fn test_stick_midpoint_is_linear() {
        let dz = LEFT_STICK_DEADZONE;
        let mid = dz as i32 + (32767 - dz as i32) / 2;
        let value = normalize_stick_axis(mid as i16, dz);
        assert!((value - 0.5).abs() < 0.001);

        let value = normalize_stick_axis(-mid as i16, dz);
        assert!((value + 0.5).abs() < 0.001);
    }

    #[test]
    fn test_stick_branches_are_symmetric() {
        for raw in [8000i16, 12000, 20000, 30000] {
            let pos = normalize_stick_axis(raw, LEFT_STICK_DEADZONE);
            let neg = normalize_stick_axis(-raw, LEFT_STICK_DEADZONE);
            assert_eq!(pos, -neg, "raw {} should mirror", raw);
        }
    }

    #[test]
    fn test_stick_zero_deadzone() {
        assert_eq!(normalize_stick_axis(0, 0), 0.0);
        assert_eq!(normalize_stick_axis(32767, 0), 1.0);
        assert_eq!(normalize_stick_axis(-32768, 0), -1.0);
    }

    #[test]
    fn test_stick_negative_deadzone_acts_as_zero() {
        assert_eq!(normalize_stick_axis(0, -100), 0.0);
        assert_eq!(normalize_stick_axis(32767, -100), 1.0);
    }

    #[test]
    fn test_stick_max_deadzone() {
        assert_eq!(normalize_stick_axis(32766, i16::MAX), 0.0);
        assert_eq!(normalize_stick_axis(32767, i16::MAX), 1.0);
        assert_eq!(normalize_stick_axis(-32768, i16::MAX), -1.0);
    }

    #[test]
    fn test_stick_output_always_in_range() {
        for raw in (i16::MIN..=i16::MAX).step_by(97) {
            let value = normalize_stick_axis(raw, LEFT_STICK_DEADZONE);
            assert!(value.is_finite());
            assert!((-1.0..=1.0).contains(&value), "raw {} gave {}", raw, value);
        }
    }

    // ==================== Trigger Tests ====================

    #[test]
    fn test_trigger_below_threshold_is_zero() {
        for raw in 0..TRIGGER_THRESHOLD {
            assert_eq!(normalize_trigger_axis(raw, TRIGGER_THRESHOLD), 0.0);
        }
    }

    #[test]
    fn test_trigger_at_threshold_is_zero() {
        assert_eq!(normalize_trigger_axis(TRIGGER_THRESHOLD, TRIGGER_THRESHOLD), 0.0);
    }

    #[test]
    fn test_trigger_full_pull_is_one() {
        assert_eq!(normalize_trigger_axis(255, TRIGGER_THRESHOLD), 1.0);
        assert_eq!(normalize_trigger_axis(255, 0), 1.0);
    }

    #[test]
    fn test_trigger_max_threshold() {
        assert_eq!(normalize_trigger_axis(254, 255), 0.0);
        assert_eq!(normalize_trigger_axis(255, 255), 1.0);
    }

    #[test]
    fn test_trigger_is_monotonic() {
        let mut last = 0.0;
        for raw in 0..=255u8 {
            let value = normalize_trigger_axis(raw, TRIGGER_THRESHOLD);
            assert!(value >= last);
            assert!((0.0..=1.0).contains(&value));
            last = value;
        }
    }

    #[test]
    fn test_trigger_button_threshold_is_strict() {
        assert!(!trigger_pressed(128, TRIGGER_BUTTON_THRESHOLD));
        assert!(trigger_pressed(129, TRIGGER_BUTTON_THRESHOLD));
        assert!(!trigger_pressed(0, TRIGGER_BUTTON_THRESHOLD));
        assert!(trigger_pressed(255, TRIGGER_BUTTON_THRESHOLD));
    }

    // ==================== Axis Deadzone Tests ====================

    #[test]
    fn test_apply_deadzone_zero() {
        assert_eq!(apply_deadzone(0.0, DEFAULT_AXIS_DEADZONE), 0.0);
    }

    #[test]
    fn test_apply_deadzone_inside_is_zero() {
        for value in [0.01, 0.1, 0.149, -0.01, -0.1, -0.149] {
            assert_eq!(apply_deadzone(value, DEFAULT_AXIS_DEADZONE), 0.0);
        }
    }

    #[test]
    fn test_apply_deadzone_boundary_maps_to_zero() {
        assert_eq!(apply_deadzone(0.15, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.15, 0.15), 0.0);
    }

    #[test]
    fn test_apply_deadzone_preserves_endpoints() {
        assert_eq!(apply_deadzone(1.0, DEFAULT_AXIS_DEADZONE), 1.0);
        assert_eq!(apply_deadzone(-1.0, DEFAULT_AXIS_DEADZONE), -1.0);
    }

    #[test]
    fn test_apply_deadzone_rescales() {
        let value = apply_deadzone(0.575, 0.15);
        assert!((value - 0.5).abs() < 0.001);

        let value = apply_deadzone(-0.575, 0.15);
        assert!((value + 0.5).abs() < 0.001);
    }

    #[test]
    fn test_apply_deadzone_is_single_pass() {
        let once = apply_deadzone(0.5, 0.15);
        let twice = apply_deadzone(once, 0.15);
        assert!(twice < once);
    }

    #[test]
    fn test_apply_deadzone_nan_is_zero() {
        assert_eq!(apply_deadzone(f32::NAN, 0.15), 0.0);
    }

    #[test]
    fn test_apply_deadzone_full_deadzone() {
        assert_eq!(apply_deadzone(0.99, 1.0), 0.0);
        assert_eq!(apply_deadzone(1.0, 1.0), 1.0);
        assert_eq!(apply_deadzone(-1.0, 1.0), -1.0);
    }

    #[test]
    fn test_apply_deadzone_no_deadzone_is_identity() {
        for value in [-1.0, -0.5, 0.0, 0.25, 1.0] {
            assert_eq!(apply_deadzone(value, 0.0), value);
        }
    }

    // ==================== Combined Tests ====================

    #[test]
    fn test_both_stages_small_deflection_is_zero() {
        // Just outside the hardware deadzone but inside the axis deadzone
        let value = normalize_stick_axis(9000, LEFT_STICK_DEADZONE);
        assert!(value > 0.0);
        assert_eq!(apply_deadzone(value, DEFAULT_AXIS_DEADZONE), 0.0);
    }
}
