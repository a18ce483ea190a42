//! # Frame State Module
//!
//! A [`FrameState`] is the normalized snapshot of one polled frame: every
//! digital input as a named flag, the four stick axes, the two triggers and
//! the connectivity flag.
//!
//! ## Ranges
//!
//! | Field | Range | Notes |
//! |-------|-------|-------|
//! | Stick X | -1.0..=1.0 | Right is positive |
//! | Stick Y | -1.0..=1.0 | Down is positive (screen space) |
//! | Trigger | 0.0..=1.0 | 0.0 = released |
//!
//! ## Buttons
//!
//! Face buttons are named by position rather than by vendor glyph:
//!
//! | Button | Xbox | PlayStation |
//! |--------|------|-------------|
//! | `FaceDown` | A | Cross (×) |
//! | `FaceRight` | B | Circle (○) |
//! | `FaceLeft` | X | Square (□) |
//! | `FaceUp` | Y | Triangle (△) |
//!
//! `L2`/`R2` are the triggers read as buttons, pressed once pulled past half.

use crate::driver::buttons;

/// Every digital input tracked per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    FaceDown,
    FaceRight,
    FaceLeft,
    FaceUp,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Start,
    Select,
}

impl Button {
    /// All buttons, in display order.
    pub const ALL: [Button; 16] = [
        Button::FaceDown,
        Button::FaceRight,
        Button::FaceLeft,
        Button::FaceUp,
        Button::L1,
        Button::R1,
        Button::L2,
        Button::R2,
        Button::L3,
        Button::R3,
        Button::Start,
        Button::Select,
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
    ];

    /// Bit in [`RawReading::buttons`](crate::driver::RawReading::buttons).
    ///
    /// `None` for `L2`/`R2`, which are derived from the analog triggers.
    #[must_use]
    pub fn raw_mask(self) -> Option<u16> {
        match self {
            Button::DpadUp => Some(buttons::DPAD_UP),
            Button::DpadDown => Some(buttons::DPAD_DOWN),
            Button::DpadLeft => Some(buttons::DPAD_LEFT),
            Button::DpadRight => Some(buttons::DPAD_RIGHT),
            Button::FaceDown => Some(buttons::A),
            Button::FaceRight => Some(buttons::B),
            Button::FaceLeft => Some(buttons::X),
            Button::FaceUp => Some(buttons::Y),
            Button::L1 => Some(buttons::LEFT_SHOULDER),
            Button::R1 => Some(buttons::RIGHT_SHOULDER),
            Button::L2 | Button::R2 => None,
            Button::L3 => Some(buttons::LEFT_THUMB),
            Button::R3 => Some(buttons::RIGHT_THUMB),
            Button::Start => Some(buttons::START),
            Button::Select => Some(buttons::BACK),
        }
    }

    /// Short label used by the text display and event line.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Button::DpadUp => "U",
            Button::DpadDown => "D",
            Button::DpadLeft => "L",
            Button::DpadRight => "R",
            Button::FaceDown => "A",
            Button::FaceRight => "B",
            Button::FaceLeft => "X",
            Button::FaceUp => "Y",
            Button::L1 => "LB",
            Button::R1 => "RB",
            Button::L2 => "LT",
            Button::R2 => "RT",
            Button::L3 => "LS",
            Button::R3 => "RS",
            Button::Start => "START",
            Button::Select => "BACK",
        }
    }
}

/// Normalized controller state for a single frame.
///
/// `Default` is the all-released, centred, disconnected state, which is also
/// the implicit previous frame before the first update.
///
/// # Examples
///
/// ```
/// use padframe::controller::state::{Button, FrameState};
///
/// let mut state = FrameState::default();
/// assert!(!state.any_button_pressed());
///
/// state.set_button(Button::FaceDown, true);
/// assert!(state.button_down);
/// assert!(state.any_button_pressed());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    // Sticks (-1.0..=1.0)
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,

    // Triggers (0.0..=1.0)
    pub left_trigger: f32,
    pub right_trigger: f32,

    // D-Pad
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    // Face buttons, by position
    /// A / Cross.
    pub button_down: bool,
    /// B / Circle.
    pub button_right: bool,
    /// X / Square.
    pub button_left: bool,
    /// Y / Triangle.
    pub button_up: bool,

    // Shoulders
    pub button_l1: bool,
    pub button_r1: bool,
    /// Left trigger read as a button.
    pub button_l2: bool,
    /// Right trigger read as a button.
    pub button_r2: bool,

    // Stick clicks
    pub button_l3: bool,
    pub button_r3: bool,

    // System
    pub button_start: bool,
    pub button_select: bool,

    /// Whether the last poll reached a device.
    pub connected: bool,
}

impl FrameState {
    /// Creates a released, centred, disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flag for `button`.
    #[must_use]
    pub fn button(&self, button: Button) -> bool {
        match button {
            Button::DpadUp => self.dpad_up,
            Button::DpadDown => self.dpad_down,
            Button::DpadLeft => self.dpad_left,
            Button::DpadRight => self.dpad_right,
            Button::FaceDown => self.button_down,
            Button::FaceRight => self.button_right,
            Button::FaceLeft => self.button_left,
            Button::FaceUp => self.button_up,
            Button::L1 => self.button_l1,
            Button::R1 => self.button_r1,
            Button::L2 => self.button_l2,
            Button::R2 => self.button_r2,
            Button::L3 => self.button_l3,
            Button::R3 => self.button_r3,
            Button::Start => self.button_start,
            Button::Select => self.button_select,
        }
    }

    /// Sets the flag for `button`.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let flag = match button {
            Button::DpadUp => &mut self.dpad_up,
            Button::DpadDown => &mut self.dpad_down,
            Button::DpadLeft => &mut self.dpad_left,
            Button::DpadRight => &mut self.dpad_right,
            Button::FaceDown => &mut self.button_down,
            Button::FaceRight => &mut self.button_right,
            Button::FaceLeft => &mut self.button_left,
            Button::FaceUp => &mut self.button_up,
            Button::L1 => &mut self.button_l1,
            Button::R1 => &mut self.button_r1,
            Button::L2 => &mut self.button_l2,
            Button::R2 => &mut self.button_r2,
            Button::L3 => &mut self.button_l3,
            Button::R3 => &mut self.button_r3,
            Button::Start => &mut self.button_start,
            Button::Select => &mut self.button_select,
        };
        *flag = pressed;
    }

    /// Checks if any digital input is pressed.
    ///
    /// Sticks and analog trigger values do not count; the L2/R2 button flags
    /// do.
    #[must_use]
    pub fn any_button_pressed(&self) -> bool {
        Button::ALL.iter().any(|&button| self.button(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_state_default() {
        let state = FrameState::default();

        assert_eq!(state.left_stick_x, 0.0);
        assert_eq!(state.left_stick_y, 0.0);
        assert_eq!(state.right_stick_x, 0.0);
        assert_eq!(state.right_stick_y, 0.0);
        assert_eq!(state.left_trigger, 0.0);
        assert_eq!(state.right_trigger, 0.0);
        assert!(!state.connected);

        for button in Button::ALL {
            assert!(!state.button(button), "{:?} should be released", button);
        }
    }

    #[test]
    fn test_frame_state_new() {
        assert_eq!(FrameState::new(), FrameState::default());
    }

    #[test]
    fn test_set_button_only_touches_one_flag() {
        for button in Button::ALL {
            let mut state = FrameState::default();
            state.set_button(button, true);
            for other in Button::ALL {
                assert_eq!(state.button(other), other == button, "{:?} / {:?}", button, other);
            }
        }
    }

    #[test]
    fn test_set_button_named_fields() {
        let mut state = FrameState::default();
        state.set_button(Button::FaceDown, true);
        state.set_button(Button::Select, true);
        state.set_button(Button::DpadLeft, true);
        assert!(state.button_down);
        assert!(state.button_select);
        assert!(state.dpad_left);
    }

    #[test]
    fn test_any_button_pressed_each_button() {
        for button in Button::ALL {
            let mut state = FrameState::default();
            state.set_button(button, true);
            assert!(state.any_button_pressed(), "Button {:?} should register", button);
        }
    }

    #[test]
    fn test_any_button_pressed_ignores_analog() {
        let mut state = FrameState::default();
        state.left_stick_x = 1.0;
        state.right_stick_y = -1.0;
        state.left_trigger = 0.4;
        state.right_trigger = 1.0;
        state.connected = true;
        assert!(!state.any_button_pressed());
    }

    #[test]
    fn test_button_all_is_unique() {
        for (i, a) in Button::ALL.iter().enumerate() {
            for b in &Button::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_raw_masks_are_distinct() {
        let mut seen = 0u16;
        for button in Button::ALL {
            if let Some(mask) = button.raw_mask() {
                assert_eq!(seen & mask, 0, "{:?} reuses a bit", button);
                seen |= mask;
            }
        }
        assert!(Button::L2.raw_mask().is_none());
        assert!(Button::R2.raw_mask().is_none());
    }
}
