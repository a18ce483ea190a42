//! # State Tracker Module
//!
//! Owns the double-buffered [`FrameState`] pair and the active device slot.
//!
//! Each [`StateTracker::update`] copies the current snapshot into the
//! previous one, polls the driver and rebuilds the current snapshot. Edge
//! queries (`is_triggered`, `is_released`) compare the two snapshots on
//! demand, so they stay consistent no matter how often they are asked within
//! a frame.
//!
//! ## Usage
//!
//! ```no_run
//! use padframe::controller::state::Button;
//! use padframe::controller::tracker::{ControllerSettings, StateTracker};
//! use padframe::driver::evdev::EvdevDriver;
//!
//! let mut driver = EvdevDriver::new(4, 1000);
//! let mut tracker = StateTracker::new(ControllerSettings::default());
//!
//! loop {
//!     tracker.update(&mut driver);
//!     if tracker.is_triggered(Button::FaceDown) {
//!         println!("jump");
//!     }
//! }
//! ```

use tracing::{debug, info, warn};

use crate::controller::normalize::{
    apply_deadzone, normalize_stick_axis, normalize_trigger_axis, trigger_pressed,
    DEFAULT_AXIS_DEADZONE, LEFT_STICK_DEADZONE, RIGHT_STICK_DEADZONE, TRIGGER_BUTTON_THRESHOLD,
    TRIGGER_THRESHOLD,
};
use crate::controller::state::{Button, FrameState};
use crate::driver::{PadDriver, RawReading};

/// Normalization parameters applied on every poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Hardware deadzone for the left stick (raw units).
    pub left_stick_deadzone: i16,
    /// Hardware deadzone for the right stick (raw units).
    pub right_stick_deadzone: i16,
    /// Analog trigger threshold (raw units).
    pub trigger_threshold: u8,
    /// Raw value a trigger must exceed to count as pressed.
    pub trigger_button_threshold: u8,
    /// Secondary deadzone applied to normalized stick axes.
    pub axis_deadzone: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            left_stick_deadzone: LEFT_STICK_DEADZONE,
            right_stick_deadzone: RIGHT_STICK_DEADZONE,
            trigger_threshold: TRIGGER_THRESHOLD,
            trigger_button_threshold: TRIGGER_BUTTON_THRESHOLD,
            axis_deadzone: DEFAULT_AXIS_DEADZONE,
        }
    }
}

/// Double-buffered controller state with edge detection.
///
/// # Thread Safety
///
/// `StateTracker` is not thread-safe. Use from a single thread only.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: FrameState,
    previous: FrameState,
    active_slot: u32,
    settings: ControllerSettings,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl StateTracker {
    /// Creates a tracker with both snapshots at their default and slot 0 active.
    #[must_use]
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            current: FrameState::default(),
            previous: FrameState::default(),
            active_slot: 0,
            settings,
        }
    }

    /// Snapshot of the latest frame.
    #[must_use]
    pub fn current(&self) -> &FrameState {
        &self.current
    }

    /// Snapshot of the frame before the latest one.
    #[must_use]
    pub fn previous(&self) -> &FrameState {
        &self.previous
    }

    /// Slot currently polled first.
    #[must_use]
    pub fn active_slot(&self) -> u32 {
        self.active_slot
    }

    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Replaces the normalization parameters; takes effect on the next update.
    pub fn set_settings(&mut self, settings: ControllerSettings) {
        self.settings = settings;
    }

    /// Resets both snapshots to default. The active slot is kept.
    pub fn reset(&mut self) {
        self.current = FrameState::default();
        self.previous = FrameState::default();
    }

    /// Scans every slot in ascending order and adopts the first that answers.
    ///
    /// Returns the adopted slot, or `None` if no device responded. The
    /// active slot is left unchanged in that case.
    pub fn scan<D: PadDriver + ?Sized>(&mut self, driver: &mut D) -> Option<u32> {
        let (slot, _) = self.find_device(driver)?;
        self.adopt(slot);
        Some(slot)
    }

    /// Advances one frame.
    ///
    /// Copies the current snapshot into the previous one, then polls the
    /// active slot. If that fails, every slot is scanned and the first one
    /// answering becomes active. When that is a different slot, its first
    /// frame is compared against a released baseline. If nothing answers,
    /// only the connectivity flag of the current snapshot changes and `false`
    /// is returned.
    pub fn update<D: PadDriver + ?Sized>(&mut self, driver: &mut D) -> bool {
        self.previous = self.current;

        let raw = match driver.poll_raw_state(self.active_slot) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Poll of slot {} failed: {}", self.active_slot, e);
                match self.find_device(driver) {
                    Some((slot, raw)) => {
                        if slot != self.active_slot {
                            // The lost device's last frame says nothing about this one
                            self.previous = FrameState::default();
                        }
                        self.adopt(slot);
                        raw
                    }
                    None => {
                        if self.current.connected {
                            warn!("Controller at slot {} disconnected", self.active_slot);
                        }
                        self.current.connected = false;
                        return false;
                    }
                }
            }
        };

        self.apply(&raw);
        true
    }

    /// Whether `button` is held in the current frame.
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.current.button(button)
    }

    /// Whether `button` went down this frame.
    #[must_use]
    pub fn is_triggered(&self, button: Button) -> bool {
        self.current.button(button) && !self.previous.button(button)
    }

    /// Whether `button` went up this frame.
    #[must_use]
    pub fn is_released(&self, button: Button) -> bool {
        !self.current.button(button) && self.previous.button(button)
    }

    /// Whether any digital input is held in the current frame.
    #[must_use]
    pub fn is_any_button_pressed(&self) -> bool {
        self.current.any_button_pressed()
    }

    fn find_device<D: PadDriver + ?Sized>(&self, driver: &mut D) -> Option<(u32, RawReading)> {
        (0..driver.max_slots()).find_map(|slot| match driver.poll_raw_state(slot) {
            Ok(raw) => Some((slot, raw)),
            Err(e) => {
                debug!("Slot {}: {}", slot, e);
                None
            }
        })
    }

    fn adopt(&mut self, slot: u32) {
        if slot != self.active_slot || !self.current.connected {
            info!("Using controller at slot {}", slot);
        }
        self.active_slot = slot;
    }

    /// Rebuilds the current snapshot from a raw reading.
    fn apply(&mut self, raw: &RawReading) {
        let s = &self.settings;
        let mut state = FrameState {
            connected: true,
            ..FrameState::default()
        };

        for button in Button::ALL {
            if let Some(mask) = button.raw_mask() {
                state.set_button(button, raw.buttons & mask != 0);
            }
        }

        state.left_trigger = normalize_trigger_axis(raw.left_trigger, s.trigger_threshold);
        state.right_trigger = normalize_trigger_axis(raw.right_trigger, s.trigger_threshold);
        state.button_l2 = trigger_pressed(raw.left_trigger, s.trigger_button_threshold);
        state.button_r2 = trigger_pressed(raw.right_trigger, s.trigger_button_threshold);

        // Y is flipped: hardware reports up as positive, frames use down as positive
        let left_x = normalize_stick_axis(raw.thumb_lx, s.left_stick_deadzone);
        let left_y = normalize_stick_axis(raw.thumb_ly, s.left_stick_deadzone);
        let right_x = normalize_stick_axis(raw.thumb_rx, s.right_stick_deadzone);
        let right_y = normalize_stick_axis(raw.thumb_ry, s.right_stick_deadzone);

        state.left_stick_x = apply_deadzone(left_x, s.axis_deadzone);
        state.left_stick_y = apply_deadzone(-left_y, s.axis_deadzone);
        state.right_stick_x = apply_deadzone(right_x, s.axis_deadzone);
        state.right_stick_y = apply_deadzone(-right_y, s.axis_deadzone);

        self.current = state;
    }
}
