//! # Gamepad Controller Module
//!
//! [`GamepadController`] is the single public surface over the tracker,
//! the vibration controller and the driver. The host owns one instance per
//! controller it wants to follow and calls [`GamepadController::update`] once
//! per frame.
//!
//! ## Usage
//!
//! ```no_run
//! use padframe::controller::gamepad::GamepadController;
//! use padframe::controller::tracker::ControllerSettings;
//! use padframe::driver::evdev::EvdevDriver;
//!
//! let driver = EvdevDriver::new(4, 1000);
//! let mut pad = GamepadController::new(driver, ControllerSettings::default());
//!
//! if !pad.initialize() {
//!     println!("No controller yet, will keep looking");
//! }
//!
//! loop {
//!     pad.update();
//!     if pad.is_triggered_button_down() {
//!         pad.start_vibration(0.5, 0.2);
//!     }
//!     println!("{:.2} {:.2}", pad.left_stick_x(), pad.left_stick_y());
//! }
//! ```

use tracing::info;

use crate::controller::clock::{Clock, MonotonicClock};
use crate::controller::info::{BatteryInfo, Capabilities};
use crate::controller::state::{Button, FrameState};
use crate::controller::tracker::{ControllerSettings, StateTracker};
use crate::controller::vibration::{VibrationController, VibrationSettings};
use crate::driver::PadDriver;

/// Generates the `is_pressed_*` / `is_triggered_*` / `is_released_*` triple
/// for each named button.
macro_rules! button_accessors {
    ($($button:ident => $pressed:ident, $triggered:ident, $released:ident;)*) => {
        $(
            #[must_use]
            pub fn $pressed(&self) -> bool {
                self.tracker.is_pressed(Button::$button)
            }

            #[must_use]
            pub fn $triggered(&self) -> bool {
                self.tracker.is_triggered(Button::$button)
            }

            #[must_use]
            pub fn $released(&self) -> bool {
                self.tracker.is_released(Button::$button)
            }
        )*
    };
}

/// Frame-polled gamepad with edge detection and timed rumble.
pub struct GamepadController<D: PadDriver, C: Clock = MonotonicClock> {
    driver: D,
    clock: C,
    tracker: StateTracker,
    vibration: VibrationController,
}

impl<D: PadDriver> GamepadController<D, MonotonicClock> {
    /// Creates a controller using the system monotonic clock.
    #[must_use]
    pub fn new(driver: D, settings: ControllerSettings) -> Self {
        Self::with_clock(driver, settings, MonotonicClock)
    }
}

impl<D: PadDriver, C: Clock> GamepadController<D, C> {
    /// Creates a controller with an explicit time source.
    #[must_use]
    pub fn with_clock(driver: D, settings: ControllerSettings, clock: C) -> Self {
        Self {
            driver,
            clock,
            tracker: StateTracker::new(settings),
            vibration: VibrationController::new(),
        }
    }

    /// Stops any running rumble, resets all state and looks for the first
    /// connected device.
    ///
    /// Returns whether a device was found. Not finding one is fine:
    /// [`update`](Self::update) keeps scanning.
    pub fn initialize(&mut self) -> bool {
        if self.vibration.is_vibrating() {
            self.stop_vibration();
        }
        self.tracker.reset();
        self.vibration = VibrationController::new();

        match self.tracker.scan(&mut self.driver) {
            Some(slot) => {
                info!("Controller found at slot {}", slot);
                true
            }
            None => {
                info!("No controller connected, waiting");
                false
            }
        }
    }

    /// Advances one frame: polls the device, then checks the rumble timer.
    ///
    /// Returns whether a device answered this frame.
    pub fn update(&mut self) -> bool {
        let connected = self.tracker.update(&mut self.driver);
        let now = self.clock.now();
        self.vibration
            .tick(&mut self.driver, self.tracker.active_slot(), now);
        connected
    }

    /// Stops any rumble and resets both snapshots.
    pub fn finalize(&mut self) {
        self.stop_vibration();
        self.tracker.reset();
    }

    // ==================== State ====================

    #[must_use]
    pub fn current_state(&self) -> &FrameState {
        self.tracker.current()
    }

    #[must_use]
    pub fn previous_state(&self) -> &FrameState {
        self.tracker.previous()
    }

    #[must_use]
    pub fn active_slot(&self) -> u32 {
        self.tracker.active_slot()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.tracker.current().connected
    }

    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        self.tracker.settings()
    }

    pub fn set_settings(&mut self, settings: ControllerSettings) {
        self.tracker.set_settings(settings);
    }

    // ==================== Buttons ====================

    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.tracker.is_pressed(button)
    }

    #[must_use]
    pub fn is_triggered(&self, button: Button) -> bool {
        self.tracker.is_triggered(button)
    }

    #[must_use]
    pub fn is_released(&self, button: Button) -> bool {
        self.tracker.is_released(button)
    }

    #[must_use]
    pub fn is_any_button_pressed(&self) -> bool {
        self.tracker.is_any_button_pressed()
    }

    button_accessors! {
        DpadUp => is_pressed_dpad_up, is_triggered_dpad_up, is_released_dpad_up;
        DpadDown => is_pressed_dpad_down, is_triggered_dpad_down, is_released_dpad_down;
        DpadLeft => is_pressed_dpad_left, is_triggered_dpad_left, is_released_dpad_left;
        DpadRight => is_pressed_dpad_right, is_triggered_dpad_right, is_released_dpad_right;
        FaceDown => is_pressed_button_down, is_triggered_button_down, is_released_button_down;
        FaceRight => is_pressed_button_right, is_triggered_button_right, is_released_button_right;
        FaceLeft => is_pressed_button_left, is_triggered_button_left, is_released_button_left;
        FaceUp => is_pressed_button_up, is_triggered_button_up, is_released_button_up;
        L1 => is_pressed_l1, is_triggered_l1, is_released_l1;
        R1 => is_pressed_r1, is_triggered_r1, is_released_r1;
        L2 => is_pressed_l2, is_triggered_l2, is_released_l2;
        R2 => is_pressed_r2, is_triggered_r2, is_released_r2;
        L3 => is_pressed_l3, is_triggered_l3, is_released_l3;
        R3 => is_pressed_r3, is_triggered_r3, is_released_r3;
        Start => is_pressed_start, is_triggered_start, is_released_start;
        Select => is_pressed_select, is_triggered_select, is_released_select;
    }

    // ==================== Analog ====================

    #[must_use]
    pub fn left_stick_x(&self) -> f32 {
        self.tracker.current().left_stick_x
    }

    #[must_use]
    pub fn left_stick_y(&self) -> f32 {
        self.tracker.current().left_stick_y
    }

    #[must_use]
    pub fn right_stick_x(&self) -> f32 {
        self.tracker.current().right_stick_x
    }

    #[must_use]
    pub fn right_stick_y(&self) -> f32 {
        self.tracker.current().right_stick_y
    }

    #[must_use]
    pub fn left_trigger(&self) -> f32 {
        self.tracker.current().left_trigger
    }

    #[must_use]
    pub fn right_trigger(&self) -> f32 {
        self.tracker.current().right_trigger
    }

    // ==================== Vibration ====================

    /// Rumbles both motors at `intensity` for `duration` seconds.
    pub fn start_vibration(&mut self, intensity: f32, duration: f32) {
        self.start_vibration_ex(intensity, intensity, duration);
    }

    /// Rumbles each motor at its own intensity for `duration` seconds.
    pub fn start_vibration_ex(&mut self, left: f32, right: f32, duration: f32) {
        let now = self.clock.now();
        let slot = self.tracker.active_slot();
        self.vibration
            .start(&mut self.driver, slot, left, right, duration, now);
    }

    pub fn start_vibration_with(&mut self, settings: &VibrationSettings) {
        self.start_vibration_ex(settings.left_motor, settings.right_motor, settings.duration);
    }

    pub fn stop_vibration(&mut self) {
        let slot = self.tracker.active_slot();
        self.vibration.stop(&mut self.driver, slot);
    }

    #[must_use]
    pub fn is_vibrating(&self) -> bool {
        self.vibration.is_vibrating()
    }

    /// Current (left, right) motor intensities.
    #[must_use]
    pub fn motor_speeds(&self) -> (f32, f32) {
        self.vibration.motor_speeds()
    }

    // ==================== Queries ====================

    /// Battery state of the active device, queried now.
    pub fn battery_info(&mut self) -> BatteryInfo {
        let slot = self.tracker.active_slot();
        BatteryInfo::from_query(self.driver.query_battery(slot))
    }

    /// Capabilities of the active device, queried now.
    pub fn capabilities(&mut self) -> Capabilities {
        let slot = self.tracker.active_slot();
        Capabilities::from_query(self.driver.query_capabilities(slot))
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
