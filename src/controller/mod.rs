//! # Controller Module
//!
//! Per-frame gamepad state handling.
//!
//! This module handles:
//! - Normalizing raw stick and trigger values with layered deadzones
//! - Double-buffered frame snapshots and press/trigger/release edges
//! - Timed rumble requests
//! - Battery and capability translation

pub mod clock;
pub mod gamepad;
pub mod info;
pub mod normalize;
pub mod state;
pub mod tracker;
pub mod vibration;

pub use gamepad::GamepadController;
pub use state::{Button, FrameState};
pub use tracker::ControllerSettings;
