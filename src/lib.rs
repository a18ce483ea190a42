//! # padframe Library
//!
//! Frame-polled gamepad input with deadzone normalization, edge detection
//! and timed rumble.
//!
//! The host calls [`GamepadController::update`](controller::GamepadController::update)
//! once per frame. Each call polls the platform driver, normalizes sticks and
//! triggers into floating-point ranges, keeps the previous frame for
//! press/release edges and ends expired rumble requests.

pub mod config;
pub mod controller;
pub mod display;
pub mod driver;
pub mod error;
