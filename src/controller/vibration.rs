//! # Vibration Module
//!
//! Time-bounded rumble requests.
//!
//! ## States
//!
//! ```text
//!          start()                 tick() past expiry
//!   Idle ──────────▶ Active ─────────────────────────▶ Idle
//!                     │  ▲              or stop()
//!                     └──┘ start() supersedes
//! ```
//!
//! A new request replaces the running one outright; intensities are never
//! summed or queued. Expiry is only checked in [`VibrationController::tick`],
//! so a host that stops ticking keeps the motors running.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::driver::PadDriver;

/// Full motor speed as understood by the driver.
pub const MOTOR_SPEED_MAX: u16 = u16::MAX;

/// Left/right intensities plus duration, in one value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VibrationSettings {
    /// Low-frequency (heavy) motor, 0.0 to 1.0.
    pub left_motor: f32,
    /// High-frequency (light) motor, 0.0 to 1.0.
    pub right_motor: f32,
    /// Duration in seconds.
    pub duration: f32,
}

/// A running rumble request.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VibrationRequest {
    left: f32,
    right: f32,
    /// `None` when the duration does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

/// Owns the current rumble request and its expiry.
#[derive(Debug, Clone, Default)]
pub struct VibrationController {
    request: Option<VibrationRequest>,
}

/// Clamps an intensity to 0.0..=1.0, treating NaN as 0.0.
fn clamp_intensity(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Converts a clamped intensity to a driver motor speed.
fn motor_speed(intensity: f32) -> u16 {
    (intensity * f32::from(MOTOR_SPEED_MAX)) as u16
}

impl VibrationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or replaces) a rumble request.
    ///
    /// Intensities are clamped to 0.0..=1.0. A zero or negative duration is
    /// accepted; the next [`tick`](Self::tick) ends it.
    pub fn start<D: PadDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        slot: u32,
        left: f32,
        right: f32,
        duration: f32,
        now: Instant,
    ) {
        let left = clamp_intensity(left);
        let right = clamp_intensity(right);

        if let Err(e) = driver.set_motor_speeds(slot, motor_speed(left), motor_speed(right)) {
            debug!("Failed to set motor speeds on slot {}: {}", slot, e);
        }

        let duration = Duration::try_from_secs_f32(duration.max(0.0)).ok();
        let expires_at = duration.and_then(|d| now.checked_add(d));

        info!(
            "Vibration started on slot {} (left {:.2}, right {:.2}, {:?})",
            slot, left, right, duration
        );

        self.request = Some(VibrationRequest {
            left,
            right,
            expires_at,
        });
    }

    /// Stops the motors. Always sends a 0/0 command, even when idle.
    pub fn stop<D: PadDriver + ?Sized>(&mut self, driver: &mut D, slot: u32) {
        if let Err(e) = driver.set_motor_speeds(slot, 0, 0) {
            debug!("Failed to stop motors on slot {}: {}", slot, e);
        }
        self.request = None;
    }

    /// Ends the request once `now` reaches its expiry.
    ///
    /// Returns `true` on the tick that stopped the motors.
    pub fn tick<D: PadDriver + ?Sized>(&mut self, driver: &mut D, slot: u32, now: Instant) -> bool {
        let expired = matches!(
            self.request,
            Some(VibrationRequest { expires_at: Some(at), .. }) if now >= at
        );
        if expired {
            debug!("Vibration on slot {} expired", slot);
            self.stop(driver, slot);
        }
        expired
    }

    #[must_use]
    pub fn is_vibrating(&self) -> bool {
        self.request.is_some()
    }

    /// Current (left, right) intensities; (0.0, 0.0) when idle.
    #[must_use]
    pub fn motor_speeds(&self) -> (f32, f32) {
        self.request.map_or((0.0, 0.0), |r| (r.left, r.right))
    }
}
