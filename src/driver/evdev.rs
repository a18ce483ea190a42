//! # Linux evdev Driver
//!
//! [`PadDriver`] implementation over `/dev/input/event*` devices.
//!
//! ## Device Detection
//!
//! Any event device advertising `BTN_SOUTH` is treated as a gamepad. Devices
//! are sorted by path and assigned to the first free slots; a device keeps
//! its slot until a read fails.
//!
//! ## Input Mapping
//!
//! | Control | evdev Code | Raw field |
//! |---------|------------|-----------|
//! | Left stick | ABS_X / ABS_Y | `thumb_lx` / `thumb_ly` |
//! | Right stick | ABS_RX / ABS_RY | `thumb_rx` / `thumb_ry` |
//! | Left trigger | ABS_Z (or BTN_TL2) | `left_trigger` |
//! | Right trigger | ABS_RZ (or BTN_TR2) | `right_trigger` |
//! | D-Pad | ABS_HAT0X / ABS_HAT0Y or BTN_DPAD_* | `DPAD_*` bits |
//!
//! evdev reports Y axes with down positive, so they are flipped to the
//! up-positive raw convention here.
//!
//! ## Rumble
//!
//! Motor speeds are sent as an `FF_RUMBLE` effect (left = strong,
//! right = weak). A 0/0 command stops and removes the effect.

use evdev::{
    AbsoluteAxisType, BusType, Device, FFEffect, FFEffectData, FFEffectKind, FFEffectType,
    FFReplay, FFTrigger, Key,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    buttons, caps, BatteryKind, BatteryLevel, PadDriver, RawBattery, RawCapabilities, RawReading,
    DEVTYPE_GAMEPAD,
};
use crate::error::{PadError, Result};

/// Digital keys and the raw button bit they set.
const KEY_MAP: [(Key, u16); 14] = [
    (Key::BTN_SOUTH, buttons::A),
    (Key::BTN_EAST, buttons::B),
    (Key::BTN_WEST, buttons::X),
    (Key::BTN_NORTH, buttons::Y),
    (Key::BTN_TL, buttons::LEFT_SHOULDER),
    (Key::BTN_TR, buttons::RIGHT_SHOULDER),
    (Key::BTN_THUMBL, buttons::LEFT_THUMB),
    (Key::BTN_THUMBR, buttons::RIGHT_THUMB),
    (Key::BTN_START, buttons::START),
    (Key::BTN_SELECT, buttons::BACK),
    (Key::BTN_DPAD_UP, buttons::DPAD_UP),
    (Key::BTN_DPAD_DOWN, buttons::DPAD_DOWN),
    (Key::BTN_DPAD_LEFT, buttons::DPAD_LEFT),
    (Key::BTN_DPAD_RIGHT, buttons::DPAD_RIGHT),
];

/// Maps an absolute axis value to the signed 16-bit stick range.
///
/// The midpoint of `min..=max` maps to 0. With `invert`, the direction is
/// flipped (used for evdev's down-positive Y axes).
#[must_use]
pub fn scale_stick(value: i32, min: i32, max: i32, invert: bool) -> i16 {
    if max <= min {
        return 0;
    }
    let center = (f64::from(min) + f64::from(max)) / 2.0;
    let half = (f64::from(max) - f64::from(min)) / 2.0;
    let mut normalized = ((f64::from(value) - center) / half).clamp(-1.0, 1.0);
    if invert {
        normalized = -normalized;
    }
    (normalized * f64::from(i16::MAX)).round() as i16
}

/// Maps an absolute axis value to the unsigned 8-bit trigger range.
#[must_use]
pub fn scale_trigger(value: i32, min: i32, max: i32) -> u8 {
    if max <= min {
        return 0;
    }
    let normalized = ((f64::from(value) - f64::from(min)) / (f64::from(max) - f64::from(min)))
        .clamp(0.0, 1.0);
    (normalized * f64::from(u8::MAX)).round() as u8
}

/// Converts a hat axis value (-1/0/1) into the pair of d-pad bits.
fn hat_bits(value: i32, negative: u16, positive: u16) -> u16 {
    match value.signum() {
        -1 => negative,
        1 => positive,
        _ => 0,
    }
}

/// An opened gamepad held in a slot.
struct EvdevPad {
    device: Device,
    path: PathBuf,
    rumble: Option<FFEffect>,
}

impl EvdevPad {
    fn supports_axis(&self, axis: AbsoluteAxisType) -> bool {
        self.device
            .supported_absolute_axes()
            .map_or(false, |axes| axes.contains(axis))
    }

    fn supports_key(&self, key: Key) -> bool {
        self.device
            .supported_keys()
            .map_or(false, |keys| keys.contains(key))
    }

    fn read(&self) -> std::io::Result<RawReading> {
        let keys = self.device.get_key_state()?;
        let abs = self.device.get_abs_state()?;

        let mut raw = RawReading::default();
        for (key, mask) in KEY_MAP {
            if keys.contains(key) {
                raw.buttons |= mask;
            }
        }

        let stick = |axis: AbsoluteAxisType, invert: bool| -> i16 {
            if !self.supports_axis(axis) {
                return 0;
            }
            let info = &abs[axis.0 as usize];
            scale_stick(info.value, info.minimum, info.maximum, invert)
        };
        raw.thumb_lx = stick(AbsoluteAxisType::ABS_X, false);
        raw.thumb_ly = stick(AbsoluteAxisType::ABS_Y, true);
        raw.thumb_rx = stick(AbsoluteAxisType::ABS_RX, false);
        raw.thumb_ry = stick(AbsoluteAxisType::ABS_RY, true);

        let trigger = |axis: AbsoluteAxisType, button: Key| -> u8 {
            if self.supports_axis(axis) {
                let info = &abs[axis.0 as usize];
                scale_trigger(info.value, info.minimum, info.maximum)
            } else if keys.contains(button) {
                u8::MAX
            } else {
                0
            }
        };
        raw.left_trigger = trigger(AbsoluteAxisType::ABS_Z, Key::BTN_TL2);
        raw.right_trigger = trigger(AbsoluteAxisType::ABS_RZ, Key::BTN_TR2);

        if self.supports_axis(AbsoluteAxisType::ABS_HAT0X) {
            let x = abs[AbsoluteAxisType::ABS_HAT0X.0 as usize].value;
            let y = abs[AbsoluteAxisType::ABS_HAT0Y.0 as usize].value;
            raw.buttons |= hat_bits(x, buttons::DPAD_LEFT, buttons::DPAD_RIGHT);
            raw.buttons |= hat_bits(y, buttons::DPAD_UP, buttons::DPAD_DOWN);
        }

        Ok(raw)
    }

    fn set_rumble(&mut self, strong: u16, weak: u16) -> std::io::Result<()> {
        if strong == 0 && weak == 0 {
            if let Some(mut effect) = self.rumble.take() {
                effect.stop()?;
            }
            return Ok(());
        }

        let data = FFEffectData {
            direction: 0,
            trigger: FFTrigger {
                button: 0,
                interval: 0,
            },
            // Length 0 plays until stopped; expiry is handled by the caller
            replay: FFReplay {
                length: 0,
                delay: 0,
            },
            kind: FFEffectKind::Rumble {
                strong_magnitude: strong,
                weak_magnitude: weak,
            },
        };

        // Dropping the old effect removes it from the device
        self.rumble = None;
        let mut effect = self.device.upload_ff_effect(data)?;
        effect.play(1)?;
        self.rumble = Some(effect);
        Ok(())
    }
}

/// evdev-backed driver with a fixed number of slots.
pub struct EvdevDriver {
    slots: Vec<Option<EvdevPad>>,
    rescan_interval: Duration,
    last_scan: Option<Instant>,
}

impl std::fmt::Debug for EvdevDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<_> = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(|pad| pad.path.display().to_string()))
            .collect();
        f.debug_struct("EvdevDriver")
            .field("slots", &paths)
            .field("rescan_interval", &self.rescan_interval)
            .finish_non_exhaustive()
    }
}

impl EvdevDriver {
    /// Creates a driver with `max_slots` slots and scans for gamepads.
    ///
    /// Empty slots are re-scanned at most once per `rescan_interval_ms`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padframe::driver::evdev::EvdevDriver;
    ///
    /// let driver = EvdevDriver::new(4, 1000);
    /// println!("{:?}", driver);
    /// ```
    #[must_use]
    pub fn new(max_slots: u32, rescan_interval_ms: u64) -> Self {
        let mut driver = Self {
            slots: (0..max_slots).map(|_| None).collect(),
            rescan_interval: Duration::from_millis(rescan_interval_ms),
            last_scan: None,
        };
        driver.rescan();
        driver
    }

    /// Device path held by a slot, if any.
    #[must_use]
    pub fn device_path(&self, slot: u32) -> Option<&std::path::Path> {
        self.slots
            .get(slot as usize)
            .and_then(|pad| pad.as_ref())
            .map(|pad| pad.path.as_path())
    }

    /// Assigns newly found gamepads to free slots.
    pub fn rescan(&mut self) {
        self.last_scan = Some(Instant::now());

        let mut found: Vec<(PathBuf, Device)> = evdev::enumerate()
            .filter(|(path, device)| {
                let is_pad = device
                    .supported_keys()
                    .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));
                debug!(
                    "Found input device: {} ({}), gamepad: {}",
                    path.display(),
                    device.name().unwrap_or("unnamed"),
                    is_pad
                );
                is_pad
            })
            .filter(|(path, _)| {
                !self
                    .slots
                    .iter()
                    .flatten()
                    .any(|pad| &pad.path == path)
            })
            .collect();

        // Sort for deterministic slot assignment
        found.sort_by(|a, b| a.0.cmp(&b.0));

        let mut found = found.into_iter();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let Some((path, device)) = found.next() else {
                break;
            };
            info!(
                "Gamepad {} at {} assigned to slot {}",
                device.name().unwrap_or("unnamed"),
                path.display(),
                index
            );
            *slot = Some(EvdevPad {
                device,
                path,
                rumble: None,
            });
        }
    }

    fn rescan_due(&self) -> bool {
        self.last_scan
            .map_or(true, |at| at.elapsed() >= self.rescan_interval)
    }

    fn pad_mut(&mut self, slot: u32) -> Result<&mut EvdevPad> {
        self.slots
            .get_mut(slot as usize)
            .and_then(|pad| pad.as_mut())
            .ok_or(PadError::DeviceNotConnected(slot))
    }

    fn drop_slot(&mut self, slot: u32, error: &std::io::Error) {
        if let Some(pad) = self.slots.get_mut(slot as usize).and_then(Option::take) {
            warn!("Lost gamepad at {} (slot {}): {}", pad.path.display(), slot, error);
        }
    }
}

impl PadDriver for EvdevDriver {
    fn max_slots(&self) -> u32 {
        self.slots.len() as u32
    }

    fn poll_raw_state(&mut self, slot: u32) -> Result<RawReading> {
        if slot as usize >= self.slots.len() {
            return Err(PadError::DeviceNotConnected(slot));
        }
        if self.slots[slot as usize].is_none() && self.rescan_due() {
            self.rescan();
        }

        let result = self.pad_mut(slot)?.read();
        result.map_err(|e| {
            self.drop_slot(slot, &e);
            PadError::DeviceNotConnected(slot)
        })
    }

    fn set_motor_speeds(&mut self, slot: u32, left: u16, right: u16) -> Result<()> {
        let pad = self.pad_mut(slot)?;
        if !pad
            .device
            .supported_ff()
            .map_or(false, |ff| ff.contains(FFEffectType::FF_RUMBLE))
        {
            return Err(PadError::Unsupported(format!(
                "{} has no rumble support",
                pad.path.display()
            )));
        }

        pad.set_rumble(left, right)
            .map_err(|e| PadError::Driver(format!("Failed to set rumble: {}", e)))
    }

    fn query_battery(&mut self, slot: u32) -> Result<RawBattery> {
        let pad = self.pad_mut(slot)?;
        // evdev exposes no charge level; only the bus tells wired from wireless
        let kind = if pad.device.input_id().bus_type() == BusType::BUS_USB {
            BatteryKind::Wired
        } else {
            BatteryKind::Unknown
        };
        Ok(RawBattery {
            kind,
            level: BatteryLevel::Full,
        })
    }

    fn query_capabilities(&mut self, slot: u32) -> Result<RawCapabilities> {
        let pad = self.pad_mut(slot)?;

        let mut flags = 0;
        if pad
            .device
            .supported_ff()
            .map_or(false, |ff| ff.contains(FFEffectType::FF_RUMBLE))
        {
            flags |= caps::FFB_SUPPORTED;
        }
        if pad.device.input_id().bus_type() == BusType::BUS_BLUETOOTH {
            flags |= caps::WIRELESS;
        }

        let mut gamepad = RawReading::default();
        for (key, mask) in KEY_MAP {
            if pad.supports_key(key) {
                gamepad.buttons |= mask;
            }
        }
        if pad.supports_axis(AbsoluteAxisType::ABS_HAT0X) {
            gamepad.buttons |=
                buttons::DPAD_UP | buttons::DPAD_DOWN | buttons::DPAD_LEFT | buttons::DPAD_RIGHT;
        }

        let stick_max = |axis| if pad.supports_axis(axis) { i16::MAX } else { 0 };
        gamepad.thumb_lx = stick_max(AbsoluteAxisType::ABS_X);
        gamepad.thumb_ly = stick_max(AbsoluteAxisType::ABS_Y);
        gamepad.thumb_rx = stick_max(AbsoluteAxisType::ABS_RX);
        gamepad.thumb_ry = stick_max(AbsoluteAxisType::ABS_RY);

        let trigger_max = |axis, key| {
            if pad.supports_axis(axis) || pad.supports_key(key) {
                u8::MAX
            } else {
                0
            }
        };
        gamepad.left_trigger = trigger_max(AbsoluteAxisType::ABS_Z, Key::BTN_TL2);
        gamepad.right_trigger = trigger_max(AbsoluteAxisType::ABS_RZ, Key::BTN_TR2);

        Ok(RawCapabilities {
            device_type: DEVTYPE_GAMEPAD,
            flags,
            gamepad,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_stick_dualsense_range() {
        assert_eq!(scale_stick(0, 0, 255, false), i16::MIN + 1);
        assert_eq!(scale_stick(255, 0, 255, false), i16::MAX);
        assert!(scale_stick(128, 0, 255, false).abs() < 200);
    }

    #[test]
    fn test_scale_stick_xbox_range() {
        assert_eq!(scale_stick(-32768, -32768, 32767, false), -32767);
        assert_eq!(scale_stick(32767, -32768, 32767, false), 32767);
    }

    #[test]
    fn test_scale_stick_invert() {
        // evdev down is positive; raw up is positive
        assert_eq!(scale_stick(255, 0, 255, true), -i16::MAX);
        assert_eq!(scale_stick(0, 0, 255, true), i16::MAX);
    }

    #[test]
    fn test_scale_stick_out_of_range_clamps() {
        assert_eq!(scale_stick(1000, 0, 255, false), i16::MAX);
        assert_eq!(scale_stick(-1000, 0, 255, false), -i16::MAX);
    }

    #[test]
    fn test_scale_stick_degenerate_range() {
        assert_eq!(scale_stick(5, 10, 10, false), 0);
        assert_eq!(scale_stick(5, 10, 0, false), 0);
    }

    #[test]
    fn test_scale_trigger() {
        assert_eq!(scale_trigger(0, 0, 255), 0);
        assert_eq!(scale_trigger(255, 0, 255), 255);
        assert_eq!(scale_trigger(1023, 0, 1023), 255);
        assert_eq!(scale_trigger(2000, 0, 1023), 255);
        assert_eq!(scale_trigger(-5, 0, 1023), 0);
        assert_eq!(scale_trigger(3, 3, 3), 0);
    }

    #[test]
    fn test_hat_bits() {
        assert_eq!(hat_bits(-1, buttons::DPAD_UP, buttons::DPAD_DOWN), buttons::DPAD_UP);
        assert_eq!(hat_bits(1, buttons::DPAD_UP, buttons::DPAD_DOWN), buttons::DPAD_DOWN);
        assert_eq!(hat_bits(0, buttons::DPAD_UP, buttons::DPAD_DOWN), 0);
    }

    #[test]
    fn test_key_map_bits_are_distinct() {
        let mut seen = 0u16;
        for (key, mask) in KEY_MAP {
            assert_eq!(seen & mask, 0, "{:?} reuses a bit", key);
            seen |= mask;
        }
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_poll_with_real_hardware() {
        // This test requires a connected gamepad
        let mut driver = EvdevDriver::new(4, 1000);
        let reading = driver.poll_raw_state(0);
        assert!(reading.is_ok(), "Should poll connected gamepad");
        assert!(driver.device_path(0).is_some());
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_rumble_with_real_hardware() {
        // This test requires a connected gamepad with rumble support
        let mut driver = EvdevDriver::new(4, 1000);
        driver
            .set_motor_speeds(0, u16::MAX / 2, u16::MAX / 2)
            .expect("Rumble failed");
        std::thread::sleep(Duration::from_millis(300));
        driver.set_motor_speeds(0, 0, 0).expect("Stop failed");
    }
}
