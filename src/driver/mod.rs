//! # Driver Module
//!
//! Trait abstraction over the platform controller driver, plus the raw value
//! types it hands back.
//!
//! The core never talks to hardware directly. Everything it needs from the
//! platform goes through [`PadDriver`]:
//! - Polling the raw state of a device slot
//! - Setting rumble motor speeds
//! - Querying battery and capability information
//!
//! Raw readings use the XInput conventions: a 16-bit button mask, unsigned
//! 8-bit triggers and signed 16-bit sticks where "up" is positive.

#[cfg(target_os = "linux")]
pub mod evdev;

use crate::error::Result;

/// Default number of device slots a driver exposes.
pub const DEFAULT_MAX_SLOTS: u32 = 4;

/// Button bit flags of [`RawReading::buttons`].
pub mod buttons {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// Capability flag bits of [`RawCapabilities::flags`].
pub mod caps {
    pub const FFB_SUPPORTED: u16 = 0x0001;
    pub const WIRELESS: u16 = 0x0002;
    pub const VOICE_SUPPORTED: u16 = 0x0004;
}

/// Device type reported in [`RawCapabilities::device_type`] for gamepads.
pub const DEVTYPE_GAMEPAD: u8 = 0x01;

/// One raw poll result, before any normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    /// Digital button mask, see [`buttons`].
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl RawReading {
    /// Returns a reading with only the given button bits set.
    #[must_use]
    pub fn with_buttons(buttons: u16) -> Self {
        Self {
            buttons,
            ..Self::default()
        }
    }
}

/// Power source reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryKind {
    Disconnected,
    Wired,
    Alkaline,
    NiMh,
    Unknown,
}

/// Coarse charge level reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Empty,
    Low,
    Medium,
    Full,
}

/// Raw battery answer from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBattery {
    pub kind: BatteryKind,
    pub level: BatteryLevel,
}

/// Raw capability answer from the driver.
///
/// `gamepad` carries per-control resolution: a non-zero field means the
/// control exists, with the value being its maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCapabilities {
    pub device_type: u8,
    pub flags: u16,
    pub gamepad: RawReading,
}

/// Platform controller driver.
///
/// Implementations are expected to be fast and non-blocking; callers apply no
/// timeout or retry of their own.
#[cfg_attr(test, mockall::automock)]
pub trait PadDriver {
    /// Number of device slots, scanned as `0..max_slots()`.
    fn max_slots(&self) -> u32;

    /// Poll the current raw state of a slot.
    ///
    /// # Errors
    ///
    /// `DeviceNotConnected` if nothing answers at `slot`.
    fn poll_raw_state(&mut self, slot: u32) -> Result<RawReading>;

    /// Set rumble motor speeds (0 = off, 65535 = full).
    fn set_motor_speeds(&mut self, slot: u32, left: u16, right: u16) -> Result<()>;

    /// Query battery information for a slot.
    fn query_battery(&mut self, slot: u32) -> Result<RawBattery>;

    /// Query device capabilities for a slot.
    fn query_capabilities(&mut self, slot: u32) -> Result<RawCapabilities>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::PadError;

    /// Scripted driver for testing.
    ///
    /// Each slot holds an optional reading; `None` means the slot is empty.
    /// Every motor command is recorded in order.
    #[derive(Debug, Clone)]
    pub struct ScriptedDriver {
        pub slots: Vec<Option<RawReading>>,
        pub motor_commands: Vec<(u32, u16, u16)>,
        pub polled: Vec<u32>,
        pub battery: Option<RawBattery>,
        pub capabilities: Option<RawCapabilities>,
    }

    impl ScriptedDriver {
        pub fn new(max_slots: usize) -> Self {
            Self {
                slots: vec![None; max_slots],
                motor_commands: Vec::new(),
                polled: Vec::new(),
                battery: None,
                capabilities: None,
            }
        }

        /// Driver with one device connected at `slot`.
        pub fn connected_at(slot: usize, reading: RawReading) -> Self {
            let mut driver = Self::new(DEFAULT_MAX_SLOTS as usize);
            driver.slots[slot] = Some(reading);
            driver
        }

        pub fn set(&mut self, slot: usize, reading: RawReading) {
            self.slots[slot] = Some(reading);
        }

        pub fn unplug(&mut self, slot: usize) {
            self.slots[slot] = None;
        }

        pub fn stop_commands(&self) -> usize {
            self.motor_commands
                .iter()
                .filter(|(_, left, right)| *left == 0 && *right == 0)
                .count()
        }
    }

    impl PadDriver for ScriptedDriver {
        fn max_slots(&self) -> u32 {
            self.slots.len() as u32
        }

        fn poll_raw_state(&mut self, slot: u32) -> Result<RawReading> {
            self.polled.push(slot);
            self.slots
                .get(slot as usize)
                .copied()
                .flatten()
                .ok_or(PadError::DeviceNotConnected(slot))
        }

        fn set_motor_speeds(&mut self, slot: u32, left: u16, right: u16) -> Result<()> {
            self.motor_commands.push((slot, left, right));
            Ok(())
        }

        fn query_battery(&mut self, slot: u32) -> Result<RawBattery> {
            self.battery.ok_or(PadError::DeviceNotConnected(slot))
        }

        fn query_capabilities(&mut self, slot: u32) -> Result<RawCapabilities> {
            self.capabilities.ok_or(PadError::DeviceNotConnected(slot))
        }
    }
}
