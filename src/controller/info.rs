//! # Device Information Module
//!
//! Stateless translation of driver battery and capability answers.
//!
//! A failed query never surfaces as an error: callers get the `Default`
//! value, whose `valid` flag is `false`.

use crate::driver::{caps, BatteryKind, BatteryLevel, RawBattery, RawCapabilities, DEVTYPE_GAMEPAD};
use crate::error::Result;

/// Battery state of the active device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryInfo {
    /// Whether the driver answered the query.
    pub valid: bool,
    pub is_wired: bool,
    /// 0 = empty, 1 = low, 2 = medium, 3 = full (or wired).
    pub level: u8,
    /// Human-readable level, empty when `valid` is false.
    pub label: &'static str,
}

impl BatteryInfo {
    /// Translates a driver answer.
    ///
    /// # Examples
    ///
    /// ```
    /// use padframe::controller::info::BatteryInfo;
    /// use padframe::driver::{BatteryKind, BatteryLevel, RawBattery};
    ///
    /// let info = BatteryInfo::from_query(Ok(RawBattery {
    ///     kind: BatteryKind::Alkaline,
    ///     level: BatteryLevel::Low,
    /// }));
    /// assert_eq!(info.level, 1);
    /// assert_eq!(info.label, "Low");
    /// ```
    #[must_use]
    pub fn from_query(result: Result<RawBattery>) -> Self {
        match result {
            Ok(raw) => Self::from_raw(raw),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    pub fn from_raw(raw: RawBattery) -> Self {
        let mut info = Self {
            valid: true,
            ..Self::default()
        };

        match raw.kind {
            BatteryKind::Wired => {
                info.is_wired = true;
                info.level = 3;
                info.label = "Wired";
            }
            BatteryKind::Alkaline | BatteryKind::NiMh => {
                let (level, label) = match raw.level {
                    BatteryLevel::Empty => (0, "Empty"),
                    BatteryLevel::Low => (1, "Low"),
                    BatteryLevel::Medium => (2, "Medium"),
                    BatteryLevel::Full => (3, "Full"),
                };
                info.level = level;
                info.label = label;
            }
            BatteryKind::Disconnected | BatteryKind::Unknown => {
                info.label = "Unknown";
            }
        }

        info
    }
}

/// Capabilities of the active device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the driver answered the query.
    pub valid: bool,
    pub is_gamepad: bool,
    pub has_voice: bool,
    pub has_force_feedback: bool,
    pub is_wireless: bool,
    /// Supported buttons, in the raw bit layout.
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl Capabilities {
    /// Translates a driver answer.
    #[must_use]
    pub fn from_query(result: Result<RawCapabilities>) -> Self {
        match result {
            Ok(raw) => Self::from_raw(raw),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    pub fn from_raw(raw: RawCapabilities) -> Self {
        Self {
            valid: true,
            is_gamepad: raw.device_type == DEVTYPE_GAMEPAD,
            has_voice: raw.flags & caps::VOICE_SUPPORTED != 0,
            has_force_feedback: raw.flags & caps::FFB_SUPPORTED != 0,
            is_wireless: raw.flags & caps::WIRELESS != 0,
            buttons: raw.gamepad.buttons,
            left_trigger: raw.gamepad.left_trigger,
            right_trigger: raw.gamepad.right_trigger,
            thumb_lx: raw.gamepad.thumb_lx,
            thumb_ly: raw.gamepad.thumb_ly,
            thumb_rx: raw.gamepad.thumb_rx,
            thumb_ry: raw.gamepad.thumb_ry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::RawReading;
    use crate::error::PadError;

    fn battery(kind: BatteryKind, level: BatteryLevel) -> BatteryInfo {
        BatteryInfo::from_raw(RawBattery { kind, level })
    }

    #[test]
    fn test_battery_wired() {
        let info = battery(BatteryKind::Wired, BatteryLevel::Empty);
        assert!(info.valid);
        assert!(info.is_wired);
        assert_eq!(info.level, 3);
        assert_eq!(info.label, "Wired");
    }

    #[test]
    fn test_battery_levels() {
        for kind in [BatteryKind::Alkaline, BatteryKind::NiMh] {
            for (level, ordinal, label) in [
                (BatteryLevel::Empty, 0, "Empty"),
                (BatteryLevel::Low, 1, "Low"),
                (BatteryLevel::Medium, 2, "Medium"),
                (BatteryLevel::Full, 3, "Full"),
            ] {
                let info = battery(kind, level);
                assert!(info.valid);
                assert!(!info.is_wired);
                assert_eq!(info.level, ordinal);
                assert_eq!(info.label, label);
            }
        }
    }

    #[test]
    fn test_battery_unknown_kind() {
        for kind in [BatteryKind::Unknown, BatteryKind::Disconnected] {
            let info = battery(kind, BatteryLevel::Full);
            assert!(info.valid);
            assert_eq!(info.level, 0);
            assert_eq!(info.label, "Unknown");
        }
    }

    #[test]
    fn test_battery_failed_query() {
        let info = BatteryInfo::from_query(Err(PadError::DeviceNotConnected(0)));
        assert_eq!(info, BatteryInfo::default());
        assert!(!info.valid);
        assert_eq!(info.label, "");
    }

    #[test]
    fn test_capabilities_flags() {
        let caps = Capabilities::from_raw(RawCapabilities {
            device_type: DEVTYPE_GAMEPAD,
            flags: caps::FFB_SUPPORTED | caps::WIRELESS,
            gamepad: RawReading {
                buttons: 0xf3ff,
                left_trigger: 255,
                right_trigger: 255,
                thumb_lx: i16::MAX,
                thumb_ly: i16::MAX,
                thumb_rx: i16::MAX,
                thumb_ry: i16::MAX,
            },
        });

        assert!(caps.valid);
        assert!(caps.is_gamepad);
        assert!(caps.has_force_feedback);
        assert!(caps.is_wireless);
        assert!(!caps.has_voice);
        assert_eq!(caps.buttons, 0xf3ff);
        assert_eq!(caps.left_trigger, 255);
        assert_eq!(caps.thumb_ry, i16::MAX);
    }

    #[test]
    fn test_capabilities_not_gamepad() {
        let caps = Capabilities::from_raw(RawCapabilities {
            device_type: 0,
            flags: caps::VOICE_SUPPORTED,
            gamepad: RawReading::default(),
        });
        assert!(caps.valid);
        assert!(!caps.is_gamepad);
        assert!(caps.has_voice);
    }

    #[test]
    fn test_capabilities_failed_query() {
        let caps = Capabilities::from_query(Err(PadError::Unsupported("caps".to_string())));
        assert_eq!(caps, Capabilities::default());
        assert!(!caps.valid);
    }
}
