//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values fall back to the
//! XInput-style defaults.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::tracker::ControllerSettings;
use crate::controller::vibration::VibrationSettings;
use crate::error::{PadError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub vibration: VibrationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Normalization configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControllerConfig {
    #[serde(default = "default_left_stick_deadzone")]
    pub left_stick_deadzone: i16,

    #[serde(default = "default_right_stick_deadzone")]
    pub right_stick_deadzone: i16,

    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: u8,

    #[serde(default = "default_trigger_button_threshold")]
    pub trigger_button_threshold: u8,

    #[serde(default = "default_axis_deadzone")]
    pub axis_deadzone: f32,
}

/// Driver configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DriverConfig {
    #[serde(default = "default_max_slots")]
    pub max_slots: u32,

    #[serde(default = "default_rescan_interval_ms")]
    pub rescan_interval_ms: u64,
}

/// Rumble presets used by the monitor keys
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VibrationConfig {
    #[serde(default = "default_strong_intensity")]
    pub strong_intensity: f32,

    #[serde(default = "default_strong_duration")]
    pub strong_duration: f32,

    #[serde(default = "default_weak_intensity")]
    pub weak_intensity: f32,

    #[serde(default = "default_weak_duration")]
    pub weak_duration: f32,
}

/// Text monitor configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file; when unset, logs go to stderr.
    #[serde(default)]
    pub file: Option<String>,
}

// Default value functions
fn default_left_stick_deadzone() -> i16 { crate::controller::normalize::LEFT_STICK_DEADZONE }
fn default_right_stick_deadzone() -> i16 { crate::controller::normalize::RIGHT_STICK_DEADZONE }
fn default_trigger_threshold() -> u8 { crate::controller::normalize::TRIGGER_THRESHOLD }
fn default_trigger_button_threshold() -> u8 { crate::controller::normalize::TRIGGER_BUTTON_THRESHOLD }
fn default_axis_deadzone() -> f32 { crate::controller::normalize::DEFAULT_AXIS_DEADZONE }

fn default_max_slots() -> u32 { crate::driver::DEFAULT_MAX_SLOTS }
fn default_rescan_interval_ms() -> u64 { 1000 }

fn default_strong_intensity() -> f32 { 1.0 }
fn default_strong_duration() -> f32 { 0.5 }
fn default_weak_intensity() -> f32 { 0.3 }
fn default_weak_duration() -> f32 { 0.3 }

fn default_refresh_interval_ms() -> u64 { 16 }

fn default_log_level() -> String { "info".to_string() }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            left_stick_deadzone: default_left_stick_deadzone(),
            right_stick_deadzone: default_right_stick_deadzone(),
            trigger_threshold: default_trigger_threshold(),
            trigger_button_threshold: default_trigger_button_threshold(),
            axis_deadzone: default_axis_deadzone(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_slots: default_max_slots(),
            rescan_interval_ms: default_rescan_interval_ms(),
        }
    }
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            strong_intensity: default_strong_intensity(),
            strong_duration: default_strong_duration(),
            weak_intensity: default_weak_intensity(),
            weak_duration: default_weak_duration(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl From<&ControllerConfig> for ControllerSettings {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            left_stick_deadzone: config.left_stick_deadzone,
            right_stick_deadzone: config.right_stick_deadzone,
            trigger_threshold: config.trigger_threshold,
            trigger_button_threshold: config.trigger_button_threshold,
            axis_deadzone: config.axis_deadzone,
        }
    }
}

impl VibrationConfig {
    /// The preset bound to the "strong" key.
    #[must_use]
    pub fn strong(&self) -> VibrationSettings {
        VibrationSettings {
            left_motor: self.strong_intensity,
            right_motor: self.strong_intensity,
            duration: self.strong_duration,
        }
    }

    /// The preset bound to the "weak" key.
    #[must_use]
    pub fn weak(&self) -> VibrationSettings {
        VibrationSettings {
            left_motor: self.weak_intensity,
            right_motor: self.weak_intensity,
            duration: self.weak_duration,
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> PadError {
    PadError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padframe::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Normalization settings for the tracker
    #[must_use]
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings::from(&self.controller)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate deadzones
        if self.controller.left_stick_deadzone < 0 {
            return Err(invalid("left_stick_deadzone must not be negative"));
        }

        if self.controller.right_stick_deadzone < 0 {
            return Err(invalid("right_stick_deadzone must not be negative"));
        }

        let axis_deadzone = self.controller.axis_deadzone;
        if !(0.0..1.0).contains(&axis_deadzone) {
            return Err(invalid("axis_deadzone must be between 0.0 and 1.0 (exclusive)"));
        }

        // Validate driver settings
        if self.driver.max_slots == 0 || self.driver.max_slots > 16 {
            return Err(invalid("max_slots must be between 1 and 16"));
        }

        if self.driver.rescan_interval_ms == 0 || self.driver.rescan_interval_ms > 60000 {
            return Err(invalid("rescan_interval_ms must be between 1 and 60000"));
        }

        // Validate vibration presets
        for (name, value) in [
            ("strong_intensity", self.vibration.strong_intensity),
            ("weak_intensity", self.vibration.weak_intensity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must be between 0.0 and 1.0", name)));
            }
        }

        for (name, value) in [
            ("strong_duration", self.vibration.strong_duration),
            ("weak_duration", self.vibration.weak_duration),
        ] {
            if !(0.0..=60.0).contains(&value) {
                return Err(invalid(format!("{} must be between 0.0 and 60.0 seconds", name)));
            }
        }

        // Validate display
        if self.display.refresh_interval_ms == 0 || self.display.refresh_interval_ms > 1000 {
            return Err(invalid("refresh_interval_ms must be between 1 and 1000"));
        }

        // Validate logging
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "log level must be one of: trace, debug, info, warn, error",
            ));
        }

        if matches!(&self.logging.file, Some(file) if file.is_empty()) {
            return Err(invalid("log file cannot be empty when set"));
        }

        Ok(())
    }
}
