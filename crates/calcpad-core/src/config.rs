//! Engine tuning parameters
//!
//! [`EngineConfig`] carries every tunable the engine reads at runtime. It is
//! serde-serializable and persisted with postcard, the same way the rest of
//! the crate encodes records.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Default minimum mean channel distance between text and its background.
pub const DEFAULT_CONTRAST_THRESHOLD: u8 = 75;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config encoding failed: {0}")]
    Encode(postcard::Error),
    #[error("Config decoding failed: {0}")]
    Decode(postcard::Error),
    #[error("Invalid config value: {0}")]
    Invalid(&'static str),
}

/// Runtime parameters for layout, text fitting and interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Text whose mean channel distance to its background is below this is
    /// reported as hard to read.
    pub contrast_threshold: u8,

    /// Smallest font size the shrink policy may reach.
    pub min_font_size: u32,

    /// Seconds a hold-to-press button must be held before it fires.
    pub hold_to_press_seconds: f32,

    /// Seconds before the first repeat of a hold-to-repeat button.
    pub initial_repeat_interval: f32,

    /// Factor applied to the repeat interval after every repeat, in `(0, 1]`.
    pub repeat_acceleration: f32,

    /// Shortest repeat interval the acceleration may reach.
    pub repeat_floor: f32,

    /// Distance in pixels the pointer has to travel from its press origin
    /// before the press counts as a drag.
    pub drag_threshold_px: u32,

    /// Panic on missing icons instead of drawing a placeholder.
    pub strict_resources: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            contrast_threshold: DEFAULT_CONTRAST_THRESHOLD,
            min_font_size: 1,
            hold_to_press_seconds: 0.6,
            initial_repeat_interval: 0.5,
            repeat_acceleration: 0.8,
            repeat_floor: 0.06,
            drag_threshold_px: 8,
            strict_resources: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    /// Check that the timing values describe a terminating, accelerating
    /// repeat schedule and a reachable font floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_font_size == 0 {
            return Err(ConfigError::Invalid("min_font_size must be at least 1"));
        }
        if !(self.hold_to_press_seconds > 0.0) {
            return Err(ConfigError::Invalid("hold_to_press_seconds must be positive"));
        }
        if !(self.repeat_floor > 0.0) {
            return Err(ConfigError::Invalid("repeat_floor must be positive"));
        }
        if !(self.initial_repeat_interval >= self.repeat_floor) {
            return Err(ConfigError::Invalid(
                "initial_repeat_interval must not be below repeat_floor",
            ));
        }
        if !(self.repeat_acceleration > 0.0 && self.repeat_acceleration <= 1.0) {
            return Err(ConfigError::Invalid("repeat_acceleration must be in (0, 1]"));
        }
        Ok(())
    }

    /// Decode and validate a postcard-encoded config.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode this config with postcard.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(ConfigError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_survives_encoding() {
        let config = EngineConfig {
            hold_to_press_seconds: 1.25,
            strict_resources: false,
            ..EngineConfig::default()
        };

        let bytes = config.to_bytes().unwrap();
        let decoded = EngineConfig::from_bytes(&bytes).unwrap();

        assert_eq!(config, decoded);
    }

    #[test]
    fn test_rejects_runaway_repeat_schedule() {
        let config = EngineConfig {
            repeat_acceleration: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EngineConfig {
            repeat_floor: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_decoding_invalid_values_fails() {
        let config = EngineConfig {
            min_font_size: 0,
            ..EngineConfig::default()
        };
        let bytes = postcard::to_allocvec(&config).unwrap();

        assert!(matches!(
            EngineConfig::from_bytes(&bytes),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_bytes(&[0xFF]),
            Err(ConfigError::Decode(_))
        ));
    }
}
