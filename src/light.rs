//! Ambient light scale and the planet detection rule.

use crate::classifier::ColourLabel;
use crate::types::ConfigError;

/// Light percentage a reading must stay below for a transit to be detected.
pub const PLANET_LIGHT_THRESHOLD: u8 = 100;

/// Trait for the ambient light sensor.
///
/// Implement this for the board's ADC; the conversion is blocking.
pub trait LightSensor {
    /// Performs one conversion and returns the raw reading.
    fn read_raw(&mut self) -> u16;
}

/// Maps raw ADC readings onto a 0-100 % scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightScale {
    min: u16,
    max: u16,
}

impl LightScale {
    /// Phototransistor range measured on the demo rig.
    pub const DEFAULT: Self = Self { min: 3, max: 150 };

    /// Creates a scale from the readings that map to 0 % and 100 %.
    pub fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if max <= min {
            return Err(ConfigError::EmptyLightScale);
        }
        Ok(Self { min, max })
    }

    /// Converts a raw reading to a percentage, saturating at both ends.
    pub fn percentage(&self, raw: u16) -> u8 {
        if raw < self.min {
            0
        } else if raw > self.max {
            100
        } else {
            let span = (self.max - self.min) as u32;
            (((raw - self.min) as u32 * 100) / span) as u8
        }
    }

    /// Reading that maps to 0 %.
    pub fn min(&self) -> u16 {
        self.min
    }

    /// Reading that maps to 100 %.
    pub fn max(&self) -> u16 {
        self.max
    }
}

impl Default for LightScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A planet is "found" when the light dips and the target shows a known colour.
pub fn planet_detected(light_percent: u8, label: ColourLabel) -> bool {
    light_percent < PLANET_LIGHT_THRESHOLD && label.is_planet_colour()
}
