//! Pulse-count calibration.
//!
//! Converts raw edge counts from one measurement window into 8-bit channel
//! intensities using empirically determined per-channel divisors.

use crate::types::{ColourChannel, ConfigError};

/// Largest calibrated intensity; larger quotients saturate here.
pub const MAX_INTENSITY: u8 = 255;

/// Converts a pulse count to an intensity: `clamp(floor(count / coefficient), 0, 255)`.
///
/// `coefficient` must be positive. The result is monotonic non-decreasing in `count`.
#[inline]
pub fn calibrate(count: u32, coefficient: f32) -> u8 {
    let scaled = count as f32 / coefficient;
    // Non-negative after the clamp, so truncation is floor. NaN casts to 0.
    scaled.clamp(0.0, MAX_INTENSITY as f32) as u8
}

/// Per-channel calibration divisors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Divisor for the red phase count
    pub red: f32,
    /// Divisor for the green phase count
    pub green: f32,
    /// Divisor for the blue phase count
    pub blue: f32,
}

impl Calibration {
    /// Bench calibration of the demo sensor head.
    ///
    /// Each divisor scales the brightest count seen on a white target (about
    /// 1200 pulses) to just under 256, so that count lands on 254 for red.
    pub const DEFAULT: Self = Self {
        red: 4.7059,
        green: 4.9412,
        blue: 5.3333,
    };

    /// Creates a calibration, rejecting divisors that are not positive and finite.
    pub fn new(red: f32, green: f32, blue: f32) -> Result<Self, ConfigError> {
        let calibration = Self { red, green, blue };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Checks every divisor is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for channel in ColourChannel::ALL {
            let coefficient = self.coefficient(channel);
            if !(coefficient.is_finite() && coefficient > 0.0) {
                return Err(ConfigError::InvalidCoefficient(channel));
            }
        }
        Ok(())
    }

    /// Returns the divisor for `channel`.
    #[inline]
    pub fn coefficient(&self, channel: ColourChannel) -> f32 {
        match channel {
            ColourChannel::Red => self.red,
            ColourChannel::Green => self.green,
            ColourChannel::Blue => self.blue,
        }
    }

    /// Calibrates a raw `count` for `channel`.
    #[inline]
    pub fn apply(&self, channel: ColourChannel, count: u32) -> u8 {
        calibrate(count, self.coefficient(channel))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
