//! Core value types shared across the sampler, classifier and renderer.

use palette::Srgb;

/// Calibrated red/green/blue intensities from one full measurement cycle.
///
/// Each component is a pulse count divided by its channel's calibration
/// coefficient and saturated to `0..=255`.
pub type ColourSample = Srgb<u8>;

/// One of the three colour channels the sampler measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColourChannel {
    /// Red phase, measured first.
    Red,

    /// Green phase.
    Green,

    /// Blue phase, measured last.
    Blue,
}

impl ColourChannel {
    /// All channels in measurement order.
    pub const ALL: [ColourChannel; 3] = [ColourChannel::Red, ColourChannel::Green, ColourChannel::Blue];

    /// Index of the channel within an `[r, g, b]` array.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ColourChannel::Red => 0,
            ColourChannel::Green => 1,
            ColourChannel::Blue => 2,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Measurement window of zero ticks.
    ZeroWindow,

    /// Timer tick period of zero.
    ZeroTickPeriod,

    /// Busy-poll interval of zero.
    ZeroPollInterval,

    /// Calibration coefficient that is zero, negative or not finite.
    InvalidCoefficient(ColourChannel),

    /// Software PWM period of zero ticks.
    ZeroPwmPeriod,

    /// Light scale whose maximum does not exceed its minimum.
    EmptyLightScale,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroWindow => {
                write!(f, "measurement window must be at least one tick long")
            }
            ConfigError::ZeroTickPeriod => {
                write!(f, "tick period must be non-zero")
            }
            ConfigError::ZeroPollInterval => {
                write!(f, "poll interval must be non-zero")
            }
            ConfigError::InvalidCoefficient(channel) => {
                write!(
                    f,
                    "calibration coefficient for {:?} must be positive and finite",
                    channel
                )
            }
            ConfigError::ZeroPwmPeriod => {
                write!(f, "PWM period must be at least one tick")
            }
            ConfigError::EmptyLightScale => {
                write!(f, "light scale maximum must be greater than its minimum")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
